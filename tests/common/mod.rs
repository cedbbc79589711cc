//! Test utilities: temp workspaces, stub Screaming Frog CLIs and GUI probes

#![allow(dead_code)]

use kodegen_tools_seo_spider::cli::{GuiProbe, LockDetector};
use kodegen_tools_seo_spider::config::{SpiderConfig, SpiderConfigBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// GUI detection reporting that the GUI is closed
pub struct GuiClosed;

impl GuiProbe for GuiClosed {
    fn find_gui(&self) -> Option<String> {
        None
    }
}

/// GUI detection reporting that the GUI holds the database
pub struct GuiOpen;

impl GuiProbe for GuiOpen {
    fn find_gui(&self) -> Option<String> {
        Some("pid 4242".to_string())
    }
}

pub fn gui_closed() -> LockDetector {
    LockDetector::new(Arc::new(GuiClosed))
}

pub fn gui_open() -> LockDetector {
    LockDetector::new(Arc::new(GuiOpen))
}

/// What the stub does for `--crawl`
pub const CRAWL_SAVES: &str = r#"sleep 1
    mkdir -p "$DATA_DIR/saved-crawl"
    echo "Crawl complete: 10 URLs crawled"
    exit 0"#;

pub const CRAWL_FAILS: &str = r#"sleep 1
    echo "120 URLs crawled"
    echo "Licence limit reached" >&2
    exit 3"#;

pub const CRAWL_SAVES_NOTHING: &str = r#"sleep 1
    exit 0"#;

pub const CRAWL_RUNS_LONG: &str = r#"sleep 5
    exit 0"#;

/// What the stub does for `--load-crawl`; `$OUT` is the output folder
pub const EXPORT_ROWS: &str = r#"mkdir -p "$OUT/2025.01.01.10.00.00"
    printf 'Address,Status Code\nhttps://example.com/,200\nhttps://example.com/missing,404\n' > "$OUT/2025.01.01.10.00.00/internal_all.csv"
    exit 0"#;

pub const EXPORT_HEADERS_ONLY: &str = r#"mkdir -p "$OUT/2025.01.01.10.00.00"
    printf 'Address,Status Code\n' > "$OUT/2025.01.01.10.00.00/internal_all.csv"
    exit 0"#;

pub const EXPORT_HANGS: &str = r#"sleep 30
    exit 0"#;

/// Hangs in a background worker, the way the launcher script leaves a JVM
/// behind; the worker's pid lands in `worker.pid` next to the data dir
pub const EXPORT_SPAWNS_WORKER: &str = r#"sleep 30 &
    echo $! > "$DATA_DIR/../worker.pid"
    wait
    exit 0"#;

pub const EXPORT_FAILS: &str = r#"echo "Loading crawl"
    echo "boom: crawl could not be loaded" >&2
    exit 2"#;

/// Temp data dir, export root and stub CLI for one test
pub struct Workspace {
    pub root: TempDir,
    pub data_dir: PathBuf,
    pub export_root: PathBuf,
    pub cli: PathBuf,
    /// Every stub invocation appends its arguments here
    pub invocations: PathBuf,
}

impl Workspace {
    pub fn new(crawl_body: &str, export_body: &str) -> Self {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("ProjectInstanceData");
        let export_root = root.path().join("exports");
        let invocations = root.path().join("invocations.log");
        std::fs::create_dir_all(&data_dir).unwrap();

        let cli = root.path().join("ScreamingFrogSEOSpiderLauncher");
        write_stub(&cli, &data_dir, &invocations, crawl_body, export_body);

        Self {
            root,
            data_dir,
            export_root,
            cli,
            invocations,
        }
    }

    /// Stub that succeeds at everything
    pub fn happy() -> Self {
        Self::new(CRAWL_SAVES, EXPORT_ROWS)
    }

    pub fn builder(&self) -> SpiderConfigBuilder {
        SpiderConfig::builder()
            .cli_path(&self.cli)
            .data_dir(&self.data_dir)
            .export_root(&self.export_root)
            .export_timeout(Duration::from_secs(10))
            .command_timeout(Duration::from_secs(10))
    }

    pub fn config(&self) -> Arc<SpiderConfig> {
        Arc::new(self.builder().build().unwrap())
    }

    /// Create a saved crawl directory in the database
    pub fn add_crawl(&self, crawl_id: &str, bytes: usize) -> PathBuf {
        let dir = self.data_dir.join(crawl_id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("crawl.db"), vec![0u8; bytes]).unwrap();
        dir
    }

    /// Stub invocations so far, one argument line each
    pub fn invocations(&self) -> Vec<String> {
        std::fs::read_to_string(&self.invocations)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn stub_was_spawned(&self) -> bool {
        self.invocations.exists()
    }
}

fn write_stub(path: &Path, data_dir: &Path, invocations: &Path, crawl_body: &str, export_body: &str) {
    let script = format!(
        r#"#!/bin/sh
DATA_DIR='{data_dir}'
echo "$*" >> '{invocations}'
case "$2" in
  --help)
    echo "2025-01-01 10:00:00,000 [main] INFO  - Running: Screaming Frog SEO Spider 21.2"
    echo "2025-01-01 10:00:00,100 [main] INFO  - Licence Status: Licensed"
    exit 0
    ;;
  --crawl)
    {crawl_body}
    ;;
  --load-crawl)
    OUT=""
    while [ $# -gt 0 ]; do
      if [ "$1" = "--output-folder" ]; then OUT="$2"; fi
      shift
    done
    {export_body}
    ;;
  --delete-crawl)
    rm -rf "$DATA_DIR/$3"
    exit 0
    ;;
esac
exit 0
"#,
        data_dir = data_dir.display(),
        invocations = invocations.display(),
    );
    std::fs::write(path, script).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Write a CSV with a header and `rows` data rows under `dir`
pub fn write_csv(dir: &Path, name: &str, header: &str, rows: &[String]) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    let mut content = format!("{header}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}
