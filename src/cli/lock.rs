//! Detect a running Screaming Frog GUI before touching the crawl database
//!
//! The crawl database accepts one accessor at a time. When the desktop GUI is
//! open, headless invocations either fail or silently export header-only CSVs,
//! so every CLI-invoking operation checks first and fails fast.
//!
//! ## Heuristic
//!
//! [`ProcessTableProbe`] scans the OS process table for the Screaming Frog
//! signature and ignores command lines containing `--headless`, which are
//! the CLI runs this crate launches itself.
//!
//! False negatives: a GUI started from a renamed install, a process table
//! listing that fails (`ps`/`tasklist` missing or denied), or a GUI that
//! released its window but still holds the database during shutdown are all
//! reported as "not running". On Windows, headless and GUI runs cannot be
//! told apart from `tasklist`, so only the GUI executable name is matched.

use std::process::Command;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{SpiderError, SpiderResult};

/// Process name fragment shared by the GUI launcher and its JVM
pub const GUI_PROCESS_SIGNATURE: &str = "ScreamingFrogSEOSpider";

/// Source of truth for "is the GUI holding the database right now"
pub trait GuiProbe: Send + Sync {
    /// Short description of the GUI process (e.g. `pid 4242`) when it is running
    fn find_gui(&self) -> Option<String>;
}

/// Probe backed by the OS process table (`ps` on unix, `tasklist` on Windows)
#[derive(Debug, Clone)]
pub struct ProcessTableProbe {
    signature: String,
}

impl ProcessTableProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            signature: GUI_PROCESS_SIGNATURE.to_string(),
        }
    }

    /// Probe matching a custom process signature
    #[must_use]
    pub fn with_signature(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// Find the GUI in a `pid args` listing as printed by `ps -Ao pid=,args=`
    #[must_use]
    pub fn scan_ps_listing(&self, listing: &str, own_pid: u32) -> Option<String> {
        listing.lines().find_map(|line| {
            let line = line.trim();
            let (pid, args) = line.split_once(char::is_whitespace)?;
            let pid: u32 = pid.trim().parse().ok()?;
            if pid == own_pid || !args.contains(&self.signature) || args.contains("--headless") {
                return None;
            }
            Some(format!("pid {pid}"))
        })
    }

    #[cfg(not(windows))]
    fn list_processes(&self) -> Option<String> {
        let output = Command::new("ps").args(["-Ao", "pid=,args="]).output();
        match output {
            Ok(output) if output.status.success() => {
                let listing = String::from_utf8_lossy(&output.stdout).into_owned();
                self.scan_ps_listing(&listing, std::process::id())
            }
            Ok(output) => {
                debug!("ps exited with {}; assuming GUI is not running", output.status);
                None
            }
            Err(e) => {
                warn!("Could not list processes: {e}; assuming GUI is not running");
                None
            }
        }
    }

    #[cfg(windows)]
    fn list_processes(&self) -> Option<String> {
        let image = format!("{}.exe", self.signature);
        let output = Command::new("tasklist")
            .args(["/FO", "CSV", "/NH", "/FI"])
            .arg(format!("IMAGENAME eq {image}"))
            .output();
        match output {
            Ok(output) if output.status.success() => {
                let listing = String::from_utf8_lossy(&output.stdout);
                listing
                    .lines()
                    .find(|line| line.contains(&image))
                    .map(|line| line.trim().to_string())
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Could not list processes: {e}; assuming GUI is not running");
                None
            }
        }
    }
}

impl Default for ProcessTableProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl GuiProbe for ProcessTableProbe {
    fn find_gui(&self) -> Option<String> {
        self.list_processes()
    }
}

/// Gate in front of every CLI-invoking operation
#[derive(Clone)]
pub struct LockDetector {
    probe: Arc<dyn GuiProbe>,
}

impl LockDetector {
    #[must_use]
    pub fn new(probe: Arc<dyn GuiProbe>) -> Self {
        Self { probe }
    }

    /// Detector backed by the OS process table
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(ProcessTableProbe::new()))
    }

    /// Run the probe on the blocking pool; listing processes forks `ps`
    async fn find_gui(&self) -> Option<String> {
        let probe = Arc::clone(&self.probe);
        match tokio::task::spawn_blocking(move || probe.find_gui()).await {
            Ok(found) => found,
            Err(e) => {
                warn!("GUI detection task failed: {e}; assuming GUI is not running");
                None
            }
        }
    }

    pub async fn is_gui_running(&self) -> bool {
        self.find_gui().await.is_some()
    }

    /// Precondition check for launch, export and delete.
    ///
    /// # Errors
    ///
    /// Returns [`SpiderError::GuiLocked`] when the GUI is running.
    pub async fn check_gui_not_running(&self) -> SpiderResult<()> {
        match self.find_gui().await {
            Some(detail) => {
                warn!("Screaming Frog GUI is running ({detail}); refusing CLI access");
                Err(SpiderError::GuiLocked { detail })
            }
            None => Ok(()),
        }
    }

    /// Non-fatal variant for read-only operations
    pub async fn gui_warning(&self) -> Option<String> {
        self.find_gui().await.map(|detail| {
            format!(
                "Screaming Frog GUI is running ({detail}). Results may be stale until it is \
                 closed. Quit Screaming Frog before exporting or deleting crawls."
            )
        })
    }
}

impl std::fmt::Debug for LockDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockDetector").finish_non_exhaustive()
    }
}
