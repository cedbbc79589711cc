//! Parsing of Screaming Frog CLI log output

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Version and licence banner printed by every CLI start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliBanner {
    pub version: String,
    pub license: String,
}

/// Extract `Running: ...` and `Licence Status: ...` from CLI start-up logs.
///
/// Missing values are reported as `unknown`.
#[must_use]
pub fn parse_banner(output: &str) -> CliBanner {
    let mut version = None;
    let mut license = None;

    for line in output.lines() {
        if line.contains("Running: Screaming Frog SEO Spider")
            && let Some((_, value)) = line.rsplit_once("Running: ")
        {
            version = Some(value.trim().to_string());
        }
        if let Some((_, value)) = line.rsplit_once("Licence Status: ") {
            license = Some(value.trim().to_string());
        }
    }

    CliBanner {
        version: version.unwrap_or_else(|| "unknown".to_string()),
        license: license.unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Last line reporting crawl progress or completion, if any
#[must_use]
pub fn crawl_summary_line(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("urls crawled") || lower.contains("crawl complete")
        })
        .last()
        .map(|line| line.trim().to_string())
}

/// Bounded buffer of the most recent output lines of a background process
#[derive(Debug, Clone)]
pub struct OutputTail {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl OutputTail {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Buffered lines joined with newlines
    #[must_use]
    pub fn snapshot(&self) -> String {
        let lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    /// Spawn a task copying `reader` line by line into this buffer
    pub fn drain<R>(&self, reader: R) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let tail = self.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tail.push(line);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_parsed_from_startup_log() {
        let log = "\
2025-01-01 10:00:00,000 [main] INFO  - Running: Screaming Frog SEO Spider 21.2
2025-01-01 10:00:00,100 [main] INFO  - Licence Status: Licensed
2025-01-01 10:00:00,200 [main] INFO  - Platform: Mac OS X";
        let banner = parse_banner(log);
        assert_eq!(banner.version, "Screaming Frog SEO Spider 21.2");
        assert_eq!(banner.license, "Licensed");
    }

    #[test]
    fn banner_defaults_to_unknown() {
        let banner = parse_banner("usage: ScreamingFrogSEOSpiderLauncher [options]");
        assert_eq!(banner.version, "unknown");
        assert_eq!(banner.license, "unknown");
    }

    #[test]
    fn summary_line_picks_last_match() {
        let log = "start\n120 URLs crawled\nsaving\nCrawl complete: 240 URLs crawled\n";
        assert_eq!(
            crawl_summary_line(log),
            Some("Crawl complete: 240 URLs crawled".to_string())
        );
        assert_eq!(crawl_summary_line("nothing here"), None);
    }

    #[test]
    fn tail_keeps_most_recent_lines() {
        let tail = OutputTail::new(2);
        tail.push("a".to_string());
        tail.push("b".to_string());
        tail.push("c".to_string());
        assert_eq!(tail.snapshot(), "b\nc");
    }
}
