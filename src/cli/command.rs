//! Command builder for Screaming Frog CLI invocations
//!
//! `SpiderCommand` assembles the argument list for each CLI mode and runs it
//! either to completion under a timeout, or detached for background crawls.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::error::{SpiderError, SpiderResult};
use crate::utils::tail_lines;

/// Fluent builder for one Screaming Frog CLI invocation
#[derive(Debug, Clone)]
pub struct SpiderCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl SpiderCommand {
    /// Headless invocation of the CLI at `program`
    #[must_use]
    pub fn headless(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["--headless".to_string()],
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn flag_value(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    /// `--crawl <url> --save-crawl [--config <file>] [--max-crawl-size <n>]`
    #[must_use]
    pub fn crawl(program: &Path, url: &str, config_file: Option<&Path>, max_urls: Option<u32>) -> Self {
        let mut cmd = Self::headless(program)
            .flag_value("--crawl", url)
            .arg("--save-crawl");
        if let Some(config) = config_file {
            cmd = cmd.flag_value("--config", config.to_string_lossy());
        }
        if let Some(max) = max_urls {
            cmd = cmd.flag_value("--max-crawl-size", max.to_string());
        }
        cmd
    }

    /// `--help`, used to read version and licence banners
    #[must_use]
    pub fn help(program: &Path) -> Self {
        Self::headless(program).arg("--help")
    }

    /// `--delete-crawl <id>`
    #[must_use]
    pub fn delete_crawl(program: &Path, crawl_id: &str) -> Self {
        Self::headless(program).flag_value("--delete-crawl", crawl_id)
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Spawn without waiting, in its own process group on unix.
    ///
    /// Dropping the returned `Child` does not kill the process, and signals
    /// sent to the server's group do not reach it. stdout and stderr are pipes
    /// read by this process, so a crawl does not survive the server exiting:
    /// the CLI's next log write after that fails with a broken pipe.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the executable cannot be started.
    pub fn spawn_detached(&self) -> SpiderResult<Child> {
        let mut cmd = self.command();
        cmd.kill_on_drop(false);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        info!(
            pid = child.id(),
            program = %self.program.display(),
            args = ?self.args,
            "Spawned Screaming Frog CLI"
        );
        Ok(child)
    }

    /// Run to completion, killing the process if `limit` elapses.
    ///
    /// On unix the CLI runs in a fresh process group, and a timeout kills the
    /// whole group. That covers the JVM started by the launcher script.
    ///
    /// # Errors
    ///
    /// Returns [`SpiderError::Timeout`] after killing the process, or an IO
    /// error if it cannot be started.
    pub async fn run(&self, operation: &'static str, limit: Duration) -> SpiderResult<CommandOutput> {
        let mut cmd = self.command();
        cmd.kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        let pid = child.id();
        info!(
            pid,
            operation,
            args = ?self.args,
            "Running Screaming Frog CLI"
        );

        // Dropping the wait future on timeout drops the child, which kills it
        match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                debug!(operation, status = %output.status, "Screaming Frog CLI finished");
                Ok(CommandOutput {
                    status: output.status,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            Err(_) => {
                kill_process_group(pid);
                Err(SpiderError::Timeout { operation, limit })
            }
        }
    }
}

/// SIGKILL the process group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    // SAFETY: kill(2) only sends a signal; a negative pid addresses the group
    // created for this child by `process_group(0)`
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc == 0 {
        debug!(pgid, "Killed Screaming Frog process group");
    } else {
        debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "Process group already gone"
        );
    }
}

/// Windows has no process groups here; `kill_on_drop` stops the direct child
#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Captured result of a completed CLI run
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Convert a nonzero exit into [`SpiderError::SubprocessFailed`]
    ///
    /// # Errors
    ///
    /// Returns the failure with the last `tail` output lines attached.
    pub fn into_success(self, tail: usize) -> SpiderResult<Self> {
        if self.status.success() {
            return Ok(self);
        }
        Err(SpiderError::SubprocessFailed {
            exit_code: self.status.code(),
            output_tail: tail_lines(&self.combined(), tail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_arguments_in_cli_order() {
        let cmd = SpiderCommand::crawl(
            Path::new("/opt/sf"),
            "https://example.com",
            Some(Path::new("/tmp/site.seospiderconfig")),
            Some(100),
        );
        assert_eq!(
            cmd.args(),
            [
                "--headless",
                "--crawl",
                "https://example.com",
                "--save-crawl",
                "--config",
                "/tmp/site.seospiderconfig",
                "--max-crawl-size",
                "100",
            ]
        );
    }

    #[test]
    fn crawl_without_options() {
        let cmd = SpiderCommand::crawl(Path::new("/opt/sf"), "https://example.com", None, None);
        assert_eq!(cmd.args(), ["--headless", "--crawl", "https://example.com", "--save-crawl"]);
    }

    #[test]
    fn delete_arguments() {
        let cmd = SpiderCommand::delete_crawl(Path::new("/opt/sf"), "abc-123");
        assert_eq!(cmd.args(), ["--headless", "--delete-crawl", "abc-123"]);
    }
}
