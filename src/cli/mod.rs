//! Screaming Frog CLI plumbing
//!
//! - `check`: installation and licence check
//! - `locator`: resolve the launcher executable
//! - `lock`: detect a running GUI holding the crawl database
//! - `command`: build and run CLI invocations
//! - `output`: parse banners and progress lines from CLI logs

pub mod check;
pub mod command;
pub mod locator;
pub mod lock;
pub mod output;

pub use check::{InstallationReport, check_installation};
pub use command::{CommandOutput, SpiderCommand};
pub use locator::{default_cli_paths, resolve_cli_path, resolve_cli_path_from};
pub use lock::{GUI_PROCESS_SIGNATURE, GuiProbe, LockDetector, ProcessTableProbe};
pub use output::{CliBanner, OutputTail, crawl_summary_line, parse_banner};
