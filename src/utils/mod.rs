pub mod constants;
pub mod fs_utils;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use fs_utils::{dir_size, ensure_private_dir, modified_utc, path_is_contained};
pub use string_utils::{format_size, safe_truncate_chars, tail_lines, truncate_cell};
pub use url_utils::{validate_cli_arg, validate_crawl_id, validate_crawl_url};
