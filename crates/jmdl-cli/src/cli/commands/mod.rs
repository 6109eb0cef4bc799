//! CLI command handlers, one file per command.

mod decode;
mod dir;
mod init;
mod show;

pub use decode::run_decode;
pub use dir::{parse_assignment, run_dir};
pub use init::run_init;
pub use show::run_show;
