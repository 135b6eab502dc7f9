//! Subcommand implementations

mod build;
mod init;

pub use build::{BuildOverrides, run_build};
pub use init::run_init;
