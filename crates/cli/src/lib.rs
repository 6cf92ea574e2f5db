//! `stockbook-cli` — line-oriented shell over the product store.
//!
//! The shell plays the part of the front-end: it validates raw input, calls the
//! store, and prints a confirmation, an error message, or a listing.

pub mod command;
pub mod config;
pub mod shell;

pub use command::{Command, CommandError};
pub use config::ShellConfig;
pub use shell::Shell;
