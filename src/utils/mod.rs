//! Utilities (shell command execution).

pub mod command;

pub use command::run_command;
