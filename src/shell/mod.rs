//! External program execution and environment detection.

pub mod command;
pub mod platform;

pub use command::{display_command, run_program, CommandOptions, CommandResult};
pub use platform::is_ci;
