//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`skillcheck status`, `skillcheck install`)
//! - Shared workspace loading
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod install;
pub mod status;
pub mod workspace;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use workspace::Workspace;
