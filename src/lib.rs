//! skillcheck - Skill eligibility evaluation and install-preference resolution.
//!
//! A skill is a directory with a `SKILL.md` manifest declaring what it needs
//! from the host: binaries, environment variables, config flags, an OS, npm
//! dependencies or language runtimes. skillcheck probes the host, reports
//! which skills are ready, and resolves how to install what is missing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered YAML configuration and dotted-path lookups
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Host probe, evaluation, install resolution and reports
//! - [`shell`] - Running installer processes
//! - [`skills`] - Skill manifest discovery and parsing
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use skillcheck::config::Config;
//!
//! let config = Config::from_yaml(
//!     "browser:\n  enabled: false\n",
//!     std::path::Path::new("config.yml"),
//! )
//! .unwrap();
//! assert!(!config.is_path_truthy("browser.enabled"));
//! assert!(!config.is_path_truthy("channels.discord.token"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod shell;
pub mod skills;
pub mod ui;

pub use error::{Result, SkillcheckError};
