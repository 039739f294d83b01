//! Configuration loading and lookup.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Dotted-path lookups and truthiness in [`accessor`]
//!
//! # Example
//!
//! ```
//! use skillcheck::config::{load_merged_config, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".skillcheck");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "browser:\n  enabled: false\n").unwrap();
//!
//! let paths = ConfigPaths::discover_with_home(temp.path(), None);
//! let config = load_merged_config(&paths).unwrap();
//! assert!(!config.is_path_truthy("browser.enabled"));
//! assert!(config.is_path_truthy("browser.evaluateEnabled"));
//! ```

pub mod accessor;
pub mod loader;
pub mod merger;
pub mod schema;

pub use accessor::{is_path_truthy, is_truthy, path_default, resolve_path, PATH_DEFAULTS};
pub use loader::{
    load_config, load_config_value, load_merged_config, Config, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{ConfigFile, InstallConfig, LoadConfig, NodeManager, SkillConfig, SkillsConfig};
