//! Configuration file discovery and loading.
//!
//! Config files are merged in this order (later overrides earlier):
//! 1. User global config (`~/.skillcheck/config.yml`)
//! 2. Workspace config (`.skillcheck/config.yml`)
//! 3. Local overrides (`.skillcheck/config.local.yml`)
//!
//! Missing files are skipped. A workspace with no config at all gets the
//! default configuration.

use crate::config::accessor;
use crate::config::merger::merge_configs;
use crate::config::schema::{ConfigFile, SkillConfig, SkillsConfig};
use crate::error::{Result, SkillcheckError};
use crate::requirements::install::InstallPreferences;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-workspace and per-user config directory.
pub const CONFIG_DIR: &str = ".skillcheck";

/// Merged configuration: the raw document plus its typed `skills` view.
#[derive(Debug, Clone)]
pub struct Config {
    raw: Value,
    file: ConfigFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw: Value::Mapping(Default::default()),
            file: ConfigFile::default(),
        }
    }
}

impl Config {
    /// Build a config from an already-merged document.
    pub fn from_value(raw: Value) -> std::result::Result<Self, serde_yaml::Error> {
        let raw = if raw.is_null() {
            Value::Mapping(Default::default())
        } else {
            raw
        };
        let file = serde_yaml::from_value(raw.clone())?;
        Ok(Self { raw, file })
    }

    /// Parse a YAML string (used by tests and callers embedding config).
    pub fn from_yaml(content: &str, source_path: &Path) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(content).map_err(|e| parse_error(source_path, e))?;
        Self::from_value(raw).map_err(|e| parse_error(source_path, e))
    }

    /// The full merged document, for dotted-path lookups.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The `skills:` section.
    pub fn skills(&self) -> &SkillsConfig {
        &self.file.skills
    }

    /// Overrides for one skill key.
    pub fn skill_entry(&self, skill_key: &str) -> Option<&SkillConfig> {
        self.file.skills.entries.get(skill_key)
    }

    /// Installer preferences with defaults applied.
    pub fn install_preferences(&self) -> InstallPreferences {
        InstallPreferences {
            prefer_brew: self.file.skills.install.prefer_brew,
            node_manager: self.file.skills.install.node_manager,
        }
    }

    /// Whether a dotted path counts as enabled.
    pub fn is_path_truthy(&self, path: &str) -> bool {
        accessor::is_path_truthy(&self.raw, path)
    }
}

/// Paths to configuration files in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.skillcheck/config.yml
    pub user_global: Option<PathBuf>,

    /// Workspace config: .skillcheck/config.yml
    pub workspace: Option<PathBuf>,

    /// Local overrides: .skillcheck/config.local.yml
    pub workspace_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for a workspace using the real home directory.
    pub fn discover(workspace_dir: &Path) -> Self {
        Self::discover_with_home(workspace_dir, dirs::home_dir().as_deref())
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(workspace_dir: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home.and_then(|h| existing(h.join(CONFIG_DIR).join("config.yml"))),
            workspace: existing(workspace_dir.join(CONFIG_DIR).join("config.yml")),
            workspace_local: existing(workspace_dir.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.workspace, &self.workspace_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

fn parse_error(path: &Path, e: serde_yaml::Error) -> SkillcheckError {
    SkillcheckError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Load one file as a raw YAML document.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SkillcheckError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SkillcheckError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))
}

/// Load and merge every discovered config file.
pub fn load_merged_config(paths: &ConfigPaths) -> Result<Config> {
    let mut documents = Vec::new();
    let mut last_path = None;
    for path in paths.all_existing() {
        let value = load_config_value(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        last_path = Some(path);
        // An empty file parses as null; merging it would wipe earlier layers.
        if !value.is_null() {
            documents.push(value);
        }
    }

    let merged = merge_configs(&documents);
    Config::from_value(merged).map_err(|e| SkillcheckError::ConfigParseError {
        path: last_path.cloned().unwrap_or_default(),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config for a workspace with an optional file override.
///
/// If `config_override` is provided, loads only that file without merging.
pub fn load_config(workspace_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let value = load_config_value(path)?;
        return Config::from_value(value).map_err(|e| parse_error(path, e));
    }
    load_merged_config(&ConfigPaths::discover(workspace_dir))
}
