//! Configuration schema definitions.
//!
//! The config file is free-form YAML: skills may reference any dotted path
//! in it. The `skills` section is the part this crate interprets, mapped
//! onto the structs below. Multi-word keys accept both `snake_case` and
//! `camelCase` spellings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Typed view of the top-level config document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Skill-related settings.
    pub skills: SkillsConfig,
}

/// The `skills:` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Bundled skills the user allows. Absent means all are allowed.
    #[serde(alias = "allowBundled", skip_serializing_if = "Option::is_none")]
    pub allow_bundled: Option<Vec<String>>,

    /// Installer preferences.
    pub install: InstallConfig,

    /// Per-skill overrides keyed by skill key.
    ///
    /// A malformed entry is dropped with a warning instead of failing the
    /// whole document.
    #[serde(
        deserialize_with = "deserialize_entries",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub entries: BTreeMap<String, SkillConfig>,

    /// Additional skill directories.
    pub load: LoadConfig,

    /// Directory holding skills shipped with the runtime.
    #[serde(alias = "bundledDir", skip_serializing_if = "Option::is_none")]
    pub bundled_dir: Option<PathBuf>,

    /// Directory for user-managed skills (defaults to `~/.skillcheck/skills`).
    #[serde(alias = "managedDir", skip_serializing_if = "Option::is_none")]
    pub managed_dir: Option<PathBuf>,
}

impl SkillsConfig {
    /// Normalized bundled allow-list.
    ///
    /// Entries are trimmed and blanks dropped. An empty list is treated the
    /// same as no list.
    pub fn bundled_allowlist(&self) -> Option<Vec<String>> {
        let list: Vec<String> = self
            .allow_bundled
            .as_ref()?
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if list.is_empty() {
            None
        } else {
            Some(list)
        }
    }
}

/// `skills.install` preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Prefer Homebrew formulas when `brew` is available.
    #[serde(alias = "preferBrew")]
    pub prefer_brew: bool,

    /// Package manager used for node installers.
    #[serde(alias = "nodeManager")]
    pub node_manager: NodeManager,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            prefer_brew: true,
            node_manager: NodeManager::default(),
        }
    }
}

/// Node package manager used for `node` install specs.
///
/// Unknown names fall back to npm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl NodeManager {
    /// The executable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Arguments that install a package globally, before the package name.
    pub fn global_install_args(&self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["install", "-g"],
            Self::Pnpm => &["add", "-g"],
            Self::Yarn => &["global", "add"],
            Self::Bun => &["add", "-g"],
        }
    }
}

impl From<String> for NodeManager {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pnpm" => Self::Pnpm,
            "yarn" => Self::Yarn,
            "bun" => Self::Bun,
            _ => Self::Npm,
        }
    }
}

impl From<NodeManager> for String {
    fn from(value: NodeManager) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NodeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `skills.entries.<key>` overrides for one skill.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillConfig {
    /// `false` disables the skill entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Secret for the skill's primary environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment values supplied to the skill.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl SkillConfig {
    /// Whether the skill was explicitly disabled.
    pub fn is_disabled(&self) -> bool {
        self.enabled == Some(false)
    }

    /// The stored secret, when non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Read one entry leniently.
    ///
    /// Only a literal boolean sets `enabled`. Scalar secrets and env values
    /// are kept as strings; anything else is ignored. Returns `None` when the
    /// entry is not a mapping.
    pub fn from_value(key: &str, value: &Value) -> Option<Self> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Some(Self::default()),
            _ => {
                tracing::warn!("Ignoring skills.entries.{}: expected a mapping", key);
                return None;
            }
        };

        let enabled = match field(map, &["enabled"]) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                tracing::warn!(
                    "Ignoring skills.entries.{}.enabled: expected true or false, got {:?}",
                    key,
                    other
                );
                None
            }
        };

        let api_key = field(map, &["api_key", "apiKey"]).and_then(scalar_string);

        let env = match field(map, &["env"]) {
            Some(Value::Mapping(vars)) => vars
                .iter()
                .filter_map(|(name, value)| Some((scalar_string(name)?, scalar_string(value)?)))
                .collect(),
            None | Some(Value::Null) => BTreeMap::new(),
            Some(_) => {
                tracing::warn!("Ignoring skills.entries.{}.env: expected a mapping", key);
                BTreeMap::new()
            }
        };

        Some(Self {
            enabled,
            api_key,
            env,
        })
    }
}

impl<'de> Deserialize<'de> for SkillConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value("?", &value).unwrap_or_default())
    }
}

fn deserialize_entries<'de, D>(deserializer: D) -> Result<BTreeMap<String, SkillConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Mapping(map) => map,
        Value::Null => return Ok(BTreeMap::new()),
        _ => {
            tracing::warn!("Ignoring skills.entries: expected a mapping");
            return Ok(BTreeMap::new());
        }
    };
    Ok(map
        .iter()
        .filter_map(|(key, value)| {
            let key = scalar_string(key)?;
            let entry = SkillConfig::from_value(&key, value)?;
            Some((key, entry))
        })
        .collect())
}

/// First present key among the spellings.
fn field<'a>(map: &'a Mapping, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| map.get(*name))
}

/// Strings, numbers and booleans as text.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `skills.load` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Extra directories scanned before all other sources.
    #[serde(alias = "extraDirs", skip_serializing_if = "Vec::is_empty")]
    pub extra_dirs: Vec<PathBuf>,
}
