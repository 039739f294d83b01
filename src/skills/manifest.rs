//! `SKILL.md` manifest parsing.
//!
//! A manifest is a markdown file whose YAML frontmatter declares the skill:
//!
//! ```text
//! ---
//! name: github
//! description: Work with GitHub from the command line
//! metadata:
//!   primaryEnv: GH_TOKEN
//!   requires:
//!     bins: [gh]
//!     env: [GH_TOKEN]
//!   install:
//!     - kind: brew
//!       formula: gh
//! ---
//! ```
//!
//! `metadata` may also be a JSON string. Install entries that don't parse
//! are dropped with a warning instead of failing the whole manifest.

use crate::error::{Result, SkillcheckError};
use crate::requirements::install::InstallSpec;
use crate::requirements::platform::normalize_platforms;
use crate::requirements::status::RequirementLists;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a skill manifest.
pub const SKILL_FILE: &str = "SKILL.md";

/// Where a skill was loaded from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    /// Directories listed in `skills.load.extra_dirs`.
    Extra,
    /// Shipped with the runtime.
    Bundled,
    /// User-managed skills directory.
    Managed,
    /// The workspace's own `skills/` directory.
    Workspace,
}

impl SkillSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extra => "extra",
            Self::Bundled => "bundled",
            Self::Managed => "managed",
            Self::Workspace => "workspace",
        }
    }
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed `metadata` block of a manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMetadata {
    /// Always loaded, regardless of requirements.
    pub always: bool,
    /// Config key for `skills.entries`; defaults to the skill name.
    pub skill_key: Option<String>,
    /// Environment variable satisfied by a stored `apiKey`.
    pub primary_env: Option<String>,
    pub emoji: Option<String>,
    pub homepage: Option<String>,
    pub os: Vec<String>,
    pub requires: RequirementLists,
    pub install: Vec<InstallSpec>,
}

/// A skill as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillEntry {
    pub name: String,
    pub description: String,
    pub source: SkillSource,
    pub file_path: PathBuf,
    pub base_dir: PathBuf,
    /// Frontmatter homepage, website or url.
    pub homepage: Option<String>,
    /// Frontmatter emoji.
    pub emoji: Option<String>,
    pub metadata: SkillMetadata,
}

impl SkillEntry {
    /// An entry with no metadata, rooted at `base_dir`.
    pub fn new(name: impl Into<String>, source: SkillSource, base_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            source,
            file_path: base_dir.join(SKILL_FILE),
            base_dir,
            homepage: None,
            emoji: None,
            metadata: SkillMetadata::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metadata(mut self, metadata: SkillMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Key used to look up per-skill config.
    pub fn skill_key(&self) -> &str {
        self.metadata
            .skill_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Frontmatter {
    name: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
    website: Option<String>,
    url: Option<String>,
    emoji: Option<String>,
    metadata: Option<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMetadata {
    always: bool,
    #[serde(alias = "skill_key")]
    skill_key: Option<String>,
    #[serde(alias = "primary_env")]
    primary_env: Option<String>,
    emoji: Option<String>,
    homepage: Option<String>,
    os: Vec<String>,
    requires: RequirementLists,
    install: Vec<serde_yaml::Value>,
}

/// The YAML between the opening and closing `---` lines, if any.
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.trim_start_matches('\u{feff}').trim_start();
    let rest = rest.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;
    if rest.starts_with("---") {
        return Some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

/// Read and parse a manifest file.
pub fn load_skill_manifest(path: &Path, source: SkillSource) -> Result<SkillEntry> {
    let content = fs::read_to_string(path)?;
    parse_skill_manifest(&content, path, source)
}

/// Parse manifest content. `path` is the manifest's location.
///
/// Without a `name`, the skill is named after its directory.
pub fn parse_skill_manifest(content: &str, path: &Path, source: SkillSource) -> Result<SkillEntry> {
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let front: Frontmatter = match extract_frontmatter(content) {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).map_err(|e| manifest_error(path, e.to_string()))?
        }
        _ => Frontmatter::default(),
    };

    let name = front
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| {
            base_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .ok_or_else(|| manifest_error(path, "skill has no name".to_string()))?;

    let metadata = match front.metadata {
        Some(value) => parse_metadata(value, path)?,
        None => SkillMetadata::default(),
    };

    Ok(SkillEntry {
        name,
        description: front.description.unwrap_or_default().trim().to_string(),
        source,
        file_path: path.to_path_buf(),
        base_dir,
        homepage: front.homepage.or(front.website).or(front.url),
        emoji: front.emoji,
        metadata,
    })
}

fn parse_metadata(value: serde_yaml::Value, path: &Path) -> Result<SkillMetadata> {
    let raw: RawMetadata = match value {
        serde_yaml::Value::Null => RawMetadata::default(),
        serde_yaml::Value::String(json) => {
            serde_json::from_str(&json).map_err(|e| manifest_error(path, e.to_string()))?
        }
        other => serde_yaml::from_value(other).map_err(|e| manifest_error(path, e.to_string()))?,
    };

    let mut requires = raw.requires;
    requires.os = normalize_platforms(&requires.os);
    let os = normalize_platforms(&raw.os);
    if requires.os.is_empty() {
        requires.os = os.clone();
    }

    let mut install = Vec::with_capacity(raw.install.len());
    for (index, value) in raw.install.into_iter().enumerate() {
        match serde_yaml::from_value::<InstallSpec>(value) {
            Ok(spec) => install.push(spec.normalized()),
            Err(e) => tracing::warn!(
                "Skipping install entry {} in {}: {}",
                index,
                path.display(),
                e
            ),
        }
    }

    Ok(SkillMetadata {
        always: raw.always,
        skill_key: raw.skill_key,
        primary_env: raw.primary_env,
        emoji: raw.emoji,
        homepage: raw.homepage,
        os,
        requires,
        install,
    })
}

fn manifest_error(path: &Path, message: String) -> SkillcheckError {
    SkillcheckError::ManifestParseError {
        path: path.to_path_buf(),
        message,
    }
}
