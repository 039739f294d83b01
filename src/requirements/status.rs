//! Status types produced by skill evaluation.
//!
//! A [`StatusReport`] holds one [`SkillStatusEntry`] per loaded skill plus
//! a summary of common toolchains on the host. All types serialize with
//! camelCase keys for JSON consumers.

use crate::requirements::install::InstallOption;
use crate::skills::SkillSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Requirements grouped by category.
///
/// Used both for what a skill declares and for what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementLists {
    /// Executables that must all be present.
    pub bins: Vec<String>,
    /// Executables of which at least one must be present.
    #[serde(alias = "any_bins")]
    pub any_bins: Vec<String>,
    /// Environment variables that must be set.
    pub env: Vec<String>,
    /// Dotted config paths that must be truthy.
    pub config: Vec<String>,
    /// Operating systems the skill runs on.
    pub os: Vec<String>,
    /// Packages the workspace manifest must list.
    pub dependencies: Vec<String>,
    /// Language runtimes that must be installed.
    pub languages: Vec<String>,
}

impl RequirementLists {
    /// True when every category is empty.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
            && self.any_bins.is_empty()
            && self.env.is_empty()
            && self.config.is_empty()
            && self.os.is_empty()
            && self.dependencies.is_empty()
            && self.languages.is_empty()
    }

    /// True when something an installer could provide is listed.
    pub fn has_installable(&self) -> bool {
        !self.bins.is_empty()
            || !self.any_bins.is_empty()
            || !self.dependencies.is_empty()
            || !self.languages.is_empty()
    }

    /// Compact tags such as `bin:git` or `env:API_KEY`.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        labels.extend(self.bins.iter().map(|b| format!("bin:{}", b)));
        if !self.any_bins.is_empty() {
            labels.push(format!("anyBin:{}", self.any_bins.join("|")));
        }
        labels.extend(self.dependencies.iter().map(|d| format!("npm:{}", d)));
        labels.extend(self.languages.iter().map(|l| format!("lang:{}", l)));
        labels.extend(self.env.iter().map(|e| format!("env:{}", e)));
        labels.extend(self.config.iter().map(|c| format!("config:{}", c)));
        labels.extend(self.os.iter().map(|o| format!("os:{}", o)));
        labels
    }
}

/// Result of checking one config path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigCheck {
    /// The dotted path.
    pub path: String,
    /// The value found, if the path exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_yaml::Value>,
    /// Whether the path counts as enabled.
    pub satisfied: bool,
}

/// Evaluation of one skill.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStatusEntry {
    pub name: String,
    pub description: String,
    pub source: SkillSource,
    pub file_path: PathBuf,
    pub base_dir: PathBuf,
    pub skill_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub always: bool,
    /// Explicitly disabled in config.
    pub disabled: bool,
    /// Bundled skill outside the configured allow-list. Informational only.
    pub blocked_by_allowlist: bool,
    /// Visible and offerable to the agent.
    pub eligible: bool,
    /// Eligible with nothing missing.
    pub ready: bool,
    pub requirements: RequirementLists,
    pub missing: RequirementLists,
    pub config_checks: Vec<ConfigCheck>,
    /// Host-applicable install options, in declaration order.
    pub install: Vec<InstallOption>,
    /// Id of the option to offer first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_install: Option<String>,
}

impl SkillStatusEntry {
    /// Tags for everything missing.
    pub fn missing_labels(&self) -> Vec<String> {
        self.missing.labels()
    }

    /// Whether an installer could help: options exist and a binary,
    /// package or runtime is missing.
    pub fn can_install(&self) -> bool {
        !self.install.is_empty() && self.missing.has_installable()
    }

    /// The preferred option, or the first one.
    pub fn preferred_option(&self) -> Option<&InstallOption> {
        self.preferred_install
            .as_deref()
            .and_then(|id| self.install_option(id))
            .or_else(|| self.install.first())
    }

    /// Look up an install option by id.
    pub fn install_option(&self, id: &str) -> Option<&InstallOption> {
        self.install.iter().find(|o| o.id == id)
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.source.as_str().contains(needle)
    }
}

/// Evaluation of every loaded skill.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub workspace_dir: PathBuf,
    pub managed_skills_dir: PathBuf,
    /// Toolchain name to presence on the host.
    pub env_status: BTreeMap<String, bool>,
    pub skills: Vec<SkillStatusEntry>,
}

impl StatusReport {
    /// Find a skill by name.
    pub fn skill(&self, name: &str) -> Option<&SkillStatusEntry> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Skills whose name, description or source contains `query`
    /// (case-insensitive). A blank query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&SkillStatusEntry> {
        let needle = query.trim().to_lowercase();
        self.skills
            .iter()
            .filter(|s| needle.is_empty() || s.matches(&needle))
            .collect()
    }

    /// Skills a batch install would pick up.
    pub fn install_candidates(&self) -> Vec<&SkillStatusEntry> {
        self.skills
            .iter()
            .filter(|s| s.eligible && s.can_install())
            .collect()
    }

    /// Number of ready skills.
    pub fn ready_count(&self) -> usize {
        self.skills.iter().filter(|s| s.ready).count()
    }
}
