//! Status report assembly.
//!
//! Combines the requirement evaluator and the install option resolver into
//! one [`SkillStatusEntry`] per skill, plus a summary of common toolchains.

use crate::config::Config;
use crate::requirements::eligibility::EligibilityContext;
use crate::requirements::evaluator::RequirementEvaluator;
use crate::requirements::install::{resolve_install_options, select_preferred, InstallPreferences};
use crate::requirements::probe::HostProbe;
use crate::requirements::status::{SkillStatusEntry, StatusReport};
use crate::skills::{SkillEntry, SkillSource};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Binaries summarized in the environment section.
const SUMMARY_BINARIES: &[&str] = &["node", "npm", "pnpm", "brew"];

/// Language runtimes summarized in the environment section.
const SUMMARY_LANGUAGES: &[&str] = &["php", "python", "go", "rust"];

/// Builds status reports for a workspace.
pub struct StatusReporter<'a> {
    probe: &'a HostProbe,
    config: &'a Config,
    evaluator: RequirementEvaluator<'a>,
    prefs: InstallPreferences,
    workspace_dir: PathBuf,
    managed_dir: PathBuf,
}

impl<'a> StatusReporter<'a> {
    pub fn new(probe: &'a HostProbe, config: &'a Config) -> Self {
        Self {
            probe,
            config,
            evaluator: RequirementEvaluator::new(probe, config),
            prefs: config.install_preferences(),
            workspace_dir: PathBuf::new(),
            managed_dir: PathBuf::new(),
        }
    }

    /// Replace the environment lookup used for `env` requirements.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.evaluator = self.evaluator.with_env(lookup);
        self
    }

    /// Evaluate and filter install specs for another platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.evaluator = self.evaluator.with_platform(platform);
        self
    }

    /// Directories echoed in the report header.
    pub fn with_dirs(mut self, workspace_dir: PathBuf, managed_dir: PathBuf) -> Self {
        self.workspace_dir = workspace_dir;
        self.managed_dir = managed_dir;
        self
    }

    /// Evaluate one skill.
    pub fn build_entry(&self, skill: &SkillEntry, ctx: &EligibilityContext<'_>) -> SkillStatusEntry {
        let eval = self.evaluator.evaluate(skill, ctx);
        let meta = &skill.metadata;

        let install = resolve_install_options(&meta.install, &self.prefs, self.evaluator.platform());
        let preferred_install = if install.is_empty() {
            None
        } else {
            let brew_available = self.probe.has_binary("brew");
            select_preferred(&install, &self.prefs, brew_available).map(|o| o.id.clone())
        };

        SkillStatusEntry {
            name: skill.name.clone(),
            description: skill.description.clone(),
            source: skill.source,
            file_path: skill.file_path.clone(),
            base_dir: skill.base_dir.clone(),
            skill_key: skill.skill_key().to_string(),
            primary_env: meta.primary_env.clone(),
            emoji: meta.emoji.clone().or_else(|| skill.emoji.clone()),
            homepage: homepage(skill),
            always: meta.always,
            disabled: eval.disabled,
            blocked_by_allowlist: self.blocked_by_allowlist(skill),
            eligible: eval.eligible,
            ready: eval.ready,
            requirements: meta.requires.clone(),
            missing: eval.missing,
            config_checks: eval.config_checks,
            install,
            preferred_install,
        }
    }

    /// Evaluate every skill, keeping the given order.
    pub fn build_report(&self, skills: &[SkillEntry], ctx: &EligibilityContext<'_>) -> StatusReport {
        let report = StatusReport {
            workspace_dir: self.workspace_dir.clone(),
            managed_skills_dir: self.managed_dir.clone(),
            env_status: self.environment_summary(),
            skills: skills.iter().map(|s| self.build_entry(s, ctx)).collect(),
        };
        tracing::debug!(
            "Built status for {} skills ({} ready)",
            report.skills.len(),
            report.ready_count()
        );
        report
    }

    /// Presence of common toolchains on the host.
    pub fn environment_summary(&self) -> BTreeMap<String, bool> {
        let mut summary = BTreeMap::new();
        for bin in SUMMARY_BINARIES {
            summary.insert(bin.to_string(), self.probe.has_binary(bin));
        }
        for lang in SUMMARY_LANGUAGES {
            summary.insert(lang.to_string(), self.probe.has_language_runtime(lang));
        }
        summary
    }

    /// Bundled skill missing from a configured allow-list.
    ///
    /// Reported only; the skill stays eligible.
    fn blocked_by_allowlist(&self, skill: &SkillEntry) -> bool {
        if skill.source != SkillSource::Bundled {
            return false;
        }
        match self.config.skills().bundled_allowlist() {
            Some(allow) => !allow
                .iter()
                .any(|a| a == &skill.name || a == skill.skill_key()),
            None => false,
        }
    }
}

fn homepage(skill: &SkillEntry) -> Option<String> {
    [skill.metadata.homepage.as_deref(), skill.homepage.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|h| !h.is_empty())
        .map(str::to_string)
}
