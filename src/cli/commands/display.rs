//! Shared display helpers for skill status formatting.

use std::collections::BTreeMap;

use crate::requirements::{BatchReport, SkillStatusEntry};
use crate::ui::UserInterface;

/// Marker in front of the option `install` picks by default.
pub const PREFERRED_MARKER: &str = "→";

/// Coarse readiness of a skill, for icons and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillState {
    Ready,
    Missing,
    Disabled,
}

impl SkillState {
    pub fn of(entry: &SkillStatusEntry) -> Self {
        if entry.disabled {
            Self::Disabled
        } else if entry.ready {
            Self::Ready
        } else {
            Self::Missing
        }
    }

    /// Short label shown next to the skill name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Missing => "missing",
            Self::Disabled => "disabled",
        }
    }
}

/// Render host toolchains as `name ✓` / `name ✗` chips.
pub fn format_env_chips(env_status: &BTreeMap<String, bool>) -> String {
    env_status
        .iter()
        .map(|(name, present)| format!("{} {}", name, if *present { "✓" } else { "✗" }))
        .collect::<Vec<_>>()
        .join("  ")
}

/// `<emoji> name (source)`
pub fn skill_title(entry: &SkillStatusEntry) -> String {
    match &entry.emoji {
        Some(emoji) => format!("{} {} ({})", emoji, entry.name, entry.source),
        None => format!("{} ({})", entry.name, entry.source),
    }
}

/// Print the headline for a skill, styled by its state.
pub fn show_skill_line(ui: &mut dyn UserInterface, entry: &SkillStatusEntry) {
    let title = skill_title(entry);
    match SkillState::of(entry) {
        SkillState::Ready => ui.success(&title),
        SkillState::Disabled => ui.message(&format!("○ {} [disabled]", title)),
        SkillState::Missing => {
            let tags = entry.missing_labels().join(" ");
            ui.warning(&format!("{}  missing: {}", title, tags))
        }
    }
}

/// Print description, notes and install options below a skill.
pub fn show_skill_details(ui: &mut dyn UserInterface, entry: &SkillStatusEntry) {
    if !entry.description.is_empty() {
        ui.message(&format!("    {}", entry.description));
    }
    if let Some(homepage) = &entry.homepage {
        ui.message(&format!("    {}", homepage));
    }
    if entry.blocked_by_allowlist {
        ui.message("    not in skills.allowBundled");
    }
    for check in entry.config_checks.iter().filter(|c| !c.satisfied) {
        ui.message(&format!("    config {} is not set", check.path));
    }
    if entry.disabled || entry.install.is_empty() {
        return;
    }
    ui.message("    install:");
    for line in install_option_lines(entry) {
        ui.message(&line);
    }
}

/// One line per install option; the preferred one carries [`PREFERRED_MARKER`].
pub fn install_option_lines(entry: &SkillStatusEntry) -> Vec<String> {
    entry
        .install
        .iter()
        .map(|option| {
            let marker = if entry.preferred_install.as_deref() == Some(option.id.as_str()) {
                PREFERRED_MARKER
            } else {
                " "
            };
            format!("      {} {} [{}]", marker, option.label, option.id)
        })
        .collect()
}

/// `3/5 ready`
pub fn ready_summary(ready: usize, total: usize) -> String {
    format!("{}/{} ready", ready, total)
}

/// Print the outcome of a batch install.
pub fn show_batch_summary(ui: &mut dyn UserInterface, report: &BatchReport, dry_run: bool) {
    if report.results.is_empty() {
        return;
    }
    ui.message("");
    if report.is_success() {
        let verb = if dry_run { "Planned" } else { "Installed" };
        ui.success(&format!(
            "{} {} of {}",
            verb,
            report.succeeded(),
            report.results.len()
        ));
        return;
    }
    ui.error(&format!(
        "{} of {} installs failed",
        report.failed(),
        report.results.len()
    ));
    for failure in report.failures() {
        ui.message(&format!(
            "  {} [{}]: {}",
            failure.skill, failure.option_id, failure.outcome.message
        ));
    }
}
