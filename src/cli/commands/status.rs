//! Status command implementation.
//!
//! The `skillcheck status` command shows which skills are ready and what
//! the others are missing.

use std::path::{Path, PathBuf};

use crate::cli::args::StatusArgs;
use crate::error::{Result, SkillcheckError};
use crate::requirements::{EligibilityContext, RemoteSnapshot, SkillStatusEntry, StatusReport};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::workspace::Workspace;

/// The status command implementation.
pub struct StatusCommand {
    workspace_dir: PathBuf,
    config_override: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(workspace_dir: &Path, args: StatusArgs) -> Self {
        Self {
            workspace_dir: workspace_dir.to_path_buf(),
            config_override: None,
            args,
        }
    }

    /// Load this config file instead of the discovered ones.
    pub fn with_config(mut self, config: Option<&Path>) -> Self {
        self.config_override = config.map(Path::to_path_buf);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }

    /// Remote hints from `--remote-platform`/`--remote-bin`, if any.
    fn remote(&self) -> Option<RemoteSnapshot> {
        let snapshot = RemoteSnapshot::new(
            self.args.remote_platforms.iter(),
            self.args.remote_bins.iter().cloned(),
        );
        (!snapshot.is_empty()).then_some(snapshot)
    }

    /// Narrow the report to what the flags ask for.
    fn select(&self, report: StatusReport) -> Result<StatusReport> {
        let mut report = report;
        if let Some(name) = &self.args.skill {
            let entry = report
                .skill(name)
                .cloned()
                .ok_or_else(|| SkillcheckError::UnknownSkill { name: name.clone() })?;
            report.skills = vec![entry];
        }
        if let Some(query) = &self.args.filter {
            let names: Vec<String> = report
                .filter(query)
                .into_iter()
                .map(|s| s.name.clone())
                .collect();
            report.skills.retain(|s| names.contains(&s.name));
        }
        if self.args.missing_only {
            report.skills.retain(|s| !s.ready);
        }
        Ok(report)
    }

    fn render(&self, ui: &mut dyn UserInterface, report: &StatusReport, total: usize) {
        let ready = report.skills.iter().filter(|s| s.ready).count();
        ui.show_header(&format!(
            "Skills · {}",
            display::ready_summary(ready, report.skills.len())
        ));

        let details = ui.output_mode().shows_details();
        if details {
            ui.message(&format!(
                "Environment: {}",
                display::format_env_chips(&report.env_status)
            ));
            ui.message("");
        }

        if report.skills.is_empty() {
            if total == 0 {
                ui.message("No skills found.");
                ui.show_hint(&format!(
                    "Add skills under {} or {}",
                    report.workspace_dir.join("skills").display(),
                    report.managed_skills_dir.display()
                ));
            } else {
                ui.message("No skills match.");
            }
            return;
        }

        for entry in &report.skills {
            display::show_skill_line(ui, entry);
            if details {
                display::show_skill_details(ui, entry);
            }
        }

        let installable: Vec<&SkillStatusEntry> = report
            .skills
            .iter()
            .filter(|s| s.eligible && s.can_install())
            .collect();
        if !installable.is_empty() {
            ui.message("");
            ui.show_hint(&format!(
                "Run `skillcheck install` to install requirements for {} skill{}",
                installable.len(),
                if installable.len() == 1 { "" } else { "s" }
            ));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.workspace_dir, self.config_override.as_deref())?;

        let remote = self.remote();
        let ctx = match &remote {
            Some(snapshot) => EligibilityContext::with_remote(snapshot),
            None => EligibilityContext::local(),
        };

        let report = workspace.report(&ctx);
        let total = report.skills.len();
        let report = self.select(report)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| SkillcheckError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.render(ui, &report, total);
        }

        Ok(CommandResult::success())
    }
}
