//! Install command implementation.
//!
//! The `skillcheck install` command installs missing requirements for
//! every installable skill, or for one skill with `--skill`.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::requirements::{
    plan_installs, BatchInstaller, BatchObserver, CommandInstaller, EligibilityContext,
    InstallRequest, SkillInstallResult, SkillInstaller, StatusReport,
};
use crate::ui::{Prompt, PromptOption, SpinnerHandle, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::workspace::Workspace;

const CONFIRM_KEY: &str = "install_skills";
const OPTION_KEY: &str = "install_option";

/// The install command implementation.
pub struct InstallCommand {
    workspace_dir: PathBuf,
    config_override: Option<PathBuf>,
    args: InstallArgs,
    installer: Option<Box<dyn SkillInstaller>>,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(workspace_dir: &Path, args: InstallArgs) -> Self {
        Self {
            workspace_dir: workspace_dir.to_path_buf(),
            config_override: None,
            args,
            installer: None,
        }
    }

    /// Load this config file instead of the discovered ones.
    pub fn with_config(mut self, config: Option<&Path>) -> Self {
        self.config_override = config.map(Path::to_path_buf);
        self
    }

    /// Use a specific installer instead of [`CommandInstaller`].
    pub fn with_installer(mut self, installer: Box<dyn SkillInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InstallArgs {
        &self.args
    }

    /// Option id for a single-skill install.
    ///
    /// `--option` wins. Otherwise an interactive user picks among several
    /// options, starting on the preferred one.
    fn choose_option(
        &self,
        ui: &mut dyn UserInterface,
        report: &StatusReport,
    ) -> Result<Option<String>> {
        if self.args.option.is_some() || self.args.yes || !ui.is_interactive() {
            return Ok(self.args.option.clone());
        }
        let Some(entry) = self.args.skill.as_deref().and_then(|name| report.skill(name)) else {
            return Ok(None);
        };
        if entry.disabled || entry.install.len() < 2 {
            return Ok(None);
        }

        let options = entry
            .install
            .iter()
            .map(|o| PromptOption {
                label: o.label.clone(),
                value: o.id.clone(),
            })
            .collect();
        let prompt = Prompt::select(
            OPTION_KEY,
            format!("How should {} be installed?", entry.name),
            options,
            entry.preferred_install.clone(),
        );
        Ok(Some(ui.prompt(&prompt)?.as_string()))
    }

    fn confirm(&self, ui: &mut dyn UserInterface, count: usize) -> Result<bool> {
        if self.args.yes || self.args.dry_run {
            return Ok(true);
        }
        let mut prompt = Prompt::confirm(
            CONFIRM_KEY,
            format!(
                "Install requirements for {} skill{}?",
                count,
                if count == 1 { "" } else { "s" }
            ),
            true,
        );
        // Headless runs need --yes or SKILLCHECK_PROMPT_INSTALL_SKILLS.
        if !ui.is_interactive() {
            prompt.default = None;
        }
        Ok(ui.prompt(&prompt)?.as_bool().unwrap_or(false))
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.workspace_dir, self.config_override.as_deref())?;
        let report = workspace.report(&EligibilityContext::local());
        let node_manager = workspace.config.install_preferences().node_manager;

        let option = match self.args.skill {
            Some(_) => self.choose_option(ui, &report)?,
            None => None,
        };
        let requests = plan_installs(
            &report,
            &workspace.skills,
            node_manager,
            self.args.skill.as_deref(),
            option.as_deref(),
        )?;

        if requests.is_empty() {
            ui.success("Nothing to install");
            return Ok(CommandResult::success());
        }

        let title = if self.args.dry_run {
            "Install plan (dry run)"
        } else {
            "Install plan"
        };
        ui.show_header(title);
        for request in &requests {
            ui.message(&format!(
                "  {}: {} [{}]",
                request.skill, request.label, request.option_id
            ));
        }
        ui.message("");

        if !self.confirm(ui, requests.len())? {
            ui.warning("Install cancelled");
            return Ok(CommandResult::success());
        }

        let default_installer;
        let installer: &dyn SkillInstaller = match &self.installer {
            Some(installer) => installer.as_ref(),
            None => {
                default_installer = CommandInstaller::from_env()?;
                &default_installer
            }
        };

        let mut observer = SpinnerObserver::new(ui);
        let batch = BatchInstaller::new(installer)
            .dry_run(self.args.dry_run)
            .run(&requests, &mut observer);
        drop(observer);

        display::show_batch_summary(ui, &batch, self.args.dry_run);

        if batch.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

/// Drives one spinner per install.
struct SpinnerObserver<'u> {
    ui: &'u mut dyn UserInterface,
    spinner: Option<Box<dyn SpinnerHandle>>,
}

impl<'u> SpinnerObserver<'u> {
    fn new(ui: &'u mut dyn UserInterface) -> Self {
        Self { ui, spinner: None }
    }
}

impl BatchObserver for SpinnerObserver<'_> {
    fn on_start(&mut self, request: &InstallRequest, index: usize, total: usize) {
        if total > 1 {
            self.ui.show_progress(index + 1, total);
        }
        self.spinner = Some(
            self.ui
                .start_spinner(&format!("{} - {}", request.skill, request.label)),
        );
    }

    fn on_finish(&mut self, result: &SkillInstallResult) {
        if let Some(mut spinner) = self.spinner.take() {
            let line = format!("{}: {}", result.skill, result.outcome.message);
            if result.outcome.ok {
                spinner.finish_success(&line);
            } else {
                spinner.finish_error(&line);
            }
        }

        let show_output = self.ui.output_mode().shows_command_output() || !result.outcome.ok;
        if show_output {
            for text in [&result.outcome.stdout, &result.outcome.stderr] {
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    self.ui.message(&format!("    {}", line));
                }
            }
        }
    }
}
