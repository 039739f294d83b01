//! Batch installation.
//!
//! Planning turns a status report into concrete [`InstallRequest`]s.
//! Running them goes through a [`SkillInstaller`]; one skill failing never
//! stops the rest.

use crate::config::NodeManager;
use crate::error::{Result, SkillcheckError};
use crate::requirements::installer::{InstallOutcome, InstallRequest, SkillInstaller};
use crate::requirements::status::{SkillStatusEntry, StatusReport};
use crate::skills::SkillEntry;

/// Plan installs from a report.
///
/// With `skill`, plans that one skill using `option` or its preferred
/// option. Without, plans every install candidate with its preferred
/// option.
///
/// # Errors
///
/// `UnknownSkill` and `UnknownInstallOption` for bad names, and
/// `InstallFailed` when the named skill is disabled or has nothing to
/// install on this platform.
pub fn plan_installs(
    report: &StatusReport,
    skills: &[SkillEntry],
    node_manager: NodeManager,
    skill: Option<&str>,
    option: Option<&str>,
) -> Result<Vec<InstallRequest>> {
    let Some(name) = skill else {
        return Ok(report
            .install_candidates()
            .into_iter()
            .filter_map(|entry| {
                let option = entry.preferred_option()?;
                request_for(entry, &option.id, skills, node_manager)
            })
            .collect());
    };

    let entry = report
        .skill(name)
        .ok_or_else(|| SkillcheckError::UnknownSkill {
            name: name.to_string(),
        })?;
    if entry.disabled {
        return Err(SkillcheckError::InstallFailed {
            skill: entry.name.clone(),
            message: "skill is disabled in config".to_string(),
        });
    }

    let option_id = match option {
        Some(id) => entry
            .install_option(id)
            .ok_or_else(|| SkillcheckError::UnknownInstallOption {
                skill: entry.name.clone(),
                id: id.to_string(),
            })?
            .id
            .clone(),
        None => entry
            .preferred_option()
            .ok_or_else(|| SkillcheckError::InstallFailed {
                skill: entry.name.clone(),
                message: "no install options for this platform".to_string(),
            })?
            .id
            .clone(),
    };

    let request = request_for(entry, &option_id, skills, node_manager).ok_or_else(|| {
        SkillcheckError::InstallFailed {
            skill: entry.name.clone(),
            message: "skill manifest is no longer loaded".to_string(),
        }
    })?;
    Ok(vec![request])
}

fn request_for(
    entry: &SkillStatusEntry,
    option_id: &str,
    skills: &[SkillEntry],
    node_manager: NodeManager,
) -> Option<InstallRequest> {
    let option = entry.install_option(option_id)?;
    let skill = skills.iter().find(|s| s.name == entry.name)?;
    let spec = skill.metadata.install.get(option.spec_index)?;
    Some(InstallRequest {
        skill: entry.name.clone(),
        skill_key: entry.skill_key.clone(),
        option_id: option.id.clone(),
        label: option.label.clone(),
        spec: spec.clone(),
        node_manager,
    })
}

/// Result for one skill in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillInstallResult {
    pub skill: String,
    pub option_id: String,
    pub label: String,
    pub outcome: InstallOutcome,
}

/// Results of a batch, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<SkillInstallResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SkillInstallResult> {
        self.results.iter().filter(|r| !r.outcome.ok)
    }

    /// True when nothing failed (including an empty batch).
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Progress callbacks for a running batch.
pub trait BatchObserver {
    fn on_start(&mut self, _request: &InstallRequest, _index: usize, _total: usize) {}
    fn on_finish(&mut self, _result: &SkillInstallResult) {}
}

impl BatchObserver for () {}

/// Runs install requests one after another.
pub struct BatchInstaller<'a> {
    installer: &'a dyn SkillInstaller,
    dry_run: bool,
}

impl<'a> BatchInstaller<'a> {
    pub fn new(installer: &'a dyn SkillInstaller) -> Self {
        Self {
            installer,
            dry_run: false,
        }
    }

    /// Describe each install instead of running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run every request. Errors become failed results for that skill.
    pub fn run(&self, requests: &[InstallRequest], observer: &mut dyn BatchObserver) -> BatchReport {
        let total = requests.len();
        let mut report = BatchReport::default();

        for (index, request) in requests.iter().enumerate() {
            observer.on_start(request, index, total);

            let outcome = if self.dry_run {
                InstallOutcome::succeeded(format!(
                    "Would run: {}",
                    self.installer.describe(request)
                ))
            } else {
                match self.installer.install(request) {
                    Ok(outcome) => {
                        if !outcome.ok {
                            tracing::warn!(
                                "Install of '{}' failed: {}",
                                request.skill,
                                outcome.message
                            );
                        }
                        outcome
                    }
                    Err(e) => {
                        tracing::error!("Install of '{}' errored: {}", request.skill, e);
                        InstallOutcome::failed(e.to_string())
                    }
                }
            };

            let result = SkillInstallResult {
                skill: request.skill.clone(),
                option_id: request.option_id.clone(),
                label: request.label.clone(),
                outcome,
            };
            observer.on_finish(&result);
            report.results.push(result);
        }

        report
    }
}
