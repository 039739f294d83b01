//! Skill eligibility evaluation and install resolution.
//!
//! # Modules
//!
//! - [`probe`] - Host probe for binaries, runtimes and package dependencies
//! - [`platform`] - Host platform naming
//! - [`eligibility`] - Request-scoped remote capability hints
//! - [`evaluator`] - Per-skill missing-requirement computation
//! - [`install`] - Install specs, labels and preferred-option selection
//! - [`status`] - Status entry and report types
//! - [`report`] - Status report assembly
//! - [`installer`] - Running install specs
//! - [`batch`] - Planning and running installs for many skills

pub mod batch;
pub mod eligibility;
pub mod evaluator;
pub mod install;
pub mod installer;
pub mod platform;
pub mod probe;
pub mod report;
pub mod status;

pub use batch::{plan_installs, BatchInstaller, BatchObserver, BatchReport, SkillInstallResult};
pub use eligibility::{EligibilityContext, RemoteEligibility, RemoteSnapshot};
pub use evaluator::{Evaluation, RequirementEvaluator};
pub use install::{
    install_label, resolve_install_options, select_preferred, InstallKind, InstallMethod,
    InstallOption, InstallPreferences, InstallSpec,
};
pub use installer::{CommandInstaller, InstallOutcome, InstallRequest, SkillInstaller};
pub use probe::{DependencyCache, HostProbe};
pub use report::StatusReporter;
pub use status::{ConfigCheck, RequirementLists, SkillStatusEntry, StatusReport};
