//! Loading everything a command needs about a workspace.

use std::path::{Path, PathBuf};

use crate::config::{load_config, Config};
use crate::error::Result;
use crate::requirements::{EligibilityContext, HostProbe, StatusReport, StatusReporter};
use crate::skills::{load_skills, SkillDirs, SkillEntry};

/// Config, skills and host probe for one workspace.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub dirs: SkillDirs,
    pub skills: Vec<SkillEntry>,
    pub probe: HostProbe,
}

impl Workspace {
    /// Load config and skills, probing the real host.
    pub fn load(root: &Path, config_override: Option<&Path>) -> Result<Self> {
        let config = load_config(root, config_override)?;
        let dirs = SkillDirs::resolve(root, config.skills());
        let skills = load_skills(&dirs);
        tracing::debug!("Loaded {} skills for {}", skills.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            config,
            dirs,
            skills,
            probe: HostProbe::from_env(root),
        })
    }

    /// Build the status report for every loaded skill.
    pub fn report(&self, ctx: &EligibilityContext<'_>) -> StatusReport {
        StatusReporter::new(&self.probe, &self.config)
            .with_dirs(self.root.clone(), self.dirs.managed.clone())
            .build_report(&self.skills, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_skill(dir: &Path, name: &str, body: &str) {
        let skill_dir = dir.join(name);
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(
            skill_dir.join("SKILL.md"),
            format!("---\nname: {}\ndescription: {} skill\n{}---\n", name, name, body),
        )
        .unwrap();
    }

    #[test]
    fn loads_workspace_skills_and_reports() {
        let temp = TempDir::new().unwrap();
        let managed = temp.path().join("managed");
        fs::create_dir_all(temp.path().join(".skillcheck")).unwrap();
        fs::write(
            temp.path().join(".skillcheck/config.yml"),
            format!("skills:\n  managedDir: {}\n", managed.display()),
        )
        .unwrap();
        write_skill(&temp.path().join("skills"), "notes", "");

        let ws = Workspace::load(temp.path(), None).unwrap();
        assert_eq!(ws.skills.len(), 1);
        assert_eq!(ws.dirs.managed, managed);

        let report = ws.report(&EligibilityContext::local());
        assert_eq!(report.workspace_dir, temp.path());
        assert_eq!(report.managed_skills_dir, managed);
        assert!(report.skill("notes").unwrap().ready);
    }
}
