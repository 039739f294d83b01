//! Skill discovery across source directories.
//!
//! Sources are scanned lowest precedence first: extra dirs, bundled,
//! managed, then the workspace. A skill loaded from a later source replaces
//! one with the same name but keeps its position in the list.

use crate::config::{SkillsConfig, CONFIG_DIR};
use crate::skills::manifest::{load_skill_manifest, SkillEntry, SkillSource, SKILL_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace subdirectory holding project skills.
pub const WORKSPACE_SKILLS_DIR: &str = "skills";

/// Resolved skill directories for one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDirs {
    pub extra: Vec<PathBuf>,
    pub bundled: Option<PathBuf>,
    pub managed: PathBuf,
    pub workspace: PathBuf,
}

impl SkillDirs {
    /// Resolve directories using the real home directory.
    pub fn resolve(workspace_dir: &Path, config: &SkillsConfig) -> Self {
        Self::resolve_with_home(workspace_dir, config, dirs::home_dir().as_deref())
    }

    /// Resolve directories with an explicit home directory.
    ///
    /// Relative paths are taken from the workspace; `~` expands to `home`.
    pub fn resolve_with_home(
        workspace_dir: &Path,
        config: &SkillsConfig,
        home: Option<&Path>,
    ) -> Self {
        let expand = |p: &Path| expand_path(p, workspace_dir, home);
        let managed = match &config.managed_dir {
            Some(dir) => expand(dir),
            None => home
                .unwrap_or(workspace_dir)
                .join(CONFIG_DIR)
                .join("skills"),
        };
        Self {
            extra: config.load.extra_dirs.iter().map(|d| expand(d)).collect(),
            bundled: config.bundled_dir.as_deref().map(expand),
            managed,
            workspace: workspace_dir.join(WORKSPACE_SKILLS_DIR),
        }
    }

    /// Directories paired with their source, in scan order.
    pub fn sources(&self) -> Vec<(&Path, SkillSource)> {
        let mut sources: Vec<(&Path, SkillSource)> = self
            .extra
            .iter()
            .map(|d| (d.as_path(), SkillSource::Extra))
            .collect();
        if let Some(bundled) = &self.bundled {
            sources.push((bundled, SkillSource::Bundled));
        }
        sources.push((&self.managed, SkillSource::Managed));
        sources.push((&self.workspace, SkillSource::Workspace));
        sources
    }
}

fn expand_path(path: &Path, workspace_dir: &Path, home: Option<&Path>) -> PathBuf {
    if let (Ok(rest), Some(home)) = (path.strip_prefix("~"), home) {
        return home.join(rest);
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_dir.join(path)
    }
}

/// Load skills from every source directory.
///
/// Unreadable or malformed manifests are skipped with a warning.
pub fn load_skills(dirs: &SkillDirs) -> Vec<SkillEntry> {
    let mut skills: Vec<SkillEntry> = Vec::new();
    for (dir, source) in dirs.sources() {
        for entry in load_skills_from_dir(dir, source) {
            match skills.iter_mut().find(|s| s.name == entry.name) {
                Some(existing) => {
                    tracing::debug!(
                        "Skill '{}' from {} overrides {}",
                        entry.name,
                        entry.source,
                        existing.source
                    );
                    *existing = entry;
                }
                None => skills.push(entry),
            }
        }
    }
    skills
}

/// Load skills from the immediate subdirectories of `dir`, sorted by path.
pub fn load_skills_from_dir(dir: &Path, source: SkillSource) -> Vec<SkillEntry> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(_) => return Vec::new(),
    };

    let mut manifests: Vec<PathBuf> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().join(SKILL_FILE))
        .filter(|path| path.is_file())
        .collect();
    manifests.sort();

    manifests
        .into_iter()
        .filter_map(|path| match load_skill_manifest(&path, source) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping skill at {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}
