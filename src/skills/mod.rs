//! Skill manifests and discovery.
//!
//! - [`manifest`] parses `SKILL.md` frontmatter into [`SkillEntry`] values
//! - [`loader`] scans the source directories in precedence order

pub mod loader;
pub mod manifest;

pub use loader::{load_skills, load_skills_from_dir, SkillDirs, WORKSPACE_SKILLS_DIR};
pub use manifest::{
    extract_frontmatter, load_skill_manifest, parse_skill_manifest, SkillEntry, SkillMetadata,
    SkillSource, SKILL_FILE,
};
