//! Error types for skillcheck operations.
//!
//! This module defines [`SkillcheckError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Host probing and config lookups never fail; they degrade to "not found"
//! - Use `SkillcheckError` for failures a caller needs to tell apart
//! - Use `anyhow::Error` (via `SkillcheckError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for skillcheck operations.
#[derive(Debug, Error)]
pub enum SkillcheckError {
    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to parse a skill manifest.
    #[error("Failed to parse skill manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// No loaded skill has this name.
    #[error("Unknown skill: {name}")]
    UnknownSkill { name: String },

    /// The skill has no install option with this id.
    #[error("Skill '{skill}' has no install option '{id}'")]
    UnknownInstallOption { skill: String, id: String },

    /// An installer could not be run for a skill.
    #[error("Install failed for '{skill}': {message}")]
    InstallFailed { skill: String, message: String },

    /// Installer process failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Download of an installer artifact failed.
    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    /// A prompt needed an answer but none could be given.
    #[error("Cannot prompt for '{key}' in non-interactive mode (no default value)")]
    PromptUnavailable { key: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkillcheckError {
    /// Process exit code for this error.
    ///
    /// Unknown skill or install option names exit with 2, everything
    /// else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownSkill { .. } | Self::UnknownInstallOption { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for skillcheck operations.
pub type Result<T> = std::result::Result<T, SkillcheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = SkillcheckError::ConfigNotFound {
            path: PathBuf::from("/foo/skills.yml"),
        };
        assert!(err.to_string().contains("/foo/skills.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SkillcheckError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn manifest_parse_error_displays_path() {
        let err = SkillcheckError::ManifestParseError {
            path: PathBuf::from("/skills/weather/SKILL.md"),
            message: "missing frontmatter".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("weather/SKILL.md"));
        assert!(msg.contains("missing frontmatter"));
    }

    #[test]
    fn unknown_skill_displays_name() {
        let err = SkillcheckError::UnknownSkill {
            name: "nonexistent".into(),
        };
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn unknown_install_option_displays_skill_and_id() {
        let err = SkillcheckError::UnknownInstallOption {
            skill: "gh".into(),
            id: "brew-9".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gh"));
        assert!(msg.contains("brew-9"));
    }

    #[test]
    fn install_failed_displays_skill_and_message() {
        let err = SkillcheckError::InstallFailed {
            skill: "summarize".into(),
            message: "installer crashed".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("summarize"));
        assert!(msg.contains("installer crashed"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SkillcheckError::CommandFailed {
            command: "brew install gh".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("brew install gh"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn download_failed_displays_url() {
        let err = SkillcheckError::DownloadFailed {
            url: "https://example.com/tool.tar.gz".into(),
            message: "HTTP 404".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/tool.tar.gz"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn prompt_unavailable_displays_key() {
        let err = SkillcheckError::PromptUnavailable {
            key: "install_skills".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("install_skills"));
        assert!(msg.contains("non-interactive"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SkillcheckError = io_err.into();
        assert!(matches!(err, SkillcheckError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts_transparently() {
        let err: SkillcheckError = anyhow::anyhow!("something odd").into();
        assert_eq!(err.to_string(), "something odd");
    }

    #[test]
    fn exit_codes_separate_unknown_names() {
        let unknown = SkillcheckError::UnknownSkill { name: "x".into() };
        let option = SkillcheckError::UnknownInstallOption {
            skill: "x".into(),
            id: "go-0".into(),
        };
        let failed = SkillcheckError::InstallFailed {
            skill: "x".into(),
            message: "boom".into(),
        };
        assert_eq!(unknown.exit_code(), 2);
        assert_eq!(option.exit_code(), 2);
        assert_eq!(failed.exit_code(), 1);
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SkillcheckError::UnknownSkill {
                name: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
