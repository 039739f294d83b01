//! Per-skill requirement evaluation.
//!
//! Each requirement category is checked against the host probe, the merged
//! config, the process environment and optional remote hints. The result
//! lists what is still missing per category. A category list is empty
//! exactly when every requirement in it is satisfied.

use crate::config::{accessor, Config};
use crate::requirements::eligibility::EligibilityContext;
use crate::requirements::platform::{current_platform, platform_allowed};
use crate::requirements::probe::HostProbe;
use crate::requirements::status::{ConfigCheck, RequirementLists};
use crate::skills::SkillEntry;

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Outcome of evaluating one skill.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Explicitly disabled in config.
    pub disabled: bool,
    /// Visible and offerable. Only disabling clears this.
    pub eligible: bool,
    /// Eligible with nothing missing.
    pub ready: bool,
    pub missing: RequirementLists,
    pub config_checks: Vec<ConfigCheck>,
}

/// Computes missing requirements for skills.
pub struct RequirementEvaluator<'a> {
    probe: &'a HostProbe,
    config: &'a Config,
    platform: String,
    env: EnvLookup<'a>,
}

impl<'a> RequirementEvaluator<'a> {
    /// Evaluate against the current platform and process environment.
    pub fn new(probe: &'a HostProbe, config: &'a Config) -> Self {
        Self {
            probe,
            config,
            platform: current_platform().to_string(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the environment lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Evaluate as if running on another platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Platform the evaluator checks against.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Evaluate one skill.
    pub fn evaluate(&self, skill: &SkillEntry, ctx: &EligibilityContext<'_>) -> Evaluation {
        let requires = &skill.metadata.requires;
        let disabled = self
            .config
            .skill_entry(skill.skill_key())
            .is_some_and(|e| e.is_disabled());

        let (config_missing, config_checks) = self.check_config(&requires.config);

        let missing = RequirementLists {
            bins: requires
                .bins
                .iter()
                .filter(|b| !self.probe.has_binary(b) && !ctx.remote_has_bin(b))
                .cloned()
                .collect(),
            any_bins: self.missing_any_bins(&requires.any_bins, ctx),
            env: requires
                .env
                .iter()
                .filter(|name| !self.env_satisfied(skill, name))
                .cloned()
                .collect(),
            config: config_missing,
            os: self.missing_os(&requires.os, ctx),
            dependencies: requires
                .dependencies
                .iter()
                .filter(|d| !self.probe.has_dependency(d))
                .cloned()
                .collect(),
            languages: requires
                .languages
                .iter()
                .filter(|l| !self.probe.has_language_runtime(l))
                .cloned()
                .collect(),
        };

        let eligible = !disabled;
        let ready = eligible && missing.is_empty();
        if !missing.is_empty() {
            tracing::debug!(
                "Skill '{}' is missing: {}",
                skill.name,
                missing.labels().join(", ")
            );
        }

        Evaluation {
            disabled,
            eligible,
            ready,
            missing,
            config_checks,
        }
    }

    /// All-or-nothing: one hit anywhere satisfies the whole list.
    fn missing_any_bins(&self, any_bins: &[String], ctx: &EligibilityContext<'_>) -> Vec<String> {
        if any_bins.is_empty()
            || any_bins.iter().any(|b| self.probe.has_binary(b))
            || ctx.remote_has_any_bin(any_bins)
        {
            Vec::new()
        } else {
            any_bins.to_vec()
        }
    }

    fn missing_os(&self, os: &[String], ctx: &EligibilityContext<'_>) -> Vec<String> {
        if platform_allowed(os, &self.platform) || ctx.remote_platform_in(os) {
            Vec::new()
        } else {
            os.to_vec()
        }
    }

    fn env_satisfied(&self, skill: &SkillEntry, name: &str) -> bool {
        if (self.env)(name).is_some_and(|v| !v.is_empty()) {
            return true;
        }
        let Some(entry) = self.config.skill_entry(skill.skill_key()) else {
            return false;
        };
        if entry.env.get(name).is_some_and(|v| !v.is_empty()) {
            return true;
        }
        skill.metadata.primary_env.as_deref() == Some(name) && entry.api_key().is_some()
    }

    /// Every path gets a check; unsatisfied ones are also reported missing.
    fn check_config(&self, paths: &[String]) -> (Vec<String>, Vec<ConfigCheck>) {
        let mut missing = Vec::new();
        let mut checks = Vec::with_capacity(paths.len());
        for path in paths {
            let satisfied = self.config.is_path_truthy(path);
            if !satisfied {
                missing.push(path.clone());
            }
            checks.push(ConfigCheck {
                path: path.clone(),
                value: accessor::resolve_path(self.config.raw(), path).cloned(),
                satisfied,
            });
        }
        (missing, checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::eligibility::RemoteSnapshot;
    use crate::skills::{SkillMetadata, SkillSource};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Host {
        temp: TempDir,
        bin: PathBuf,
    }

    impl Host {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let bin = temp.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            Self { temp, bin }
        }

        fn with_bins(bins: &[&str]) -> Self {
            let host = Self::new();
            for name in bins {
                let path = host.bin.join(name);
                fs::write(&path, "#!/bin/sh\n").unwrap();
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
                }
            }
            host
        }

        fn probe(&self) -> HostProbe {
            HostProbe::new(vec![self.bin.clone()], self.temp.path())
        }
    }

    fn parse_config(yaml: &str) -> Config {
        Config::from_yaml(yaml, Path::new("test.yml")).unwrap()
    }

    fn skill(requires: RequirementLists) -> SkillEntry {
        SkillEntry::new("demo", SkillSource::Workspace, PathBuf::from("/skills/demo"))
            .with_metadata(SkillMetadata {
                requires,
                ..Default::default()
            })
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_requirements_are_ready() {
        let host = Host::new();
        let probe = host.probe();
        let config = Config::default();
        let eval = RequirementEvaluator::new(&probe, &config)
            .with_env(no_env)
            .evaluate(&skill(RequirementLists::default()), &EligibilityContext::local());

        assert!(eval.missing.is_empty());
        assert!(eval.eligible);
        assert!(eval.ready);
        assert!(!eval.disabled);
    }

    #[test]
    fn bins_found_on_path_are_not_missing() {
        let host = Host::with_bins(&["git"]);
        let probe = host.probe();
        let config = Config::default();
        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                bins: strings(&["git", "gh"]),
                ..Default::default()
            }),
            &EligibilityContext::local(),
        );
        assert_eq!(eval.missing.bins, vec!["gh"]);
        assert!(eval.eligible);
        assert!(!eval.ready);
    }

    #[test]
    fn remote_bins_satisfy_requirements() {
        let host = Host::new();
        let probe = host.probe();
        let config = Config::default();
        let remote = RemoteSnapshot::new(["linux"], ["gh"]);
        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                bins: strings(&["gh"]),
                ..Default::default()
            }),
            &EligibilityContext::with_remote(&remote),
        );
        assert!(eval.missing.bins.is_empty());
    }

    #[test]
    fn any_bins_none_found_reports_whole_list() {
        let host = Host::new();
        let probe = host.probe();
        let config = Config::default();
        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                any_bins: strings(&["go", "rust"]),
                ..Default::default()
            }),
            &EligibilityContext::local(),
        );
        assert_eq!(eval.missing.any_bins, vec!["go", "rust"]);
    }

    #[test]
    fn any_bins_one_found_is_satisfied() {
        let host = Host::with_bins(&["rust"]);
        let probe = host.probe();
        let config = Config::default();
        let requires = RequirementLists {
            any_bins: strings(&["go", "rust"]),
            ..Default::default()
        };
        let eval = RequirementEvaluator::new(&probe, &config)
            .evaluate(&skill(requires.clone()), &EligibilityContext::local());
        assert!(eval.missing.any_bins.is_empty());

        let bare = Host::new();
        let bare_probe = bare.probe();
        let remote = RemoteSnapshot::new(Vec::<String>::new(), ["go"]);
        let eval = RequirementEvaluator::new(&bare_probe, &config)
            .evaluate(&skill(requires), &EligibilityContext::with_remote(&remote));
        assert!(eval.missing.any_bins.is_empty());
    }

    #[test]
    fn os_mismatch_reports_full_list() {
        let host = Host::new();
        let probe = host.probe();
        let config = Config::default();
        let requires = RequirementLists {
            os: strings(&["darwin", "win32"]),
            ..Default::default()
        };

        let eval = RequirementEvaluator::new(&probe, &config)
            .with_platform("linux")
            .evaluate(&skill(requires.clone()), &EligibilityContext::local());
        assert_eq!(eval.missing.os, vec!["darwin", "win32"]);
        assert!(eval.eligible);

        let eval = RequirementEvaluator::new(&probe, &config)
            .with_platform("darwin")
            .evaluate(&skill(requires.clone()), &EligibilityContext::local());
        assert!(eval.missing.os.is_empty());

        let remote = RemoteSnapshot::new(["macos"], Vec::<String>::new());
        let eval = RequirementEvaluator::new(&probe, &config)
            .with_platform("linux")
            .evaluate(&skill(requires), &EligibilityContext::with_remote(&remote));
        assert!(eval.missing.os.is_empty());
    }

    #[test]
    fn env_unset_everywhere_is_missing() {
        let host = Host::new();
        let probe = host.probe();
        let config = Config::default();
        let eval = RequirementEvaluator::new(&probe, &config)
            .with_env(no_env)
            .evaluate(
                &skill(RequirementLists {
                    env: strings(&["API_KEY"]),
                    ..Default::default()
                }),
                &EligibilityContext::local(),
            );
        assert_eq!(eval.missing.env, vec!["API_KEY"]);
    }

    #[test]
    fn env_sources_satisfy_requirement() {
        let host = Host::new();
        let probe = host.probe();
        let requires = RequirementLists {
            env: strings(&["API_KEY", "REGION"]),
            ..Default::default()
        };

        // process environment, empty values don't count
        let config = Config::default();
        let eval = RequirementEvaluator::new(&probe, &config)
            .with_env(|k| match k {
                "API_KEY" => Some("abc".to_string()),
                "REGION" => Some(String::new()),
                _ => None,
            })
            .evaluate(&skill(requires.clone()), &EligibilityContext::local());
        assert_eq!(eval.missing.env, vec!["REGION"]);

        // per-skill overrides
        let config = parse_config("skills:\n  entries:\n    demo:\n      env:\n        API_KEY: x\n        REGION: eu\n");
        let eval = RequirementEvaluator::new(&probe, &config)
            .with_env(no_env)
            .evaluate(&skill(requires), &EligibilityContext::local());
        assert!(eval.missing.env.is_empty());
    }

    #[test]
    fn stored_secret_satisfies_primary_env_only() {
        let host = Host::new();
        let probe = host.probe();
        let config = parse_config("skills:\n  entries:\n    demo:\n      apiKey: secret\n");
        let mut entry = skill(RequirementLists {
            env: strings(&["API_KEY", "OTHER"]),
            ..Default::default()
        });
        entry.metadata.primary_env = Some("API_KEY".to_string());

        let eval = RequirementEvaluator::new(&probe, &config)
            .with_env(no_env)
            .evaluate(&entry, &EligibilityContext::local());
        assert_eq!(eval.missing.env, vec!["OTHER"]);
    }

    #[test]
    fn config_paths_are_checked_with_defaults() {
        let host = Host::new();
        let probe = host.probe();
        let config = parse_config("channels:\n  slack: false\n");
        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                config: strings(&["browser.enabled", "channels.slack", "channels.discord.token"]),
                ..Default::default()
            }),
            &EligibilityContext::local(),
        );

        assert_eq!(eval.missing.config, vec!["channels.slack", "channels.discord.token"]);
        assert_eq!(eval.config_checks.len(), 3);
        assert!(eval.config_checks[0].satisfied);
        assert!(eval.config_checks[0].value.is_none());
        assert_eq!(
            eval.config_checks[1].value,
            Some(serde_yaml::Value::Bool(false))
        );
        assert!(!eval.config_checks[1].satisfied);
    }

    #[test]
    fn explicit_false_overrides_path_default() {
        let host = Host::new();
        let probe = host.probe();
        let config = parse_config("browser:\n  enabled: false\n");
        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                config: strings(&["browser.enabled"]),
                ..Default::default()
            }),
            &EligibilityContext::local(),
        );
        assert_eq!(eval.missing.config, vec!["browser.enabled"]);
    }

    #[test]
    fn dependencies_and_languages_ignore_remote() {
        let host = Host::with_bins(&["python3"]);
        fs::write(
            host.temp.path().join("package.json"),
            r#"{"dependencies": {"left-pad": "1"}}"#,
        )
        .unwrap();
        let probe = host.probe();
        let config = Config::default();
        let remote = RemoteSnapshot::new(["linux"], ["cargo", "react"]);

        let eval = RequirementEvaluator::new(&probe, &config).evaluate(
            &skill(RequirementLists {
                dependencies: strings(&["left-pad", "react"]),
                languages: strings(&["python", "rust"]),
                ..Default::default()
            }),
            &EligibilityContext::with_remote(&remote),
        );
        assert_eq!(eval.missing.dependencies, vec!["react"]);
        assert_eq!(eval.missing.languages, vec!["rust"]);
    }

    #[test]
    fn disabled_skill_is_never_eligible() {
        let host = Host::with_bins(&["git"]);
        let probe = host.probe();
        let config = parse_config("skills:\n  entries:\n    demo:\n      enabled: false\n");

        for requires in [
            RequirementLists::default(),
            RequirementLists {
                bins: strings(&["git"]),
                ..Default::default()
            },
            RequirementLists {
                bins: strings(&["nope"]),
                ..Default::default()
            },
        ] {
            let eval = RequirementEvaluator::new(&probe, &config)
                .evaluate(&skill(requires), &EligibilityContext::local());
            assert!(eval.disabled);
            assert!(!eval.eligible);
            assert!(!eval.ready);
        }
    }

    #[test]
    fn disabled_lookup_uses_skill_key() {
        let host = Host::new();
        let probe = host.probe();
        let config = parse_config("skills:\n  entries:\n    custom-key:\n      enabled: false\n");
        let mut entry = skill(RequirementLists::default());
        entry.metadata.skill_key = Some("custom-key".to_string());

        let eval = RequirementEvaluator::new(&probe, &config)
            .evaluate(&entry, &EligibilityContext::local());
        assert!(!eval.eligible);
    }
}
