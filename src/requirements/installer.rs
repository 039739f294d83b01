//! Running install specs.
//!
//! [`SkillInstaller`] is the seam between planning and doing. The
//! production [`CommandInstaller`] launches package managers directly and
//! fetches download specs over HTTP. Ordinary failures (missing package
//! name, installer tool not on PATH, non-zero exit) come back as an
//! [`InstallOutcome`] with `ok == false`; an `Err` means the install could
//! not be attempted at all.

use crate::config::{NodeManager, CONFIG_DIR};
use crate::error::{Result, SkillcheckError};
use crate::requirements::install::{InstallKind, InstallMethod, InstallSpec};
use crate::requirements::probe::{parse_system_path, resolve_tool_path};
use crate::shell::{display_command, run_program, CommandOptions};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One install to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub skill: String,
    pub skill_key: String,
    pub option_id: String,
    pub label: String,
    pub spec: InstallSpec,
    pub node_manager: NodeManager,
}

/// What happened when an install ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub ok: bool,
    pub message: String,
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl InstallOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            stdout: String::new(),
            stderr: String::new(),
            code: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            ..Self::succeeded(message)
        }
    }
}

/// Performs installs.
pub trait SkillInstaller {
    /// Run one install.
    fn install(&self, request: &InstallRequest) -> Result<InstallOutcome>;

    /// What `install` would do, for dry runs.
    fn describe(&self, request: &InstallRequest) -> String {
        request.label.clone()
    }
}

/// Program and arguments for a package-manager spec.
///
/// Returns `None` for downloads and for specs missing their package name.
pub fn install_command(
    method: &InstallMethod,
    node_manager: NodeManager,
) -> Option<(String, Vec<String>)> {
    let target = method.target()?.to_string();
    let (program, mut args): (&str, Vec<String>) = match method {
        InstallMethod::Brew { .. } => ("brew", vec!["install".to_string()]),
        InstallMethod::Node { .. } => (
            node_manager.as_str(),
            node_manager
                .global_install_args()
                .iter()
                .map(|a| a.to_string())
                .collect(),
        ),
        InstallMethod::Go { .. } => {
            let module = if target.contains('@') {
                target
            } else {
                format!("{}@latest", target)
            };
            return Some(("go".to_string(), vec!["install".to_string(), module]));
        }
        InstallMethod::Uv { .. } => ("uv", vec!["tool".to_string(), "install".to_string()]),
        InstallMethod::Download { .. } => return None,
    };
    args.push(target);
    Some((program.to_string(), args))
}

fn missing_field(kind: InstallKind) -> &'static str {
    match kind {
        InstallKind::Brew => "formula",
        InstallKind::Node | InstallKind::Uv => "package",
        InstallKind::Go => "module",
        InstallKind::Download => "url",
    }
}

/// A single normal path component (no separators, no `.` or `..`).
fn is_safe_dir_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

/// Archive formats the installer can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    Zip,
}

/// Archive format from an explicit name or the file name.
pub fn archive_kind(archive: Option<&str>, file_name: &str) -> Option<ArchiveKind> {
    let name = archive.unwrap_or(file_name).trim().to_lowercase();
    if name.ends_with("zip") {
        Some(ArchiveKind::Zip)
    } else if name.ends_with(".tar")
        || name.ends_with(".tar.gz")
        || name.ends_with(".tgz")
        || name.ends_with(".tar.bz2")
        || name.ends_with(".tar.xz")
        || matches!(name.as_str(), "tar" | "tar.gz" | "tgz" | "tar.bz2" | "tar.xz")
    {
        Some(ArchiveKind::Tar)
    } else {
        None
    }
}

/// Installs by running package managers and downloading files.
pub struct CommandInstaller {
    path_entries: Vec<PathBuf>,
    tools_dir: PathBuf,
    client: Client,
}

impl CommandInstaller {
    /// Use the process PATH and `~/.skillcheck/tools` for downloads.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(parse_system_path(), home.join(CONFIG_DIR).join("tools"))
    }

    pub fn new(path_entries: Vec<PathBuf>, tools_dir: PathBuf) -> Result<Self> {
        Self::with_timeout(path_entries, tools_dir, Duration::from_secs(120))
    }

    pub fn with_timeout(
        path_entries: Vec<PathBuf>,
        tools_dir: PathBuf,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("skillcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| SkillcheckError::Other(e.into()))?;
        Ok(Self {
            path_entries,
            tools_dir,
            client,
        })
    }

    /// Default directory for a skill's downloads.
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    fn run_package_manager(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        let kind = request.spec.kind();
        let Some((program, args)) = install_command(&request.spec.method, request.node_manager)
        else {
            return Ok(InstallOutcome::failed(format!(
                "Install option '{}' has no {}",
                request.option_id,
                missing_field(kind)
            )));
        };

        let command = display_command(&program, &args);
        let Some(path) = resolve_tool_path(&program, &self.path_entries) else {
            return Ok(InstallOutcome::failed(format!(
                "{} is not installed (needed for: {})",
                program, command
            )));
        };

        let result = run_program(&path, &args, &CommandOptions::captured())?;
        let message = if result.success {
            format!("Installed via {}", command)
        } else {
            match result.exit_code {
                Some(code) => format!("{} exited with code {}", command, code),
                None => format!("{} was terminated", command),
            }
        };
        Ok(InstallOutcome {
            ok: result.success,
            message,
            stdout: result.stdout,
            stderr: result.stderr,
            code: result.exit_code,
        })
    }

    fn download(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        let InstallMethod::Download {
            archive,
            extract,
            strip_components,
            target_dir,
            ..
        } = &request.spec.method
        else {
            return Ok(InstallOutcome::failed("Not a download spec"));
        };
        let Some(url) = request.spec.method.target() else {
            return Ok(InstallOutcome::failed(format!(
                "Install option '{}' has no url",
                request.option_id
            )));
        };

        let target = match target_dir {
            Some(dir) => dir.clone(),
            None if is_safe_dir_name(&request.skill_key) => {
                self.tools_dir.join(&request.skill_key)
            }
            None => {
                return Ok(InstallOutcome::failed(format!(
                    "Skill key '{}' is not a valid directory name; set targetDir",
                    request.skill_key
                )));
            }
        };

        let download_error = |message: String| SkillcheckError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }
        let bytes = response
            .bytes()
            .map_err(|e| download_error(e.to_string()))?;

        fs::create_dir_all(&target)?;
        let file_name = url
            .rsplit('/')
            .next()
            .map(|s| s.split(['?', '#']).next().unwrap_or(s))
            .filter(|s| !s.is_empty())
            .unwrap_or("download");
        let file_path = target.join(file_name);
        fs::write(&file_path, &bytes)?;
        tracing::debug!("Downloaded {} bytes to {}", bytes.len(), file_path.display());

        let kind = archive_kind(archive.as_deref(), file_name);
        if !extract.unwrap_or(kind.is_some()) {
            return Ok(InstallOutcome::succeeded(format!(
                "Downloaded {}",
                file_path.display()
            )));
        }
        let Some(kind) = kind else {
            return Ok(InstallOutcome::failed(format!(
                "Don't know how to extract {}",
                file_name
            )));
        };
        self.extract(kind, &file_path, &target, *strip_components)
    }

    fn extract(
        &self,
        kind: ArchiveKind,
        archive: &Path,
        target: &Path,
        strip_components: Option<u32>,
    ) -> Result<InstallOutcome> {
        let archive_arg = archive.to_string_lossy().into_owned();
        let target_arg = target.to_string_lossy().into_owned();
        let (program, args) = match kind {
            ArchiveKind::Tar => {
                let mut args = vec!["-xf".to_string(), archive_arg, "-C".to_string(), target_arg];
                if let Some(n) = strip_components.filter(|n| *n > 0) {
                    args.push(format!("--strip-components={}", n));
                }
                ("tar", args)
            }
            ArchiveKind::Zip => ("unzip", vec!["-o".to_string(), archive_arg, "-d".to_string(), target_arg]),
        };

        let Some(path) = resolve_tool_path(program, &self.path_entries) else {
            return Ok(InstallOutcome::failed(format!(
                "{} is not installed; cannot extract {}",
                program,
                archive.display()
            )));
        };
        let result = run_program(&path, &args, &CommandOptions::captured())?;
        Ok(InstallOutcome {
            ok: result.success,
            message: if result.success {
                format!("Extracted to {}", target.display())
            } else {
                format!("Extracting {} failed", archive.display())
            },
            stdout: result.stdout,
            stderr: result.stderr,
            code: result.exit_code,
        })
    }
}

impl SkillInstaller for CommandInstaller {
    fn install(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        tracing::info!("Installing '{}' via {}", request.skill, request.option_id);
        match request.spec.kind() {
            InstallKind::Download => self.download(request),
            _ => self.run_package_manager(request),
        }
    }

    fn describe(&self, request: &InstallRequest) -> String {
        match install_command(&request.spec.method, request.node_manager) {
            Some((program, args)) => display_command(&program, &args),
            None => match (&request.spec.method, request.spec.method.target()) {
                (InstallMethod::Download { .. }, Some(url)) => format!("download {}", url),
                _ => request.label.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn request(method: InstallMethod) -> InstallRequest {
        InstallRequest {
            skill: "demo".to_string(),
            skill_key: "demo".to_string(),
            option_id: format!("{}-0", method.kind()),
            label: "Install demo".to_string(),
            spec: InstallSpec::new(method),
            node_manager: NodeManager::Npm,
        }
    }

    fn installer(temp: &TempDir, path_entries: Vec<PathBuf>) -> CommandInstaller {
        CommandInstaller::with_timeout(
            path_entries,
            temp.path().join("tools"),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[test]
    fn commands_per_kind() {
        let brew = InstallMethod::Brew {
            formula: Some("gh".to_string()),
        };
        assert_eq!(
            install_command(&brew, NodeManager::Npm),
            Some(("brew".to_string(), vec!["install".to_string(), "gh".to_string()]))
        );

        let node = InstallMethod::Node {
            package: Some("clawhub".to_string()),
        };
        let (program, args) = install_command(&node, NodeManager::Yarn).unwrap();
        assert_eq!(program, "yarn");
        assert_eq!(args, vec!["global", "add", "clawhub"]);

        let uv = InstallMethod::Uv {
            package: Some("ruff".to_string()),
        };
        let (_, args) = install_command(&uv, NodeManager::Npm).unwrap();
        assert_eq!(args, vec!["tool", "install", "ruff"]);
    }

    #[test]
    fn go_modules_get_latest_when_unversioned() {
        let go = InstallMethod::Go {
            module: Some("example.com/tool".to_string()),
        };
        let (_, args) = install_command(&go, NodeManager::Npm).unwrap();
        assert_eq!(args, vec!["install", "example.com/tool@latest"]);

        let pinned = InstallMethod::Go {
            module: Some("example.com/tool@v1.2.0".to_string()),
        };
        let (_, args) = install_command(&pinned, NodeManager::Npm).unwrap();
        assert_eq!(args, vec!["install", "example.com/tool@v1.2.0"]);
    }

    #[test]
    fn missing_target_has_no_command() {
        assert!(install_command(&InstallMethod::Brew { formula: None }, NodeManager::Npm).is_none());
        let download = InstallMethod::Download {
            url: Some("https://x.dev/a".to_string()),
            archive: None,
            extract: None,
            strip_components: None,
            target_dir: None,
        };
        assert!(install_command(&download, NodeManager::Npm).is_none());
    }

    #[test]
    fn archive_kinds() {
        assert_eq!(archive_kind(None, "tool.tar.gz"), Some(ArchiveKind::Tar));
        assert_eq!(archive_kind(None, "tool.tgz"), Some(ArchiveKind::Tar));
        assert_eq!(archive_kind(None, "tool.zip"), Some(ArchiveKind::Zip));
        assert_eq!(archive_kind(None, "tool"), None);
        assert_eq!(archive_kind(Some("tar.gz"), "tool"), Some(ArchiveKind::Tar));
    }

    #[test]
    fn missing_field_fails_without_spawning() {
        let temp = TempDir::new().unwrap();
        let outcome = installer(&temp, Vec::new())
            .install(&request(InstallMethod::Node { package: None }))
            .unwrap();
        assert!(!outcome.ok);
        assert!(outcome.message.contains("package"));
    }

    #[test]
    fn missing_tool_fails_without_spawning() {
        let temp = TempDir::new().unwrap();
        let outcome = installer(&temp, Vec::new())
            .install(&request(InstallMethod::Brew {
                formula: Some("gh".to_string()),
            }))
            .unwrap();
        assert!(!outcome.ok);
        assert!(outcome.message.contains("brew is not installed"));
    }

    #[cfg(unix)]
    fn fake_tool(dir: &Path, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn runs_package_manager_with_arguments() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_tool(&bin, "brew", "echo \"brew $@\"");

        let outcome = installer(&temp, vec![bin])
            .install(&request(InstallMethod::Brew {
                formula: Some("gh".to_string()),
            }))
            .unwrap();
        assert!(outcome.ok, "{:?}", outcome);
        assert_eq!(outcome.stdout.trim(), "brew install gh");
        assert_eq!(outcome.code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failed_outcome() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_tool(&bin, "uv", "echo boom >&2; exit 4");

        let outcome = installer(&temp, vec![bin])
            .install(&request(InstallMethod::Uv {
                package: Some("ruff".to_string()),
            }))
            .unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.code, Some(4));
        assert!(outcome.stderr.contains("boom"));
        assert!(outcome.message.contains("exited with code 4"));
    }

    #[test]
    fn download_saves_file_to_target_dir() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/tool");
            then.status(200).body("binary-content");
        });

        let temp = TempDir::new().unwrap();
        let outcome = installer(&temp, Vec::new())
            .install(&request(InstallMethod::Download {
                url: Some(server.url("/releases/tool")),
                archive: None,
                extract: None,
                strip_components: None,
                target_dir: None,
            }))
            .unwrap();

        assert!(outcome.ok, "{:?}", outcome);
        let saved = temp.path().join("tools").join("demo").join("tool");
        assert_eq!(fs::read_to_string(saved).unwrap(), "binary-content");
    }

    #[test]
    fn download_rejects_skill_key_outside_tools_dir() {
        let server = MockServer::start();
        let fetch = server.mock(|when, then| {
            when.method(GET).path("/tool");
            then.status(200).body("binary-content");
        });

        let temp = TempDir::new().unwrap();
        let installer = installer(&temp, Vec::new());
        for key in ["../../escape", "nested/key", "..", ""] {
            let mut req = request(InstallMethod::Download {
                url: Some(server.url("/tool")),
                archive: None,
                extract: None,
                strip_components: None,
                target_dir: None,
            });
            req.skill_key = key.to_string();
            let outcome = installer.install(&req).unwrap();
            assert!(!outcome.ok, "{:?} accepted", key);
            assert!(outcome.message.contains("targetDir"));
        }
        fetch.assert_hits(0);
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn safe_dir_names() {
        assert!(is_safe_dir_name("weather"));
        assert!(is_safe_dir_name("gh.cli"));
        assert!(!is_safe_dir_name("a/b"));
        assert!(!is_safe_dir_name("a\\b"));
        assert!(!is_safe_dir_name(".."));
        assert!(!is_safe_dir_name("x..y"));
    }

    #[test]
    fn download_http_error_is_download_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.tgz");
            then.status(404).body("Not Found");
        });

        let temp = TempDir::new().unwrap();
        let err = installer(&temp, Vec::new())
            .install(&request(InstallMethod::Download {
                url: Some(server.url("/missing.tgz")),
                archive: None,
                extract: None,
                strip_components: None,
                target_dir: None,
            }))
            .unwrap_err();

        match err {
            SkillcheckError::DownloadFailed { message, .. } => {
                assert!(message.contains("404"), "{}", message)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extract_without_tool_is_failed_outcome() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tool.zip");
            then.status(200).body("PK");
        });

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("custom");
        let outcome = installer(&temp, Vec::new())
            .install(&request(InstallMethod::Download {
                url: Some(server.url("/tool.zip")),
                archive: None,
                extract: None,
                strip_components: None,
                target_dir: Some(target.clone()),
            }))
            .unwrap();

        assert!(!outcome.ok);
        assert!(outcome.message.contains("unzip is not installed"));
        assert!(target.join("tool.zip").is_file());
    }

    #[test]
    fn describe_shows_command_line() {
        let temp = TempDir::new().unwrap();
        let installer = installer(&temp, Vec::new());
        let mut req = request(InstallMethod::Node {
            package: Some("clawhub".to_string()),
        });
        req.node_manager = NodeManager::Pnpm;
        assert_eq!(installer.describe(&req), "pnpm add -g clawhub");

        let download = request(InstallMethod::Download {
            url: Some("https://x.dev/a.tgz".to_string()),
            archive: None,
            extract: None,
            strip_components: None,
            target_dir: None,
        });
        assert_eq!(installer.describe(&download), "download https://x.dev/a.tgz");
    }
}
