//! Public API tests: from skill directories to install plans.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use skillcheck::config::Config;
use skillcheck::requirements::{
    plan_installs, BatchInstaller, EligibilityContext, HostProbe, InstallOutcome, InstallRequest,
    RemoteSnapshot, SkillInstaller, StatusReporter,
};
use skillcheck::skills::{load_skills, SkillDirs, SkillSource};
use skillcheck::SkillcheckError;
use tempfile::TempDir;

fn write_skill(dir: &Path, name: &str, frontmatter: &str) {
    let skill_dir = dir.join(name);
    fs::create_dir_all(&skill_dir).unwrap();
    fs::write(
        skill_dir.join("SKILL.md"),
        format!("---\nname: {}\n{}---\n", name, frontmatter),
    )
    .unwrap();
}

#[cfg(unix)]
fn fake_bin(dir: &Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn fake_bin(dir: &Path, name: &str) {
    fs::write(dir.join(format!("{}.exe", name)), "").unwrap();
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        let skills = temp.path().join("skills");
        write_skill(
            &skills,
            "github",
            "description: GitHub CLI\nmetadata:\n  requires:\n    bins: [gh]\n  install:\n    - kind: brew\n      formula: gh\n    - kind: node\n      package: gh-cli\n",
        );
        write_skill(
            &skills,
            "weather",
            "description: Forecasts\nmetadata:\n  primaryEnv: WEATHER_KEY\n  requires:\n    env: [WEATHER_KEY]\n",
        );
        write_skill(
            &skills,
            "browser",
            "description: Drive a browser\nmetadata:\n  requires:\n    config: [browser.enabled]\n",
        );
        write_skill(
            &skills,
            "imessage",
            "description: Messages\nmetadata:\n  os: [macos]\n  requires:\n    bins: [imsg]\n",
        );
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn probe(&self) -> HostProbe {
        HostProbe::new(vec![self.root().join("bin")], self.root())
    }

    fn skills(&self) -> Vec<skillcheck::skills::SkillEntry> {
        let config = Config::default();
        let mut dirs = SkillDirs::resolve_with_home(self.root(), config.skills(), None);
        dirs.managed = self.root().join("managed");
        load_skills(&dirs)
    }
}

#[test]
fn report_covers_every_requirement_kind() {
    let fixture = Fixture::new();
    let probe = fixture.probe();
    let config = Config::from_yaml(
        "browser:\n  enabled: false\nskills:\n  entries:\n    weather:\n      apiKey: abc123\n",
        Path::new("config.yml"),
    )
    .unwrap();
    let skills = fixture.skills();

    let report = StatusReporter::new(&probe, &config)
        .with_env(|_| None)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::local());

    let names: Vec<&str> = report.skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["browser", "github", "imessage", "weather"]);
    assert!(report.skills.iter().all(|s| s.source == SkillSource::Workspace));

    let github = report.skill("github").unwrap();
    assert_eq!(github.missing.bins, vec!["gh"]);
    assert!(github.can_install());

    // primaryEnv is satisfied by the configured api key
    assert!(report.skill("weather").unwrap().ready);

    let browser = report.skill("browser").unwrap();
    assert_eq!(browser.missing.config, vec!["browser.enabled"]);
    assert!(!browser.config_checks[0].satisfied);

    let imessage = report.skill("imessage").unwrap();
    assert_eq!(imessage.missing.os, vec!["darwin"]);
    assert!(imessage.eligible);
    assert!(!imessage.ready);
}

#[test]
fn installed_binary_makes_skill_ready() {
    let fixture = Fixture::new();
    fake_bin(&fixture.root().join("bin"), "gh");
    let probe = fixture.probe();
    let config = Config::default();
    let skills = fixture.skills();

    let report = StatusReporter::new(&probe, &config)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::local());

    let github = report.skill("github").unwrap();
    assert!(github.ready);
    assert!(!github.can_install());
    // browser.enabled defaults to on when unset
    assert!(report.skill("browser").unwrap().ready);
}

#[test]
fn remote_snapshot_satisfies_os_and_bins() {
    let fixture = Fixture::new();
    let probe = fixture.probe();
    let config = Config::default();
    let skills = fixture.skills();
    let remote = RemoteSnapshot::new(["macos"], ["imsg"]);

    let report = StatusReporter::new(&probe, &config)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::with_remote(&remote));

    assert!(report.skill("imessage").unwrap().ready);
}

#[test]
fn node_manager_drives_labels_and_preference() {
    let fixture = Fixture::new();
    let probe = fixture.probe();
    let config = Config::from_yaml(
        "skills:\n  install:\n    nodeManager: pnpm\n",
        Path::new("config.yml"),
    )
    .unwrap();
    let skills = fixture.skills();

    let report = StatusReporter::new(&probe, &config)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::local());

    let github = report.skill("github").unwrap();
    let labels: Vec<&str> = github.install.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Install gh (brew)", "Install gh-cli (pnpm)"]);
    // brew is not on the probe PATH, so node wins over brew
    assert_eq!(github.preferred_install.as_deref(), Some("node-1"));
}

struct Recorder {
    seen: RefCell<Vec<String>>,
}

impl SkillInstaller for Recorder {
    fn install(&self, request: &InstallRequest) -> skillcheck::Result<InstallOutcome> {
        self.seen
            .borrow_mut()
            .push(format!("{}:{}", request.skill, request.option_id));
        if request.skill == "github" {
            Err(SkillcheckError::CommandFailed {
                command: "npm install -g gh-cli".to_string(),
                code: Some(1),
            })
        } else {
            Ok(InstallOutcome::succeeded("ok"))
        }
    }
}

#[test]
fn batch_plan_and_run() {
    let fixture = Fixture::new();
    let probe = fixture.probe();
    let config = Config::default();
    let skills = fixture.skills();
    let report = StatusReporter::new(&probe, &config)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::local());

    let prefs = config.install_preferences();
    let requests = plan_installs(&report, &skills, prefs.node_manager, None, None).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].skill, "github");

    let recorder = Recorder {
        seen: RefCell::new(Vec::new()),
    };
    let batch = BatchInstaller::new(&recorder).run(&requests, &mut ());

    assert_eq!(*recorder.seen.borrow(), vec!["github:node-1"]);
    assert_eq!(batch.failed(), 1);
    assert!(!batch.is_success());
    assert!(batch.results[0].outcome.message.contains("npm install -g gh-cli"));
}

#[test]
fn plan_rejects_unknown_names() {
    let fixture = Fixture::new();
    let probe = fixture.probe();
    let config = Config::default();
    let skills = fixture.skills();
    let report = StatusReporter::new(&probe, &config)
        .with_platform("linux")
        .build_report(&skills, &EligibilityContext::local());
    let nm = config.install_preferences().node_manager;

    assert!(matches!(
        plan_installs(&report, &skills, nm, Some("nope"), None),
        Err(SkillcheckError::UnknownSkill { .. })
    ));
    assert!(matches!(
        plan_installs(&report, &skills, nm, Some("github"), Some("go-0")),
        Err(SkillcheckError::UnknownInstallOption { .. })
    ));
}
