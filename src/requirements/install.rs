//! Install specs and the option resolver.
//!
//! A skill declares install specs: ways to obtain what it needs. The
//! resolver drops specs for other operating systems, labels the rest, and
//! picks one preferred option. The preferred option is always chosen from
//! the filtered list, so it is never a spec the host cannot run.

use crate::config::NodeManager;
use crate::requirements::platform::{normalize_platforms, platform_allowed};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Installer kinds, in the order the resolver falls back through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallKind {
    Brew,
    Node,
    Go,
    Uv,
    Download,
}

impl InstallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Node => "node",
            Self::Go => "go",
            Self::Uv => "uv",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for InstallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an install spec obtains its tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum InstallMethod {
    /// `brew install <formula>`
    Brew {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formula: Option<String>,
    },
    /// Global install with the configured node package manager.
    Node {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
    },
    /// `go install <module>`
    Go {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
    },
    /// `uv tool install <package>`
    Uv {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
    },
    /// Fetch a file, optionally unpacking it.
    Download {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Archive format override (`tar.gz`, `zip`, ...).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        archive: Option<String>,
        /// Unpack after download. Defaults to true for known archive names.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extract: Option<bool>,
        #[serde(
            default,
            alias = "strip_components",
            skip_serializing_if = "Option::is_none"
        )]
        strip_components: Option<u32>,
        #[serde(default, alias = "target_dir", skip_serializing_if = "Option::is_none")]
        target_dir: Option<PathBuf>,
    },
}

impl InstallMethod {
    pub fn kind(&self) -> InstallKind {
        match self {
            Self::Brew { .. } => InstallKind::Brew,
            Self::Node { .. } => InstallKind::Node,
            Self::Go { .. } => InstallKind::Go,
            Self::Uv { .. } => InstallKind::Uv,
            Self::Download { .. } => InstallKind::Download,
        }
    }

    /// The formula, package, module or url, when set and non-blank.
    pub fn target(&self) -> Option<&str> {
        let value = match self {
            Self::Brew { formula } => formula,
            Self::Node { package } | Self::Uv { package } => package,
            Self::Go { module } => module,
            Self::Download { url, .. } => url,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// One declared remediation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Operating systems this spec applies to. Empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,
    /// Binaries the install provides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bins: Vec<String>,
    #[serde(flatten)]
    pub method: InstallMethod,
}

impl InstallSpec {
    /// A spec with only a method set.
    pub fn new(method: InstallMethod) -> Self {
        Self {
            id: None,
            label: None,
            os: Vec::new(),
            bins: Vec::new(),
            method,
        }
    }

    pub fn kind(&self) -> InstallKind {
        self.method.kind()
    }

    /// Canonicalize OS names.
    pub fn normalized(mut self) -> Self {
        self.os = normalize_platforms(&self.os);
        self
    }

    /// Whether this spec applies on `platform`.
    pub fn supports_platform(&self, platform: &str) -> bool {
        platform_allowed(&self.os, platform)
    }
}

/// User preferences that shape labels and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallPreferences {
    pub prefer_brew: bool,
    pub node_manager: NodeManager,
}

impl Default for InstallPreferences {
    fn default() -> Self {
        Self {
            prefer_brew: true,
            node_manager: NodeManager::Npm,
        }
    }
}

/// A display-ready install option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOption {
    pub id: String,
    pub kind: InstallKind,
    pub label: String,
    pub bins: Vec<String>,
    /// Position of the source spec in the skill's unfiltered list.
    #[serde(skip)]
    pub spec_index: usize,
}

/// Human label for a spec. An explicit non-blank label always wins.
pub fn install_label(spec: &InstallSpec, prefs: &InstallPreferences) -> String {
    if let Some(label) = spec.label.as_deref().map(str::trim) {
        if !label.is_empty() {
            return label.to_string();
        }
    }

    let Some(target) = spec.method.target() else {
        return "Run installer".to_string();
    };

    match spec.kind() {
        InstallKind::Brew => format!("Install {} (brew)", target),
        InstallKind::Node => format!("Install {} ({})", target, prefs.node_manager),
        InstallKind::Go => format!("Install {} (go)", target),
        InstallKind::Uv => format!("Install {} (uv)", target),
        InstallKind::Download => {
            let name = target
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(target);
            format!("Download {}", name)
        }
    }
}

/// Filter specs for `platform` and turn them into options.
///
/// Generated ids are `<kind>-<index>`, where the index counts only the
/// specs that survived filtering.
pub fn resolve_install_options(
    specs: &[InstallSpec],
    prefs: &InstallPreferences,
    platform: &str,
) -> Vec<InstallOption> {
    specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.supports_platform(platform))
        .enumerate()
        .map(|(index, (spec_index, spec))| {
            let id = spec
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}-{}", spec.kind(), index));
            InstallOption {
                id,
                kind: spec.kind(),
                label: install_label(spec, prefs),
                bins: spec.bins.clone(),
                spec_index,
            }
        })
        .collect()
}

/// Pick the option to offer first.
///
/// With `prefer_brew` and `brew` on the host, a brew option wins. Otherwise
/// the first uv, node, brew, then go option, falling back to the first
/// option of any kind.
pub fn select_preferred<'o>(
    options: &'o [InstallOption],
    prefs: &InstallPreferences,
    brew_available: bool,
) -> Option<&'o InstallOption> {
    let first_of = |kind: InstallKind| options.iter().find(|o| o.kind == kind);

    if prefs.prefer_brew && brew_available {
        if let Some(brew) = first_of(InstallKind::Brew) {
            return Some(brew);
        }
    }

    [
        InstallKind::Uv,
        InstallKind::Node,
        InstallKind::Brew,
        InstallKind::Go,
    ]
    .into_iter()
    .find_map(first_of)
    .or_else(|| options.first())
}
