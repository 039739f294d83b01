//! Host probe for binaries, language runtimes and package dependencies.
//!
//! Lookups never fail: unreadable directories, permission errors and
//! malformed manifests all count as "not found". Binary lookup walks the
//! search path directly instead of shelling out to `which`, whose behavior
//! varies across systems.
//!
//! # Example
//!
//! ```no_run
//! use skillcheck::requirements::probe::HostProbe;
//! use std::path::Path;
//!
//! let probe = HostProbe::from_env(Path::new("."));
//! if probe.has_binary("git") {
//!     println!("git is available");
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name of the package manifest read for dependency checks.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's path by iterating over search path entries.
///
/// Returns the first regular, executable file named `tool`.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH into directories, skipping empty entries.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| {
            std::env::split_paths(&path)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Executable that provides a language runtime.
///
/// Matching is case-insensitive; unknown names are probed as given.
pub fn language_executable(language: &str) -> String {
    let trimmed = language.trim();
    let mapped = match trimmed.to_lowercase().as_str() {
        "php" => "php",
        "python" => "python3",
        "golang" | "go" => "go",
        "rust" => "cargo",
        "cpp" => "g++",
        "c" => "gcc",
        _ => trimmed,
    };
    mapped.to_string()
}

/// Lazily loaded view of the workspace package manifest.
///
/// The manifest is read at most once; later changes on disk are not seen.
#[derive(Debug)]
pub struct DependencyCache {
    manifest_path: PathBuf,
    dependencies: OnceLock<BTreeMap<String, String>>,
}

impl DependencyCache {
    /// Create an empty cache for a manifest path.
    pub fn new(manifest_path: PathBuf) -> Self {
        Self {
            manifest_path,
            dependencies: OnceLock::new(),
        }
    }

    /// Path of the manifest this cache reads.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Whether the manifest has been read yet.
    pub fn is_loaded(&self) -> bool {
        self.dependencies.get().is_some()
    }

    /// Merged dependency map, reading the manifest on first use.
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        self.dependencies
            .get_or_init(|| read_manifest_dependencies(&self.manifest_path))
    }
}

/// Read `dependencies`, `devDependencies` and `optionalDependencies`.
///
/// Earlier sections win for duplicate names. A missing or malformed
/// manifest yields an empty map.
fn read_manifest_dependencies(path: &Path) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("No package manifest at {}: {}", path.display(), e);
            return merged;
        }
    };
    let manifest: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Ignoring malformed manifest {}: {}", path.display(), e);
            return merged;
        }
    };

    for section in ["dependencies", "devDependencies", "optionalDependencies"] {
        let Some(entries) = manifest.get(section).and_then(|s| s.as_object()) else {
            continue;
        };
        for (name, version) in entries {
            let version = version
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| version.to_string());
            merged.entry(name.clone()).or_insert(version);
        }
    }

    tracing::debug!(
        "Loaded {} dependencies from {}",
        merged.len(),
        path.display()
    );
    merged
}

/// Answers "is this available on the host" questions.
#[derive(Debug)]
pub struct HostProbe {
    path_entries: Vec<PathBuf>,
    cache: DependencyCache,
}

impl HostProbe {
    /// Probe using the process PATH and the workspace's package manifest.
    pub fn from_env(workspace_dir: &Path) -> Self {
        Self::new(parse_system_path(), workspace_dir)
    }

    /// Probe with explicit search path entries.
    pub fn new(path_entries: Vec<PathBuf>, workspace_dir: &Path) -> Self {
        let path_entries = path_entries
            .into_iter()
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        Self {
            path_entries,
            cache: DependencyCache::new(workspace_dir.join(PACKAGE_MANIFEST)),
        }
    }

    /// Directories searched for binaries.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// The dependency cache owned by this probe.
    pub fn dependency_cache(&self) -> &DependencyCache {
        &self.cache
    }

    /// Location of an executable on the search path.
    pub fn find_binary(&self, name: &str) -> Option<PathBuf> {
        resolve_tool_path(name, &self.path_entries)
    }

    /// Whether an executable is on the search path.
    pub fn has_binary(&self, name: &str) -> bool {
        let found = self.find_binary(name).is_some();
        if !found {
            tracing::debug!("Binary '{}' not found on PATH", name);
        }
        found
    }

    /// Whether the executable for a language runtime is available.
    pub fn has_language_runtime(&self, language: &str) -> bool {
        self.has_binary(&language_executable(language))
    }

    /// Whether the workspace manifest lists a package.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.cache.dependencies().contains_key(name)
    }
}
