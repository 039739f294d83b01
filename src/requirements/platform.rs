//! Host platform naming.
//!
//! Skill manifests list operating systems as `darwin`, `linux` and `win32`.
//! Common aliases are folded into those names so `macos` and `darwin`
//! compare equal.

/// Name of the platform this binary was built for.
pub fn current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "windows") {
        "win32"
    } else {
        std::env::consts::OS
    }
}

/// Fold an OS name into its canonical form.
pub fn normalize_platform(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "macos" | "mac" | "osx" | "darwin" => "darwin".to_string(),
        "windows" | "win" | "win32" => "win32".to_string(),
        _ => lower,
    }
}

/// Normalize a list of OS names, dropping blanks.
pub fn normalize_platforms(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| normalize_platform(n))
        .filter(|n| !n.is_empty())
        .collect()
}

/// Whether `platform` is allowed by an OS list. An empty list allows all.
pub fn platform_allowed(allowed: &[String], platform: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|p| normalize_platform(p) == platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_is_canonical() {
        let platform = current_platform();
        assert_eq!(normalize_platform(platform), platform);
        #[cfg(target_os = "linux")]
        assert_eq!(platform, "linux");
        #[cfg(target_os = "macos")]
        assert_eq!(platform, "darwin");
    }

    #[test]
    fn aliases_are_folded() {
        assert_eq!(normalize_platform("macOS"), "darwin");
        assert_eq!(normalize_platform("osx"), "darwin");
        assert_eq!(normalize_platform("Windows"), "win32");
        assert_eq!(normalize_platform(" Linux "), "linux");
        assert_eq!(normalize_platform("freebsd"), "freebsd");
    }

    #[test]
    fn blanks_are_dropped() {
        let names = vec!["mac".to_string(), " ".to_string(), "linux".to_string()];
        assert_eq!(normalize_platforms(&names), vec!["darwin", "linux"]);
    }

    #[test]
    fn empty_list_allows_any_platform() {
        assert!(platform_allowed(&[], "linux"));
    }

    #[test]
    fn list_membership_uses_canonical_names() {
        let allowed = vec!["macos".to_string()];
        assert!(platform_allowed(&allowed, "darwin"));
        assert!(!platform_allowed(&allowed, "linux"));
    }
}
