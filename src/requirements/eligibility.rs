//! Request-scoped remote capability hints.
//!
//! A skill may run on a remote node instead of the local host. When the
//! caller knows what that node offers, binaries and platforms it reports
//! satisfy requirements the local host lacks. Hints are already-resolved
//! values; nothing here performs I/O.

use crate::requirements::platform::normalize_platform;
use std::collections::BTreeSet;

/// Capabilities reported by a remote execution node.
pub trait RemoteEligibility {
    /// Platforms the remote can run on.
    fn platforms(&self) -> &[String];

    /// Whether the remote has a binary.
    fn has_bin(&self, bin: &str) -> bool;

    /// Whether the remote has at least one of the binaries.
    fn has_any_bin(&self, bins: &[String]) -> bool {
        bins.iter().any(|b| self.has_bin(b))
    }
}

/// A fixed set of remote platforms and binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSnapshot {
    platforms: Vec<String>,
    bins: BTreeSet<String>,
}

impl RemoteSnapshot {
    /// Build a snapshot. Platform names are normalized.
    pub fn new<P, B>(platforms: P, bins: B) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for p in platforms {
            let p = normalize_platform(p.as_ref());
            if !p.is_empty() && !normalized.contains(&p) {
                normalized.push(p);
            }
        }
        Self {
            platforms: normalized,
            bins: bins
                .into_iter()
                .map(Into::<String>::into)
                .filter(|b| !b.is_empty())
                .collect(),
        }
    }

    /// True when the snapshot reports nothing.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.bins.is_empty()
    }
}

impl RemoteEligibility for RemoteSnapshot {
    fn platforms(&self) -> &[String] {
        &self.platforms
    }

    fn has_bin(&self, bin: &str) -> bool {
        self.bins.contains(bin)
    }
}

/// Optional remote hints for one evaluation request.
#[derive(Clone, Copy, Default)]
pub struct EligibilityContext<'a> {
    remote: Option<&'a dyn RemoteEligibility>,
}

impl<'a> EligibilityContext<'a> {
    /// No remote hints; only the local host counts.
    pub fn local() -> Self {
        Self { remote: None }
    }

    /// Consult a remote node in addition to the local host.
    pub fn with_remote(remote: &'a dyn RemoteEligibility) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// The remote, if any.
    pub fn remote(&self) -> Option<&'a dyn RemoteEligibility> {
        self.remote
    }

    /// Whether the remote reports a binary.
    pub fn remote_has_bin(&self, bin: &str) -> bool {
        self.remote.is_some_and(|r| r.has_bin(bin))
    }

    /// Whether the remote reports any of the binaries.
    pub fn remote_has_any_bin(&self, bins: &[String]) -> bool {
        self.remote.is_some_and(|r| r.has_any_bin(bins))
    }

    /// Whether any remote platform appears in an allowed OS list.
    pub fn remote_platform_in(&self, allowed: &[String]) -> bool {
        self.remote.is_some_and(|r| {
            r.platforms()
                .iter()
                .any(|p| allowed.iter().any(|a| normalize_platform(a) == *p))
        })
    }
}
