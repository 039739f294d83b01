//! Dotted-path lookups and truthiness over the merged configuration.
//!
//! Skills declare config requirements as dotted paths (`browser.enabled`,
//! `channels.discord.token`). A path is satisfied when the value it points
//! at is truthy. A few paths have a default that applies only when the
//! path is absent from the config entirely.

use serde_yaml::Value;

/// Defaults for paths that count as enabled unless configured otherwise.
pub const PATH_DEFAULTS: &[(&str, bool)] = &[
    ("browser.enabled", true),
    ("browser.evaluateEnabled", true),
];

/// Walk a dotted path through nested mappings.
///
/// Empty segments are ignored, so `"a..b"` and `"a.b"` are the same path.
/// Sequences are indexed by numeric segments. Returns `None` as soon as a
/// segment is missing or the current node is a scalar. An explicit YAML
/// `null` resolves to `Some(Value::Null)`.
pub fn resolve_path<'a>(config: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = config;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Mapping(_) => current.get(segment)?,
            Value::Sequence(_) => current.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Truthiness of an optional config value.
///
/// Absent and null are false, booleans are themselves, numbers are false
/// only at zero, strings are true when they contain non-whitespace, and
/// any other value (mapping, sequence, tagged) is true.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Look up the default registered for a path, if any.
pub fn path_default(path: &str) -> Option<bool> {
    PATH_DEFAULTS
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, default)| *default)
}

/// Whether a dotted config path counts as enabled.
///
/// The registered default applies only when the path is absent. An
/// explicit `false` or `null` overrides it.
pub fn is_path_truthy(config: &Value, path: &str) -> bool {
    match resolve_path(config, path) {
        None => path_default(path).unwrap_or(false),
        value => is_truthy(value),
    }
}
