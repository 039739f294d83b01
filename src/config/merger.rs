//! Layered merging of YAML config documents.
//!
//! - Mappings merge recursively
//! - Sequences and scalars in the overlay replace the base value
//! - A null in the overlay deletes the key from the base

use serde_yaml::Value;

/// Merge `overlay` on top of `base`, returning a new value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Fold documents in order; later documents win.
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn local_entry_overrides_single_field() {
        let base = yaml(
            r#"
skills:
  entries:
    gh:
      enabled: true
      env:
        GH_HOST: github.com
"#,
        );
        let overlay = yaml(
            r#"
skills:
  entries:
    gh:
      enabled: false
"#,
        );

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["skills"]["entries"]["gh"]["enabled"], false);
        assert_eq!(
            merged["skills"]["entries"]["gh"]["env"]["GH_HOST"],
            "github.com"
        );
    }

    #[test]
    fn sequences_are_replaced() {
        let base = yaml("skills:\n  allow_bundled: [a, b]\n");
        let overlay = yaml("skills:\n  allow_bundled: [c]\n");

        let merged = deep_merge(&base, &overlay);
        let list = merged["skills"]["allow_bundled"].as_sequence().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], "c");
    }

    #[test]
    fn null_removes_key() {
        let base = yaml("browser:\n  enabled: false\n  headless: true\n");
        let overlay = yaml("browser:\n  enabled: null\n");

        let merged = deep_merge(&base, &overlay);
        assert!(merged["browser"].get("enabled").is_none());
        assert_eq!(merged["browser"]["headless"], true);
    }

    #[test]
    fn new_keys_are_added() {
        let merged = deep_merge(&yaml("a: 1\n"), &yaml("b: 2\n"));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn scalar_overlay_replaces_mapping() {
        let merged = deep_merge(&yaml("browser:\n  enabled: true\n"), &yaml("browser: off\n"));
        assert_eq!(merged["browser"], "off");
    }

    #[test]
    fn merge_configs_applies_in_order() {
        let configs = vec![
            yaml("skills:\n  install:\n    node_manager: npm\n"),
            yaml("skills:\n  install:\n    node_manager: pnpm\n"),
            yaml("skills:\n  install:\n    prefer_brew: false\n"),
        ];
        let merged = merge_configs(&configs);
        assert_eq!(merged["skills"]["install"]["node_manager"], "pnpm");
        assert_eq!(merged["skills"]["install"]["prefer_brew"], false);
    }

    #[test]
    fn merge_of_nothing_is_empty_mapping() {
        let merged = merge_configs(&[]);
        assert!(merged.as_mapping().unwrap().is_empty());
    }
}
