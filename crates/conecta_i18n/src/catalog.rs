use std::collections::HashMap;

use thiserror::Error;

use crate::message::{ArgValue, Message};

const MAX_CATALOG_ENTRIES: usize = 10_000;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;
const MAX_EXPANDED_BYTES: usize = 64 * 1024;
const MAX_NESTING_DEPTH: usize = 8;

fn is_valid_segment(seg: &str) -> bool {
    let mut it = seg.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn join_key(prefix: &str, seg: &str) -> String {
    if prefix.is_empty() {
        seg.to_string()
    } else {
        format!("{prefix}.{seg}")
    }
}

/// One language's translation table.
///
/// Parsed from a YAML mapping. Nested mappings are flattened to dot-path
/// keys at load time (`tabs: { explore: ... }` becomes `tabs.explore`), so
/// lookups stay O(1) regardless of how the source file is organized.
/// Templates may contain `{{name}}` placeholders filled in per lookup.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a YAML mapping, flattening nested sections to dot-path keys.
    pub fn parse(src: &str) -> Result<Self, CatalogParseError> {
        let root = match serde_yaml::from_str::<serde_yaml::Value>(src) {
            Ok(serde_yaml::Value::Mapping(m)) => m,
            // An empty file is an empty catalog.
            Ok(serde_yaml::Value::Null) => serde_yaml::Mapping::new(),
            Ok(_) => {
                return Err(CatalogParseError::Yaml(
                    "catalog root must be a mapping".to_string(),
                ))
            }
            Err(e) => return Err(CatalogParseError::Yaml(format!("yaml parse error: {e}"))),
        };

        let mut cat = Self::new();
        flatten_into(&mut cat.entries, "", root, 0)?;
        Ok(cat)
    }

    /// Resolve a message against this catalog: template lookup by key id,
    /// then placeholder substitution. `None` when the key has no entry.
    pub fn format_message(&self, msg: &Message) -> Option<String> {
        let tmpl = self.get(msg.id.as_ref())?;
        let args = msg
            .args
            .iter()
            .map(|(k, v)| (k.as_ref(), v))
            .collect::<Vec<_>>();
        Some(apply_placeholders(tmpl, &args))
    }
}

#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("yaml catalog error: {0}")]
    Yaml(String),

    #[error("catalog entry `{key}`: {msg}")]
    Entry { key: String, msg: String },
}

fn flatten_into(
    entries: &mut HashMap<String, String>,
    prefix: &str,
    map: serde_yaml::Mapping,
    depth: usize,
) -> Result<(), CatalogParseError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CatalogParseError::Entry {
            key: prefix.to_string(),
            msg: format!("nesting too deep (max {MAX_NESTING_DEPTH} levels)"),
        });
    }

    for (k, v) in map {
        let Some(seg) = k.as_str() else {
            return Err(CatalogParseError::Entry {
                key: prefix.to_string(),
                msg: "keys must be strings".to_string(),
            });
        };
        if !is_valid_segment(seg) {
            return Err(CatalogParseError::Entry {
                key: join_key(prefix, seg),
                msg: "invalid key segment (allowed: [A-Za-z0-9][A-Za-z0-9_-]*)".to_string(),
            });
        }

        let key = join_key(prefix, seg);
        if key.len() > MAX_KEY_BYTES {
            return Err(CatalogParseError::Entry {
                key,
                msg: format!("key is too long (max {MAX_KEY_BYTES} bytes)"),
            });
        }

        match v {
            serde_yaml::Value::String(s) => {
                if s.len() > MAX_VALUE_BYTES {
                    return Err(CatalogParseError::Entry {
                        key,
                        msg: format!("value is too long (max {MAX_VALUE_BYTES} bytes)"),
                    });
                }
                if entries.len() >= MAX_CATALOG_ENTRIES && !entries.contains_key(&key) {
                    return Err(CatalogParseError::Entry {
                        key,
                        msg: format!("too many entries (max {MAX_CATALOG_ENTRIES})"),
                    });
                }
                entries.insert(key, s);
            }
            serde_yaml::Value::Mapping(m) => flatten_into(entries, &key, m, depth + 1)?,
            _ => {
                return Err(CatalogParseError::Entry {
                    key,
                    msg: "values must be strings or nested mappings".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn truncate_to_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

/// Replace `{{name}}` tokens with the matching argument's rendered value.
///
/// Placeholders with no matching argument stay in the output verbatim,
/// braces included, so a missing parameter is visible instead of silently
/// producing a hole. A `{{` with no closing `}}` is literal text.
fn apply_placeholders(tmpl: &str, args: &[(&str, &ArgValue)]) -> String {
    if !tmpl.contains("{{") {
        return tmpl.to_string();
    }

    let mut out = String::with_capacity(std::cmp::min(tmpl.len() + 16, MAX_EXPANDED_BYTES));
    let mut rest = tmpl;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);

        let tail = &rest[start + 2..];
        let Some(end) = tail.find("}}") else {
            // Unclosed token: the remainder is literal text.
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let raw = &tail[..end];
        let name = raw.trim();
        let value = args.iter().find(|&&(k, _)| k == name).map(|&(_, v)| v);

        match value {
            Some(v) if !name.is_empty() => out.push_str(&v.render()),
            _ => {
                // Keep unmatched placeholders visible.
                out.push_str("{{");
                out.push_str(raw);
                out.push_str("}}");
            }
        }

        rest = &tail[end + 2..];
        if out.len() >= MAX_EXPANDED_BYTES {
            break;
        }
    }

    out.push_str(rest);
    truncate_to_char_boundary(&mut out, MAX_EXPANDED_BYTES);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_flat_mapping_and_lookup() {
        let src = r#"
explore: "Explore"
greeting: "Hello, {{name}}!"
"#;

        let cat = Catalog::parse(src).unwrap();
        assert_eq!(cat.get("explore"), Some("Explore"));

        let s = cat
            .format_message(&Message::new("greeting").arg("name", "Ana"))
            .unwrap();
        assert_eq!(s, "Hello, Ana!");
    }

    #[test]
    fn nested_mappings_flatten_to_dot_paths() {
        let src = r#"
tabs:
  explore: "Explore"
  map: "Map"
markets:
  open-now: "Open now"
"#;

        let cat = Catalog::parse(src).unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.get("tabs.explore"), Some("Explore"));
        assert_eq!(cat.get("markets.open-now"), Some("Open now"));
        assert_eq!(cat.get("tabs"), None);
    }

    #[test]
    fn every_placeholder_occurrence_is_replaced() {
        let name = ArgValue::from("Ana");
        let args = &[("name", &name)];
        assert_eq!(
            apply_placeholders("{{name}}, meet {{name}}", args),
            "Ana, meet Ana"
        );
    }

    #[test]
    fn unmatched_placeholder_stays_verbatim() {
        let name = ArgValue::from("Ana");
        let args = &[("name", &name)];
        assert_eq!(
            apply_placeholders("Hello, {{name}}! It is {{time}}.", args),
            "Hello, Ana! It is {{time}}."
        );
        assert_eq!(apply_placeholders("Hello, {{name}}!", &[]), "Hello, {{name}}!");
    }

    #[test]
    fn unclosed_token_is_literal() {
        let name = ArgValue::from("Ana");
        let args = &[("name", &name)];
        assert_eq!(apply_placeholders("Hello, {{name", args), "Hello, {{name");
        assert_eq!(apply_placeholders("{{", args), "{{");
    }

    #[test]
    fn single_braces_pass_through() {
        assert_eq!(apply_placeholders("a {b} c", &[]), "a {b} c");
        assert_eq!(apply_placeholders("{{}}", &[]), "{{}}");
    }

    #[test]
    fn numeric_args_render_as_strings() {
        let count = ArgValue::from(3);
        let args = &[("count", &count)];
        assert_eq!(
            apply_placeholders("{{count}} events this week", args),
            "3 events this week"
        );
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = Catalog::parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, CatalogParseError::Yaml(_)));
    }

    #[test]
    fn values_must_be_strings() {
        let err = Catalog::parse("explore: 3\n").unwrap_err();
        assert!(matches!(err, CatalogParseError::Entry { .. }));
    }

    #[test]
    fn key_segments_are_validated() {
        let src = r#"
"bad key": "nope"
"#;
        let err = Catalog::parse(src).unwrap_err();
        assert!(matches!(err, CatalogParseError::Entry { .. }));
    }

    #[test]
    fn empty_source_is_an_empty_catalog() {
        let cat = Catalog::parse("").unwrap();
        assert!(cat.is_empty());
    }

    #[test]
    fn expansion_output_is_limited() {
        let big = ArgValue::from("a".repeat(MAX_EXPANDED_BYTES * 2));
        let args = &[("name", &big)];
        let s = apply_placeholders("{{name}}{{name}}{{name}}", args);
        assert!(s.len() <= MAX_EXPANDED_BYTES);
    }
}
