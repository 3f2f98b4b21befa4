/// Normalize locale identifiers to a canonical-ish form for lookup.
///
/// - Converts `_` to `-` (Android often reports `en_US`).
/// - Trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-")
}

/// Extract the primary language subtag of a locale identifier.
///
/// `"es-MX"` -> `Some("es")`, `"en"` -> `Some("en")`, `""` -> `None`.
///
/// No validation against any supported-language set happens here; an
/// unsupported subtag is returned as-is and the translator's fallback
/// chain absorbs it at lookup time.
pub fn primary_subtag(locale: &str) -> Option<&str> {
    locale
        .split('-')
        .next()
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
}

/// Create a fallback chain for translation lookup.
///
/// Example (default `"en"`):
/// - `es-MX` -> `["es-MX", "es", "en"]`
/// - `en` -> `["en"]`
pub fn fallback_chain(locale: &str, default_locale: &str) -> Vec<String> {
    let l = normalize_locale(locale);
    let mut chain = Vec::new();

    if !l.is_empty() {
        chain.push(l.clone());
        if let Some(lang) = primary_subtag(&l) {
            chain.push(lang.to_string());
        }
    }

    chain.push(normalize_locale(default_locale));

    // Dedup, preserve order.
    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for x in chain {
        if seen.insert(x.clone()) {
            out.push(x);
        }
    }
    out
}

/// Read the locale the environment reports for this process.
///
/// Checks `LC_ALL`, `LC_MESSAGES`, `LANG` in that order, which is where
/// desktop platforms and CI surface the device locale. Returns `None`
/// when nothing usable is set.
pub fn detect_locale_from_env() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|key| std::env::var(key).ok().and_then(|v| parse_env_locale(&v)))
}

/// Strip codeset and modifier suffixes from a POSIX-style locale value.
///
/// Examples: `"en_US.UTF-8"` -> `"en-US"`, `"ca_ES@euro"` -> `"ca-ES"`,
/// `"C"` / `"POSIX"` / empty -> `None`.
fn parse_env_locale(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.split_once('.').map_or(s, |(part, _)| part);
    let s = s.split_once('@').map_or(s, |(part, _)| part);
    let s = s.trim();
    if s.is_empty() || s == "C" || s == "POSIX" {
        return None;
    }
    Some(normalize_locale(s))
}
