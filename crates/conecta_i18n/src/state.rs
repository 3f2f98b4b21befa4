use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::I18nConfig;
use crate::locale::{detect_locale_from_env, fallback_chain, normalize_locale, primary_subtag};
use crate::message::Message;
use crate::I18nError;

type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Runtime i18n state.
///
/// An owned cell rather than a process-wide singleton: the app constructs
/// one at startup, loads its catalogs, and hands it to whatever renders
/// text. Tests can instantiate as many independent instances as they like.
///
/// The current locale sits behind a `RwLock` (many readers, one writer);
/// catalogs are loaded at startup and never mutated afterwards.
pub struct I18n {
    config: I18nConfig,
    locale: RwLock<String>,
    catalogs: RwLock<HashMap<String, Catalog>>,
    on_change: Mutex<Option<ChangeCallback>>,
}

impl I18n {
    /// Build an instance from a validated config and the locale string the
    /// host platform reported (`"es-MX"`, `"en_US"`, ...).
    ///
    /// The initial locale is the primary language subtag of the report,
    /// taken as-is even when it has no catalog; lookup fallback absorbs
    /// unsupported codes. An unusable report falls back to the configured
    /// default.
    pub fn new(config: I18nConfig, reported_locale: impl Into<String>) -> Result<Self, I18nError> {
        let config = config.validated()?;
        let reported = normalize_locale(&reported_locale.into());
        let initial = primary_subtag(&reported)
            .map(str::to_string)
            .unwrap_or_else(|| config.default_locale.clone());

        Ok(Self {
            locale: RwLock::new(initial),
            catalogs: RwLock::new(HashMap::new()),
            on_change: Mutex::new(None),
            config,
        })
    }

    /// Build an instance from the locale the process environment reports.
    pub fn from_env(config: I18nConfig) -> Result<Self, I18nError> {
        let reported = detect_locale_from_env().unwrap_or_default();
        Self::new(config, reported)
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// The currently active language code.
    pub fn locale(&self) -> String {
        self.locale.read().unwrap().clone()
    }

    /// Set the active locale directly.
    ///
    /// Permissive passthrough like the initial resolution: the value is
    /// normalized but not checked against the supported set. Empty input
    /// and no-op changes are ignored.
    pub fn set_locale(&self, locale: impl Into<String>) {
        let loc = normalize_locale(&locale.into());
        if loc.is_empty() {
            return;
        }

        {
            let mut cur = self.locale.write().unwrap();
            if *cur == loc {
                return;
            }
            debug!("locale change: {} -> {}", *cur, loc);
            *cur = loc;
        }

        self.notify_change();
    }

    /// Switch to the next language in the configured cycle order.
    ///
    /// When the current code is in the supported list this advances
    /// through the list, wrapping at the end; with the shipped two-language
    /// config that is a plain toggle, and two calls round-trip. A current
    /// code outside the list resets to the configured default. Returns the
    /// new code.
    pub fn cycle_locale(&self) -> String {
        let next = {
            let cur = self.locale.read().unwrap();
            self.config.next_supported_after(&cur).to_string()
        };
        self.set_locale(next.as_str());
        next
    }

    /// Install the hook fired after every effective locale change.
    ///
    /// The app points this at its rebuild/redraw trigger so visible text
    /// re-resolves against the new catalog.
    pub fn set_change_callback(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.on_change.lock().unwrap() = Some(Box::new(callback));
    }

    fn notify_change(&self) {
        if let Some(cb) = self.on_change.lock().unwrap().as_ref() {
            cb();
        }
    }

    /// Register a catalog for a locale.
    pub fn load_catalog(&self, locale: &str, catalog: Catalog) {
        let loc = normalize_locale(locale);
        self.catalogs.write().unwrap().insert(loc, catalog);
    }

    /// Parse and register a YAML catalog for a locale.
    pub fn load_catalog_str(&self, locale: &str, src: &str) -> Result<(), I18nError> {
        let cat = Catalog::parse(src)?;
        self.load_catalog(locale, cat);
        Ok(())
    }

    /// Translate a message using the locale fallback chain.
    ///
    /// Resolution order: the active locale's catalog, then its primary
    /// subtag's, then the default locale's. When no catalog has the key,
    /// the key id itself comes back, so a missing translation shows up in
    /// the UI instead of failing the render.
    pub fn tr(&self, msg: &Message) -> String {
        let chain = fallback_chain(&self.locale(), &self.config.default_locale);

        {
            let catalogs = self.catalogs.read().unwrap();
            for loc in &chain {
                if let Some(s) = catalogs.get(loc).and_then(|cat| cat.format_message(msg)) {
                    return s;
                }
            }
        }

        debug!(key = %msg.id, "no translation found, returning key id");
        msg.id.to_string()
    }

    /// Translate a bare key with no arguments.
    pub fn translate(&self, key: &str) -> String {
        self.tr(&Message::new(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::t;
    use pretty_assertions::assert_eq;

    fn guide(reported_locale: &str) -> I18n {
        let i18n = I18n::new(I18nConfig::default(), reported_locale).unwrap();
        i18n.load_catalog_str(
            "en",
            r#"
explore: "Explore"
greeting: "Hello, {{name}}!"
fees: "Entry fee"
"#,
        )
        .unwrap();
        i18n.load_catalog_str(
            "es",
            r#"
explore: "Explorar"
greeting: "¡Hola, {{name}}!"
"#,
        )
        .unwrap();
        i18n
    }

    #[test]
    fn regional_report_resolves_to_language_subtag() {
        let i18n = guide("es-MX");
        assert_eq!(i18n.locale(), "es");
        assert_eq!(i18n.translate("explore"), "Explorar");
    }

    #[test]
    fn unsupported_report_passes_through_and_lookups_fall_back() {
        let i18n = guide("fr-FR");
        assert_eq!(i18n.locale(), "fr");
        assert_eq!(i18n.translate("explore"), "Explore");
    }

    #[test]
    fn unusable_report_falls_back_to_default() {
        let i18n = guide("");
        assert_eq!(i18n.locale(), "en");
    }

    #[test]
    fn android_style_report_is_normalized() {
        let i18n = guide("es_GT");
        assert_eq!(i18n.locale(), "es");
    }

    #[test]
    fn active_catalog_wins_over_default() {
        let i18n = guide("es");
        assert_eq!(i18n.translate("explore"), "Explorar");
    }

    #[test]
    fn default_catalog_backfills_missing_keys() {
        let i18n = guide("es");
        assert_eq!(i18n.translate("fees"), "Entry fee");
    }

    #[test]
    fn missing_key_everywhere_returns_the_key() {
        let i18n = guide("es");
        assert_eq!(i18n.translate("no.such.key"), "no.such.key");
    }

    #[test]
    fn interpolation_through_lookup() {
        let i18n = guide("en-US");
        assert_eq!(i18n.tr(&t!("greeting", { name: "Ana" })), "Hello, Ana!");
    }

    #[test]
    fn missing_argument_leaves_placeholder_verbatim() {
        let i18n = guide("en");
        assert_eq!(i18n.tr(&t!("greeting")), "Hello, {{name}}!");
    }

    #[test]
    fn cycling_twice_round_trips() {
        let i18n = guide("en");
        assert_eq!(i18n.cycle_locale(), "es");
        assert_eq!(i18n.cycle_locale(), "en");
    }

    #[test]
    fn cycling_from_unsupported_resets_to_default() {
        let i18n = guide("fr-FR");
        assert_eq!(i18n.cycle_locale(), "en");
    }

    #[test]
    fn change_callback_fires_on_effective_changes_only() {
        let i18n = guide("en");
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        i18n.set_change_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        i18n.set_locale("es");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Same value again: no notification.
        i18n.set_locale("es");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        i18n.cycle_locale();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn instances_are_independent() {
        let a = guide("en");
        let b = guide("es");
        a.set_locale("es");
        assert_eq!(a.locale(), "es");
        assert_eq!(b.locale(), "es");
        b.cycle_locale();
        assert_eq!(a.locale(), "es");
        assert_eq!(b.locale(), "en");
    }

    #[test]
    fn programmatic_catalogs_load_like_parsed_ones() {
        let i18n = I18n::new(I18nConfig::default(), "en").unwrap();
        let mut cat = Catalog::new();
        cat.insert("explore", "Explore");
        i18n.load_catalog("en", cat);
        assert_eq!(i18n.translate("explore"), "Explore");
    }

    #[test]
    fn bad_config_is_rejected_at_construction() {
        let cfg = I18nConfig {
            supported: vec!["en".to_string()],
            default_locale: "es".to_string(),
        };
        assert!(I18n::new(cfg, "en").is_err());
    }

    #[test]
    fn bad_catalog_source_is_rejected_at_load() {
        let i18n = I18n::new(I18nConfig::default(), "en").unwrap();
        assert!(i18n.load_catalog_str("en", "explore: [1, 2]\n").is_err());
    }
}
