//! Conecta internationalization (i18n)
//!
//! The translation layer behind the Conecta guide screens:
//! - Locale resolution from the platform-reported locale, keeping the
//!   primary language subtag as the active code
//! - Per-locale YAML catalogs, flattened to dot-path keys at load time
//! - Lookup over a fallback chain (active locale, its language subtag,
//!   the configured default) that degrades to the key id instead of
//!   failing a render
//! - `{{name}}` placeholder interpolation with caller-supplied arguments
//!
//! The supported-language set and the locale cycle order live in
//! [`I18nConfig`]; nothing in the lookup or switching paths hardcodes a
//! language.

mod catalog;
mod config;
mod error;
mod locale;
mod message;
mod state;

pub use catalog::{Catalog, CatalogParseError};
pub use config::I18nConfig;
pub use error::I18nError;
pub use locale::{detect_locale_from_env, fallback_chain, normalize_locale, primary_subtag};
pub use message::{ArgValue, Message};
pub use state::I18n;

/// Convenience macro for building a translation key + args as a [`Message`].
///
/// Examples:
/// - `t!("explore")`
/// - `t!("greeting", { name: user_name })`
#[macro_export]
macro_rules! t {
    ($id:literal) => {
        $crate::Message::new($id)
    };
    ($id:literal, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::new($id);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
}
