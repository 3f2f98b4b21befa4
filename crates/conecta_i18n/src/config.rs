use crate::locale::normalize_locale;
use crate::I18nError;

/// Supported-language set and switch policy for an [`crate::I18n`] instance.
///
/// Conecta ships with `["en", "es"]` and English as the final fallback.
/// Both are configuration rather than hardcoded literals, so adding a
/// language means adding a catalog and one list entry.
#[derive(Clone, Debug, PartialEq)]
pub struct I18nConfig {
    /// Language codes with a bundled catalog, in cycle order.
    pub supported: Vec<String>,
    /// Final fallback language; must be a member of `supported`.
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported: vec!["en".to_string(), "es".to_string()],
            default_locale: "en".to_string(),
        }
    }
}

impl I18nConfig {
    pub(crate) fn validated(mut self) -> Result<Self, I18nError> {
        self.supported = self
            .supported
            .iter()
            .map(|s| normalize_locale(s))
            .collect();
        self.default_locale = normalize_locale(&self.default_locale);

        if self.supported.is_empty() {
            return Err(I18nError::Config(
                "supported language list is empty".to_string(),
            ));
        }
        if self.supported.iter().any(|s| s.is_empty()) {
            return Err(I18nError::Config(
                "supported language codes must be non-empty".to_string(),
            ));
        }
        if !self.is_supported(&self.default_locale) {
            return Err(I18nError::Config(format!(
                "default locale `{}` is not in the supported list",
                self.default_locale
            )));
        }
        Ok(self)
    }

    /// Whether `code` is one of the declared supported languages.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|s| s == code)
    }

    /// The code that follows `current` in cycle order, wrapping at the end.
    ///
    /// A `current` outside the list resets to the default rather than
    /// guessing a position.
    pub(crate) fn next_supported_after(&self, current: &str) -> &str {
        match self.supported.iter().position(|s| s == current) {
            Some(i) => &self.supported[(i + 1) % self.supported.len()],
            None => &self.default_locale,
        }
    }
}
