//! Locale cycling demo
//!
//! Run with:
//! `cargo run -p conecta_i18n --example locale_cycle`

use conecta_i18n::{t, I18n, I18nConfig, I18nError};

fn main() -> Result<(), I18nError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let i18n = I18n::from_env(I18nConfig::default())?;

    let catalogs = [
        ("en", include_str!("../../../resource/i18n/conecta.en.yaml")),
        ("es", include_str!("../../../resource/i18n/conecta.es.yaml")),
    ];
    for (locale, content) in catalogs {
        i18n.load_catalog_str(locale, content)?;
    }

    i18n.set_change_callback(|| {
        tracing::debug!("locale changed, screens would rebuild here");
    });

    for _ in 0..i18n.config().supported.len() {
        println!("[{}]", i18n.locale());
        println!("  {}", i18n.translate("tabs.explore"));
        println!("  {}", i18n.tr(&t!("greeting", { name: "Ana" })));
        println!("  {}", i18n.tr(&t!("events.count", { count: 3 })));
        println!("  {}", i18n.tr(&t!("routes.next-departure", { time: "14:30" })));
        i18n.cycle_locale();
    }

    Ok(())
}
