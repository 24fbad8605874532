//! Settings command handlers.

use crate::args::SettingsSetArgs;
use crate::commands::{ensure_persisted, Out};
use crate::model::{AppSettings, SettingsPatch};
use crate::store::Store;
use crate::Result;
use anyhow::bail;

pub async fn settings_show(store: &Store) -> Result<Out<AppSettings>> {
    let settings = store.settings();
    Ok(Out::new(describe(&settings), settings))
}

/// Applies the given settings and leaves the rest untouched.
///
/// # Errors
/// - Returns an error if nothing was given or the currency code is not three letters.
pub async fn settings_set(store: &Store, args: SettingsSetArgs) -> Result<Out<AppSettings>> {
    let currency = match args.currency() {
        Some(code) => Some(validate_currency(code)?),
        None => None,
    };
    let patch = SettingsPatch {
        currency,
        theme: args.theme(),
        default_transaction_type: args.default_type(),
    };
    if patch.is_empty() {
        bail!("Nothing to change, pass at least one of --currency, --theme or --default-type");
    }
    ensure_persisted(store.update_settings(patch).await)?;
    let settings = store.settings();
    Ok(Out::new(describe(&settings), settings))
}

fn describe(settings: &AppSettings) -> String {
    format!(
        "currency: {}\ntheme: {}\ndefault transaction type: {}",
        settings.currency, settings.theme, settings.default_transaction_type
    )
}

fn validate_currency(code: &str) -> Result<String> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("'{code}' is not an ISO 4217 currency code such as USD or EUR");
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Theme, TransactionType};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_settings_show_defaults() {
        let store = Store::open(Arc::new(MemoryStorage::new())).await;
        let out = settings_show(&store).await.unwrap();
        assert_eq!(out.structure().unwrap(), &AppSettings::default());
        assert!(out.message().contains("currency: USD"));
    }

    #[tokio::test]
    async fn test_settings_set_merges() {
        let store = Store::open(Arc::new(MemoryStorage::new())).await;
        let args = SettingsSetArgs::new(Some("eur".to_string()), None, None);
        settings_set(&store, args).await.unwrap();
        let args = SettingsSetArgs::new(None, Some(Theme::Dark), Some(TransactionType::Income));
        let out = settings_set(&store, args).await.unwrap();

        let settings = out.structure().unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.default_transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn test_settings_set_rejects_bad_input() {
        let store = Store::open(Arc::new(MemoryStorage::new())).await;
        assert!(settings_set(&store, SettingsSetArgs::default()).await.is_err());
        let args = SettingsSetArgs::new(Some("dollars".to_string()), None, None);
        assert!(settings_set(&store, args).await.is_err());
        assert_eq!(store.settings(), AppSettings::default());
    }
}
