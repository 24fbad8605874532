use crate::model::{TransactionType, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

serde_plain::derive_display_from_serialize!(Theme);
serde_plain::derive_fromstr_from_deserialize!(Theme);

/// Process-wide application settings. Missing fields in persisted JSON take their defaults.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// ISO 4217 currency code used for display.
    pub currency: String,
    pub theme: Theme,
    pub default_transaction_type: TransactionType,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            theme: Theme::Auto,
            default_transaction_type: TransactionType::Expense,
        }
    }
}

impl AppSettings {
    /// Shallow merge: every field present in `patch` replaces the current value.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(kind) = patch.default_transaction_type {
            self.default_transaction_type = kind;
        }
    }
}

/// A partial `AppSettings` where only the fields that are `Some` will be applied.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_transaction_type: Option<TransactionType>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.currency.is_none() && self.theme.is_none() && self.default_transaction_type.is_none()
    }
}
