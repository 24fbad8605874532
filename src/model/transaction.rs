use crate::model::Amount;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a transaction brings money in or sends it out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single recorded income or expense.
///
/// `amount` is a non-negative count of cents by convention; its sign is implied by `kind`.
/// `category` holds the category's *name*, not its id, so renaming or deleting a category never
/// invalidates a transaction. `date` is kept exactly as entered (`YYYY-MM-DD`) because month
/// bucketing is a string-prefix match on it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Amount,
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Transaction {
    /// Creates a transaction with a fresh id and a `created_at` of now.
    pub fn new(
        kind: TransactionType,
        amount: Amount,
        category: impl Into<String>,
        date: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            category: category.into(),
            date: date.into(),
            notes: notes.into(),
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Today's date on the local calendar as `YYYY-MM-DD`.
pub fn today_string() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
