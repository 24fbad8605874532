use crate::model::{Amount, MonthKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated figures for one month. Derived on demand from the transaction list; never stored.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month: MonthKey,
    pub total_income: Amount,
    pub total_expenses: Amount,
    /// Always `total_income - total_expenses`.
    pub net_balance: Amount,
    /// Category name -> summed amount. Income and expense amounts land in the same bucket as
    /// positive magnitudes; consult the category's type to tell them apart.
    pub by_category: BTreeMap<String, Amount>,
}

impl MonthlyStats {
    /// Stats for a month with no transactions.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            total_income: Amount::ZERO,
            total_expenses: Amount::ZERO,
            net_balance: Amount::ZERO,
            by_category: BTreeMap::new(),
        }
    }
}
