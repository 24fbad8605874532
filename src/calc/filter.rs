use crate::model::{MonthKey, Transaction, TransactionType};

/// How many transactions `recent_transactions` returns when the caller has no preference.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Returns a copy of `transactions` ordered newest date first.
///
/// The sort is stable: transactions that share a date keep their relative order. Dates are compared
/// as `YYYY-MM-DD` strings, which is chronological for well-formed dates.
pub fn sort_by_date_descending(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// The `limit` newest transactions.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = sort_by_date_descending(transactions);
    sorted.truncate(limit);
    sorted
}

/// Transactions whose category name is exactly `category`.
pub fn filter_by_category(transactions: &[Transaction], category: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.category == category)
        .cloned()
        .collect()
}

pub fn filter_by_type(transactions: &[Transaction], kind: TransactionType) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .cloned()
        .collect()
}

/// Case-insensitive substring search over notes and category name. An empty query matches
/// everything.
pub fn search(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    let query = query.to_lowercase();
    transactions
        .iter()
        .filter(|t| {
            t.notes.to_lowercase().contains(&query) || t.category.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// The combination of filters offered by a transaction list. Criteria that are `None` (or an empty
/// search string) are skipped.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TransactionQuery {
    pub month: Option<MonthKey>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Applies month, then search, then category, then type. Order of the input is preserved.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut result = match &self.month {
            Some(month) => crate::calc::transactions_in_month(transactions, month),
            None => transactions.to_vec(),
        };
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            result = search(&result, query);
        }
        if let Some(category) = &self.category {
            result = filter_by_category(&result, category);
        }
        if let Some(kind) = self.kind {
            result = filter_by_type(&result, kind);
        }
        result
    }
}
