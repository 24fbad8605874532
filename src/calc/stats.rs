use crate::calc::transactions_in_month;
use crate::model::{MonthKey, MonthlyStats, Transaction, TransactionType};

/// Aggregates the transactions of `month` in a single pass.
///
/// Every transaction's amount is added to `by_category` regardless of its type, so the per-category
/// map mixes income and expense magnitudes.
pub fn monthly_stats(transactions: &[Transaction], month: &MonthKey) -> MonthlyStats {
    let mut stats = MonthlyStats::empty(*month);
    for t in transactions_in_month(transactions, month) {
        match t.kind {
            TransactionType::Income => stats.total_income += t.amount,
            TransactionType::Expense => stats.total_expenses += t.amount,
        }
        *stats.by_category.entry(t.category).or_default() += t.amount;
    }
    stats.net_balance = stats.total_income - stats.total_expenses;
    stats
}
