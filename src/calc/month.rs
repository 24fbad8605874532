use crate::model::{MonthKey, Transaction};
use crate::Result;
use chrono::NaiveDate;

/// The month bucket that `date` falls in.
pub fn month_key(date: NaiveDate) -> MonthKey {
    MonthKey::from_date(date)
}

/// The month bucket for today on the local calendar.
pub fn current_month_key() -> MonthKey {
    MonthKey::current()
}

pub fn month_range_start(month: &MonthKey) -> Result<NaiveDate> {
    month.start()
}

pub fn month_range_end(month: &MonthKey) -> Result<NaiveDate> {
    month.end()
}

pub fn previous_month_key(month: &MonthKey) -> MonthKey {
    month.previous()
}

pub fn next_month_key(month: &MonthKey) -> MonthKey {
    month.next()
}

/// e.g. `January 2024`
pub fn month_name(month: &MonthKey) -> String {
    month.name()
}

/// The transactions whose `date` string begins with `YYYY-MM`.
///
/// This is a prefix comparison, not a date-range check: the dates are never parsed.
pub fn transactions_in_month(transactions: &[Transaction], month: &MonthKey) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| month.is_prefix_of(&t.date))
        .cloned()
        .collect()
}
