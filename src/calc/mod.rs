//! Pure functions over transaction collections: month bucketing, aggregation, formatting,
//! filtering, searching and sorting. Nothing in here holds state or performs I/O; every function
//! takes the collection it works on as an argument.

mod breakdown;
mod filter;
mod format;
mod month;
mod stats;

pub use breakdown::{category_breakdown, find_category, split_breakdown, CategoryShare};
pub use filter::{
    filter_by_category, filter_by_type, recent_transactions, search, sort_by_date_descending,
    TransactionQuery, DEFAULT_RECENT_LIMIT,
};
pub use format::{format_currency, format_date};
pub use month::{
    current_month_key, month_key, month_name, month_range_end, month_range_start,
    next_month_key, previous_month_key, transactions_in_month,
};
pub use stats::monthly_stats;

pub use crate::model::today_string;
