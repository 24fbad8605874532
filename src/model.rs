//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod month;
mod settings;
mod stats;
mod transaction;

pub use amount::{Amount, AmountError, DEFAULT_CURRENCY};
pub use category::{default_categories, Category, CategoryType, FALLBACK_COLOR, FALLBACK_ICON};
pub use month::MonthKey;
pub use settings::{AppSettings, SettingsPatch, Theme};
pub use stats::MonthlyStats;
pub use transaction::{today_string, Transaction, TransactionType};
