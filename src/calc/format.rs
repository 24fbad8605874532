use crate::model::Amount;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;

/// Renders an amount of cents as currency, e.g. 500000 cents in `USD` is `$5,000.00`.
/// Zero and negative amounts are rendered the same way as any other value.
pub fn format_currency(amount: Amount, currency_code: &str) -> String {
    amount.format(currency_code)
}

/// Renders `YYYY-MM-DD` as e.g. `Jan 15, 2024`. The string is treated as a calendar date, so no
/// timezone can shift it to a neighboring day.
pub fn format_date(date: &str) -> Result<String> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
    Ok(parsed.format("%b %-d, %Y").to_string())
}
