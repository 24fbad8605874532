use crate::args::SummaryArgs;
use crate::calc::{
    category_breakdown, format_currency, month_name, monthly_stats, recent_transactions,
    split_breakdown, transactions_in_month, CategoryShare, DEFAULT_RECENT_LIMIT,
};
use crate::commands::Out;
use crate::model::{MonthKey, MonthlyStats, Transaction};
use crate::store::Store;
use crate::Result;
use serde::Serialize;

/// Everything shown for one month: the totals, the per-category shares split by side, and the
/// newest transactions of the month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub stats: MonthlyStats,
    pub expenses: Vec<CategoryShare>,
    pub income: Vec<CategoryShare>,
    pub recent: Vec<Transaction>,
}

/// Summarizes the requested month, or the current month when none is given.
pub async fn summary(store: &Store, args: SummaryArgs) -> Result<Out<Summary>> {
    let month = args.month().unwrap_or_else(MonthKey::current);
    let state = store.snapshot();
    let stats = monthly_stats(&state.transactions, &month);
    let (expenses, income) = split_breakdown(category_breakdown(&stats, &state.categories));
    let recent = recent_transactions(
        &transactions_in_month(&state.transactions, &month),
        DEFAULT_RECENT_LIMIT,
    );

    let currency = state.settings.currency.as_str();
    let money = |a| format_currency(a, currency);
    let mut message = format!(
        "{}\n  Income:   {:>14}\n  Expenses: {:>14}\n  Balance:  {:>14}",
        month_name(&month),
        money(stats.total_income),
        money(stats.total_expenses),
        money(stats.net_balance)
    );
    for (title, shares) in [("Spending", &expenses), ("Income sources", &income)] {
        if shares.is_empty() {
            continue;
        }
        message.push_str(&format!("\n{title}"));
        for share in shares {
            message.push_str(&format!(
                "\n  {} {:<16} {:>14} {:>6.1}%",
                share.icon,
                share.name,
                money(share.amount),
                share.percentage
            ));
        }
    }

    let summary = Summary {
        stats,
        expenses,
        income,
        recent,
    };
    Ok(Out::new(message, summary))
}
