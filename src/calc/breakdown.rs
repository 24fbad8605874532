use crate::model::{Amount, Category, CategoryType, MonthlyStats};
use serde::{Deserialize, Serialize};

/// One slice of a month's per-category totals, decorated with the category's appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub name: String,
    pub amount: Amount,
    /// Share of the month's total expenses, rounded to one decimal place. Zero when the month has
    /// no expenses.
    pub percentage: f64,
    pub color: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

/// Looks up a category by exact name.
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.name == name)
}

/// Builds the per-category shares of a month, largest amount first.
///
/// Names that no longer match a category are shown with the fallback color and icon and are treated
/// as expenses.
pub fn category_breakdown(stats: &MonthlyStats, categories: &[Category]) -> Vec<CategoryShare> {
    let total = stats.total_expenses.cents();
    let mut shares: Vec<CategoryShare> = stats
        .by_category
        .iter()
        .map(|(name, &amount)| {
            let category = find_category(categories, name)
                .cloned()
                .unwrap_or_else(|| Category::fallback(name.as_str()));
            CategoryShare {
                name: name.clone(),
                amount,
                percentage: percentage(amount.cents(), total),
                color: category.color,
                icon: category.icon,
                kind: category.kind,
            }
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

/// Splits shares into the expense side (anything not exclusively income) and the income side.
pub fn split_breakdown(shares: Vec<CategoryShare>) -> (Vec<CategoryShare>, Vec<CategoryShare>) {
    shares
        .into_iter()
        .partition(|share| share.kind != CategoryType::Income)
}

fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::monthly_stats;
    use crate::model::{
        default_categories, Transaction, TransactionType, FALLBACK_COLOR, FALLBACK_ICON,
    };
    use crate::test::{month, sample_transactions, transaction};

    fn breakdown(transactions: &[Transaction], key: &str) -> Vec<CategoryShare> {
        let stats = monthly_stats(transactions, &month(key));
        category_breakdown(&stats, &default_categories())
    }

    #[test]
    fn test_breakdown_january() {
        let shares = breakdown(&sample_transactions(), "2024-01");
        let names: Vec<&str> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Salary", "Transport", "Food"]);

        let food = &shares[2];
        assert_eq!(food.amount, Amount::new(1500));
        assert_eq!(food.percentage, 23.1);
        assert_eq!(food.color, "#F59E0B");
        assert_eq!(food.kind, CategoryType::Expense);

        assert_eq!(shares[1].percentage, 76.9);
        assert_eq!(shares[0].kind, CategoryType::Income);
    }

    #[test]
    fn test_breakdown_unknown_category_uses_fallback() {
        let t = vec![transaction(
            "a",
            TransactionType::Expense,
            900,
            "Pets",
            "2024-06-03",
        )];
        let shares = breakdown(&t, "2024-06");
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].color, FALLBACK_COLOR);
        assert_eq!(shares[0].icon, FALLBACK_ICON);
        assert_eq!(shares[0].percentage, 100.0);
    }

    #[test]
    fn test_breakdown_without_expenses_has_zero_percentages() {
        let t = vec![transaction(
            "a",
            TransactionType::Income,
            10000,
            "Salary",
            "2024-06-01",
        )];
        let shares = breakdown(&t, "2024-06");
        assert_eq!(shares[0].percentage, 0.0);
        assert!(breakdown(&t, "2024-07").is_empty());
    }

    #[test]
    fn test_split_breakdown() {
        let shares = breakdown(&sample_transactions(), "2024-01");
        let (expenses, income) = split_breakdown(shares);
        let expense_names: Vec<&str> = expenses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(expense_names, vec!["Transport", "Food"]);
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salary");
    }

    #[test]
    fn test_find_category() {
        let categories = default_categories();
        assert_eq!(find_category(&categories, "Health").unwrap().id, "cat-health");
        assert!(find_category(&categories, "health").is_none());
    }
}
