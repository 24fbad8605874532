use crate::model::TransactionType;
use serde::{Deserialize, Serialize};

/// The color used for a transaction whose category name no longer matches any category.
pub const FALLBACK_COLOR: &str = "#6B7280";

/// The icon used for a transaction whose category name no longer matches any category.
pub const FALLBACK_ICON: &str = "📌";

/// Which kind of transaction a category applies to.
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
pub enum CategoryType {
    Income,
    #[default]
    Expense,
    Both,
}

serde_plain::derive_display_from_serialize!(CategoryType);
serde_plain::derive_fromstr_from_deserialize!(CategoryType);

impl CategoryType {
    /// Returns true if a category of this type can be chosen for a transaction of `kind`.
    pub fn applies_to(&self, kind: TransactionType) -> bool {
        match self {
            CategoryType::Both => true,
            CategoryType::Income => kind == TransactionType::Income,
            CategoryType::Expense => kind == TransactionType::Expense,
        }
    }
}

/// A user-facing category. Transactions refer to categories by `name`; `id` is only used to
/// update or delete the category itself.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Hex color code, e.g. `#F59E0B`.
    pub color: String,
    /// A glyph such as an emoji.
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
        kind: CategoryType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            kind,
        }
    }

    /// The appearance given to `name` when no category with that name exists.
    pub fn fallback(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: String::new(),
            name,
            color: FALLBACK_COLOR.to_string(),
            icon: FALLBACK_ICON.to_string(),
            kind: CategoryType::Expense,
        }
    }
}

/// (id, name, color, icon, type)
const DEFAULT_CATEGORIES: [(&str, &str, &str, &str, CategoryType); 10] = [
    ("cat-food", "Food", "#F59E0B", "🍽️", CategoryType::Expense),
    ("cat-transport", "Transport", "#3B82F6", "🚗", CategoryType::Expense),
    ("cat-entertainment", "Entertainment", "#8B5CF6", "🎬", CategoryType::Expense),
    ("cat-utilities", "Utilities", "#FBBF24", "💡", CategoryType::Expense),
    ("cat-shopping", "Shopping", "#EC4899", "🛍️", CategoryType::Expense),
    ("cat-health", "Health", "#10B981", "⚕️", CategoryType::Expense),
    ("cat-other", "Other", "#6B7280", "📌", CategoryType::Expense),
    ("cat-salary", "Salary", "#22C55E", "💰", CategoryType::Income),
    ("cat-freelance", "Freelance", "#06B6D4", "💻", CategoryType::Income),
    ("cat-investment", "Investment", "#8B5CF6", "📈", CategoryType::Income),
];

/// The built-in category set, used whenever no categories have been persisted.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(id, name, color, icon, kind)| Category::new(*id, *name, *color, *icon, *kind))
        .collect()
}
