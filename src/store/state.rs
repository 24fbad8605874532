use crate::model::{default_categories, AppSettings, Category, SettingsPatch, Transaction};
use serde::Serialize;

/// The in-memory snapshot of everything the app knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub settings: AppSettings,
    /// True until the initial load from storage has finished.
    pub is_loading: bool,
}

impl Default for State {
    /// No transactions, the built-in categories, default settings and `is_loading` set.
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            categories: default_categories(),
            settings: AppSettings::default(),
            is_loading: true,
        }
    }
}

/// Every way the state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetTransactions(Vec<Transaction>),
    AddTransaction(Transaction),
    /// Replaces the transaction with the same id. Nothing happens if there is none.
    UpdateTransaction(Transaction),
    /// Removes the transaction with this id. Nothing happens if there is none.
    DeleteTransaction(String),
    SetCategories(Vec<Category>),
    AddCategory(Category),
    UpdateCategory(Category),
    DeleteCategory(String),
    SetSettings(AppSettings),
    /// Shallow merge of the fields present in the patch.
    UpdateSettings(SettingsPatch),
    SetLoading(bool),
}

impl State {
    /// Applies `action` and returns the resulting state. Deterministic and free of side effects.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::SetTransactions(transactions) => self.transactions = transactions,
            Action::AddTransaction(transaction) => self.transactions.push(transaction),
            Action::UpdateTransaction(transaction) => {
                for existing in self
                    .transactions
                    .iter_mut()
                    .filter(|t| t.id == transaction.id)
                {
                    *existing = transaction.clone();
                }
            }
            Action::DeleteTransaction(id) => self.transactions.retain(|t| t.id != id),
            Action::SetCategories(categories) => self.categories = categories,
            Action::AddCategory(category) => self.categories.push(category),
            Action::UpdateCategory(category) => {
                for existing in self.categories.iter_mut().filter(|c| c.id == category.id) {
                    *existing = category.clone();
                }
            }
            Action::DeleteCategory(id) => self.categories.retain(|c| c.id != id),
            Action::SetSettings(settings) => self.settings = settings,
            Action::UpdateSettings(patch) => self.settings.merge(patch),
            Action::SetLoading(is_loading) => self.is_loading = is_loading,
        }
        self
    }
}
