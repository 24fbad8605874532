//! These structs provide the CLI interface for the expense tracker.

use crate::model::{Amount, CategoryType, MonthKey, Theme, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expense: Record income and expenses and see where the money went.
///
/// Transactions are stored as JSON files in a data directory under the expense tracker home. Every
/// change is written through to disk immediately.
///
/// Set EXPENSE_TRACKER_IN_MEMORY to any non-empty value to run without touching the data
/// directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/expense-tracker. If you want it somewhere else then pass --home or set
    /// EXPENSE_TRACKER_HOME.
    Init,
    /// Record a new income or expense transaction.
    Add(AddArgs),
    /// Change fields of an existing transaction.
    Edit(EditArgs),
    /// Delete a transaction by id.
    Delete(DeleteArgs),
    /// List transactions, newest first.
    List(ListArgs),
    /// Show the income, expenses and category breakdown for a month.
    Summary(SummaryArgs),
    /// List, add, update or delete categories.
    Category(CategoryArgs),
    /// Show or change the settings.
    Settings(SettingsArgs),
    /// Delete all stored transactions, categories and settings.
    Clear,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration and data are held. Defaults to ~/expense-tracker
    #[arg(long, env = "EXPENSE_TRACKER_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Whether this is income or an expense.
    #[arg(value_enum)]
    kind: TransactionType,

    /// The amount, e.g. 15, 15.00 or $1,234.56. Must not be negative.
    amount: Amount,

    /// The name of the category.
    #[arg(long)]
    category: String,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Free-form notes.
    #[arg(long)]
    notes: Option<String>,
}

impl AddArgs {
    pub fn new(
        kind: TransactionType,
        amount: Amount,
        category: impl Into<String>,
        date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            date,
            notes,
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Args for the `expense edit` command. Only the fields that are given are changed.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the transaction to change.
    id: String,

    #[arg(long = "type", value_enum)]
    kind: Option<TransactionType>,

    #[arg(long)]
    amount: Option<Amount>,

    #[arg(long)]
    category: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    notes: Option<String>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            amount: None,
            category: None,
            date: None,
            notes: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.kind
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Args for the `expense delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `expense list` command. Filters are combined.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only transactions in this month, as YYYY-MM.
    #[arg(long)]
    month: Option<MonthKey>,

    /// Case-insensitive text to look for in the notes and category name.
    #[arg(long)]
    search: Option<String>,

    /// Only transactions in this category.
    #[arg(long)]
    category: Option<String>,

    /// Only income or only expenses.
    #[arg(long = "type", value_enum)]
    kind: Option<TransactionType>,

    /// At most this many transactions.
    #[arg(long)]
    limit: Option<usize>,
}

impl ListArgs {
    pub fn new(
        month: Option<MonthKey>,
        search: Option<String>,
        category: Option<String>,
        kind: Option<TransactionType>,
        limit: Option<usize>,
    ) -> Self {
        Self {
            month,
            search,
            category,
            kind,
            limit,
        }
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.kind
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Args for the `expense summary` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    /// The month as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<MonthKey>,
}

impl SummaryArgs {
    pub fn new(month: Option<MonthKey>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }
}

/// Args for the `expense category` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategorySubcommand,
}

impl CategoryArgs {
    pub fn command(&self) -> &CategorySubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// List all categories.
    List,
    /// Add a category.
    Add(CategoryAddArgs),
    /// Change a category by id. Transactions refer to categories by name, so renaming a category
    /// does not move its existing transactions.
    Update(CategoryUpdateArgs),
    /// Delete a category by id. Its transactions keep the category name.
    Delete(CategoryDeleteArgs),
}

/// Args for the `expense category add` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoryAddArgs {
    /// The display name. Transactions refer to the category by this name.
    name: String,

    /// Hex color code, e.g. #F59E0B
    #[arg(long, default_value = "#6B7280")]
    color: String,

    /// A glyph such as an emoji.
    #[arg(long, default_value = "📌")]
    icon: String,

    /// Which transactions the category applies to.
    #[arg(long = "type", value_enum, default_value_t = CategoryType::Expense)]
    kind: CategoryType,
}

impl CategoryAddArgs {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
        kind: CategoryType,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn kind(&self) -> CategoryType {
        self.kind
    }
}

/// Args for the `expense category update` command. Only the fields that are given are changed.
#[derive(Debug, Parser, Clone)]
pub struct CategoryUpdateArgs {
    /// The id of the category, e.g. cat-food
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    icon: Option<String>,

    #[arg(long = "type", value_enum)]
    kind: Option<CategoryType>,
}

impl CategoryUpdateArgs {
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        color: Option<String>,
        icon: Option<String>,
        kind: Option<CategoryType>,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            color,
            icon,
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn kind(&self) -> Option<CategoryType> {
        self.kind
    }
}

/// Args for the `expense category delete` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoryDeleteArgs {
    /// The id of the category, e.g. cat-food
    id: String,
}

impl CategoryDeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `expense settings` command.
#[derive(Debug, Parser, Clone)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

impl SettingsArgs {
    pub fn command(&self) -> &SettingsSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsSubcommand {
    /// Print the current settings.
    Show,
    /// Change one or more settings.
    Set(SettingsSetArgs),
}

/// Args for the `expense settings set` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SettingsSetArgs {
    /// ISO 4217 currency code used for display, e.g. USD or EUR.
    #[arg(long)]
    currency: Option<String>,

    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// The transaction type preselected when adding a transaction.
    #[arg(long, value_enum)]
    default_type: Option<TransactionType>,
}

impl SettingsSetArgs {
    pub fn new(
        currency: Option<String>,
        theme: Option<Theme>,
        default_type: Option<TransactionType>,
    ) -> Self {
        Self {
            currency,
            theme,
            default_type,
        }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn default_type(&self) -> Option<TransactionType> {
        self.default_type
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expense-tracker"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSE_TRACKER_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("expense-tracker")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["expense", "--home", "/tmp/expense-home"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_is_well_formed() {
        <Args as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "add",
            "expense",
            "$1,234.50",
            "--category",
            "Food",
            "--date",
            "2024-01-15",
        ]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/expense-home"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.kind(), TransactionType::Expense);
        assert_eq!(add.amount().cents(), 123450);
        assert_eq!(add.category(), "Food");
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(add.notes().is_none());
    }

    #[test]
    fn test_parse_add_rejects_bad_date() {
        let argv = [
            "expense", "add", "income", "10", "--category", "Salary", "--date", "01/15/2024",
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_parse_list_filters() {
        let args = parse(&["list", "--month", "2024-01", "--type", "income", "--limit", "3"]);
        let Command::List(list) = args.command() else {
            panic!("expected list, got {:?}", args.command());
        };
        assert_eq!(list.month().unwrap().to_string(), "2024-01");
        assert_eq!(list.kind(), Some(TransactionType::Income));
        assert_eq!(list.limit(), Some(3));
        assert!(list.search().is_none());
    }

    #[test]
    fn test_parse_category_add_defaults() {
        let args = parse(&["category", "add", "Gifts"]);
        let Command::Category(category) = args.command() else {
            panic!("expected category, got {:?}", args.command());
        };
        let CategorySubcommand::Add(add) = category.command() else {
            panic!("expected category add");
        };
        assert_eq!(add.name(), "Gifts");
        assert_eq!(add.color(), "#6B7280");
        assert_eq!(add.kind(), CategoryType::Expense);
    }

    #[test]
    fn test_parse_settings_set() {
        let args = parse(&["settings", "set", "--theme", "dark", "--default-type", "income"]);
        let Command::Settings(settings) = args.command() else {
            panic!("expected settings, got {:?}", args.command());
        };
        let SettingsSubcommand::Set(set) = settings.command() else {
            panic!("expected settings set");
        };
        assert_eq!(set.theme(), Some(Theme::Dark));
        assert_eq!(set.default_type(), Some(TransactionType::Income));
        assert!(set.currency().is_none());
    }

    #[test]
    fn test_log_level_default() {
        let args = parse(&["clear"]);
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }
}
