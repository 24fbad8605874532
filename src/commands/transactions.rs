//! Transaction command handlers.

use crate::args::{AddArgs, DeleteArgs, EditArgs, ListArgs};
use crate::calc::{format_currency, format_date, sort_by_date_descending, TransactionQuery};
use crate::commands::{ensure_persisted, plural, Out};
use crate::model::{Amount, Category, Transaction, TransactionType};
use crate::store::Store;
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use tracing::warn;

/// Records a new transaction with a fresh id.
///
/// # Errors
/// - Returns an error if the amount is negative or beyond `Amount::MAX`, or the category name is
///   blank.
/// - Returns an error if the transaction could not be saved.
pub async fn add(store: &Store, args: AddArgs) -> Result<Out<Transaction>> {
    let amount = validate_amount(args.amount())?;
    let category = validate_category(args.category())?;
    let date = date_string(args.date());
    warn_category(store, &category, args.kind());

    let transaction = Transaction::new(
        args.kind(),
        amount,
        category,
        date,
        args.notes().unwrap_or_default(),
    );
    ensure_persisted(store.add_transaction(transaction.clone()).await)?;

    let currency = store.settings().currency;
    let message = format!(
        "Added {} {} in {} on {} with id {}",
        transaction.kind,
        format_currency(transaction.amount, &currency),
        transaction.category,
        format_date(&transaction.date)?,
        transaction.id
    );
    Ok(Out::new(message, transaction))
}

/// Replaces an existing transaction with a copy that has the given fields changed. The id and
/// creation time never change.
///
/// # Errors
/// - Returns an error if no transaction has the id.
/// - Returns an error if a new amount is negative or a new category name is blank.
pub async fn edit(store: &Store, args: EditArgs) -> Result<Out<Transaction>> {
    let Some(mut transaction) = store
        .transactions()
        .into_iter()
        .find(|t| t.id == args.id())
    else {
        bail!("There is no transaction with id '{}'", args.id());
    };

    if let Some(kind) = args.kind() {
        transaction.kind = kind;
    }
    if let Some(amount) = args.amount() {
        transaction.amount = validate_amount(amount)?;
    }
    if let Some(category) = args.category() {
        transaction.category = validate_category(category)?;
    }
    if args.kind().is_some() || args.category().is_some() {
        warn_category(store, &transaction.category, transaction.kind);
    }
    if let Some(date) = args.date() {
        transaction.date = date_string(Some(date));
    }
    if let Some(notes) = args.notes() {
        transaction.notes = notes.to_string();
    }

    ensure_persisted(store.update_transaction(transaction.clone()).await)?;
    Ok(Out::new(
        format!("Updated transaction {}", transaction.id),
        transaction,
    ))
}

/// Deletes a transaction. Deleting an id that does not exist changes nothing.
pub async fn delete(store: &Store, args: DeleteArgs) -> Result<Out<()>> {
    let existed = store.transactions().iter().any(|t| t.id == args.id());
    ensure_persisted(store.delete_transaction(args.id()).await)?;
    if existed {
        Ok(format!("Deleted transaction {}", args.id()).into())
    } else {
        Ok(format!("There was no transaction with id '{}'", args.id()).into())
    }
}

/// Lists the transactions that match every given filter, newest first.
pub async fn list(store: &Store, args: ListArgs) -> Result<Out<Vec<Transaction>>> {
    let query = TransactionQuery {
        month: args.month(),
        search: args.search().map(str::to_string),
        category: args.category().map(str::to_string),
        kind: args.kind(),
    };
    let mut transactions = sort_by_date_descending(&query.apply(&store.transactions()));
    if let Some(limit) = args.limit() {
        transactions.truncate(limit);
    }

    let currency = store.settings().currency;
    let count = plural(transactions.len(), "transaction", "transactions");
    let mut message = format!("Found {count}");
    for t in &transactions {
        let date = format_date(&t.date).unwrap_or_else(|_| t.date.clone());
        message.push_str(&format!(
            "\n  {date:<13} {:<8} {:<14} {:>14}  {}  [{}]",
            t.kind.to_string(),
            t.category,
            format_currency(t.amount, &currency),
            t.notes,
            t.id
        ));
    }
    Ok(Out::new(message, transactions))
}

fn validate_amount(amount: Amount) -> Result<Amount> {
    if amount.is_negative() {
        bail!("The amount must not be negative, use the expense type for money going out");
    }
    if amount > Amount::MAX {
        bail!("The amount must not be more than {}", Amount::MAX);
    }
    Ok(amount)
}

fn validate_category(category: &str) -> Result<String> {
    let category = category.trim();
    if category.is_empty() {
        bail!("A category name is required");
    }
    Ok(category.to_string())
}

fn date_string(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => crate::model::today_string(),
    }
}

fn warn_category(store: &Store, name: &str, kind: TransactionType) {
    if let Some(warning) = category_warning(&store.categories(), name, kind) {
        warn!("{warning}");
    }
}

/// Transactions refer to categories by name, so an unknown name or a category meant for the other
/// type is allowed but probably a mistake.
fn category_warning(categories: &[Category], name: &str, kind: TransactionType) -> Option<String> {
    match crate::calc::find_category(categories, name) {
        None => Some(format!(
            "There is no category named '{name}', it will be shown with the fallback icon"
        )),
        Some(category) if !category.kind.applies_to(kind) => Some(format!(
            "The category '{name}' is meant for {} transactions, not {kind}",
            category.kind
        )),
        Some(_) => None,
    }
}
