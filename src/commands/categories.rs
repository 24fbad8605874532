//! Category command handlers.

use crate::args::{CategoryAddArgs, CategoryDeleteArgs, CategoryUpdateArgs};
use crate::commands::{ensure_persisted, plural, Out};
use crate::model::Category;
use crate::store::Store;
use crate::Result;
use anyhow::bail;

pub async fn category_list(store: &Store) -> Result<Out<Vec<Category>>> {
    let categories = store.categories();
    let mut message = format!(
        "Found {}",
        plural(categories.len(), "category", "categories")
    );
    for c in &categories {
        message.push_str(&format!(
            "\n  {} {:<16} {:<8} {}  [{}]",
            c.icon,
            c.name,
            c.kind.to_string(),
            c.color,
            c.id
        ));
    }
    Ok(Out::new(message, categories))
}

/// Adds a category with an id derived from its name, e.g. `cat-gifts`.
///
/// # Errors
/// - Returns an error if the name is blank or a category already has that name.
pub async fn category_add(store: &Store, args: CategoryAddArgs) -> Result<Out<Category>> {
    let name = args.name().trim();
    if name.is_empty() {
        bail!("A category name is required");
    }
    let existing = store.categories();
    if existing.iter().any(|c| c.name == name) {
        bail!("A category named '{name}' already exists");
    }
    let id = unique_id(name, &existing);
    let category = Category::new(id, name, args.color(), args.icon(), args.kind());
    ensure_persisted(store.add_category(category.clone()).await)?;
    Ok(Out::new(
        format!("Added category {} with id {}", category.name, category.id),
        category,
    ))
}

/// Changes the given fields of a category. Existing transactions keep the name they were recorded
/// with.
///
/// # Errors
/// - Returns an error if no category has the id or the new name is taken.
pub async fn category_update(store: &Store, args: CategoryUpdateArgs) -> Result<Out<Category>> {
    let categories = store.categories();
    let Some(mut category) = categories.iter().find(|c| c.id == args.id()).cloned() else {
        bail!("There is no category with id '{}'", args.id());
    };

    if let Some(name) = args.name() {
        let name = name.trim();
        if name.is_empty() {
            bail!("A category name is required");
        }
        if categories.iter().any(|c| c.name == name && c.id != category.id) {
            bail!("A category named '{name}' already exists");
        }
        category.name = name.to_string();
    }
    if let Some(color) = args.color() {
        category.color = color.to_string();
    }
    if let Some(icon) = args.icon() {
        category.icon = icon.to_string();
    }
    if let Some(kind) = args.kind() {
        category.kind = kind;
    }

    ensure_persisted(store.update_category(category.clone()).await)?;
    Ok(Out::new(format!("Updated category {}", category.id), category))
}

/// Deletes a category. Transactions that use its name keep it and are shown with the fallback
/// appearance.
pub async fn category_delete(store: &Store, args: CategoryDeleteArgs) -> Result<Out<()>> {
    let Some(category) = store.categories().into_iter().find(|c| c.id == args.id()) else {
        bail!("There is no category with id '{}'", args.id());
    };
    ensure_persisted(store.delete_category(args.id()).await)?;
    let orphaned = store
        .transactions()
        .iter()
        .filter(|t| t.category == category.name)
        .count();
    let mut message = format!("Deleted category {}", category.name);
    if orphaned > 0 {
        message.push_str(&format!(
            ", {} still use the name",
            plural(orphaned, "transaction", "transactions")
        ));
    }
    Ok(message.into())
}

/// `cat-` followed by the lowercased name with runs of other characters collapsed to `-`. A numeric
/// suffix is added if the id is taken.
fn unique_id(name: &str, existing: &[Category]) -> String {
    let mut slug = String::new();
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let base = if slug.is_empty() {
        "cat-custom".to_string()
    } else {
        format!("cat-{slug}")
    };
    let mut id = base.clone();
    let mut n = 2;
    while existing.iter().any(|c| c.id == id) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_categories, CategoryType};
    use crate::storage::MemoryStorage;
    use crate::test::sample_transactions;
    use std::sync::Arc;

    async fn store() -> Store {
        Store::open(Arc::new(MemoryStorage::new())).await
    }

    #[test]
    fn test_unique_id() {
        let categories = default_categories();
        assert_eq!(unique_id("Gifts", &categories), "cat-gifts");
        assert_eq!(unique_id("Pet Care!", &categories), "cat-pet-care");
        assert_eq!(unique_id("Food", &categories), "cat-food-2");
        assert_eq!(unique_id("🎁", &categories), "cat-custom");
    }

    #[tokio::test]
    async fn test_category_list() {
        let store = store().await;
        let out = category_list(&store).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 10);
        assert!(out.message().starts_with("Found 10 categories"));
    }

    #[tokio::test]
    async fn test_category_add() {
        let store = store().await;
        let args = CategoryAddArgs::new("Gifts", "#000000", "🎁", CategoryType::Both);
        let out = category_add(&store, args).await.unwrap();
        assert_eq!(out.structure().unwrap().id, "cat-gifts");
        assert_eq!(store.categories().len(), 11);

        let again = CategoryAddArgs::new("Gifts", "#000000", "🎁", CategoryType::Both);
        assert!(category_add(&store, again).await.is_err());
    }

    #[tokio::test]
    async fn test_category_update() {
        let store = store().await;
        let args = CategoryUpdateArgs::new(
            "cat-food",
            Some("Groceries".to_string()),
            None,
            Some("🛒".to_string()),
            None,
        );
        let out = category_update(&store, args).await.unwrap();
        let updated = out.structure().unwrap();
        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.icon, "🛒");
        assert_eq!(updated.color, "#F59E0B");
        assert_eq!(store.categories()[0], *updated);

        let health = Some("Health".to_string());
        let clash = CategoryUpdateArgs::new("cat-food", health, None, None, None);
        assert!(category_update(&store, clash).await.is_err());

        let missing = CategoryUpdateArgs::new("cat-nope", None, None, None, None);
        assert!(category_update(&store, missing).await.is_err());
    }

    #[tokio::test]
    async fn test_category_delete_keeps_transactions() {
        let store = store().await;
        for t in sample_transactions() {
            let _ = store.add_transaction(t);
        }
        let out = category_delete(&store, CategoryDeleteArgs::new("cat-food"))
            .await
            .unwrap();
        assert_eq!(
            out.message(),
            "Deleted category Food, 2 transactions still use the name"
        );
        assert_eq!(store.categories().len(), 9);
        assert_eq!(store.transactions(), sample_transactions());
        assert!(category_delete(&store, CategoryDeleteArgs::new("cat-food"))
            .await
            .is_err());
    }
}
