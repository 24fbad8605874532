use crate::commands::{ensure_persisted, Out};
use crate::store::Store;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its data subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/expense-tracker`
///
/// # Errors
/// - Returns an error if any file operations fail or the directory is already initialized.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Successfully created the expense tracker home at {}\n\
         Configuration (version {}): {}\n\
         Data: {}",
        config.root().display(),
        config.config_version(),
        config.config_path().display(),
        config.data_dir().display()
    )
    .into())
}

/// Deletes every stored collection. Afterwards the app starts over with the default categories and
/// settings.
pub async fn clear(store: &Store) -> Result<Out<()>> {
    ensure_persisted(store.clear_all().await)?;
    Ok("Deleted all transactions, categories and settings".into())
}
