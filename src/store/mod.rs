//! The authoritative in-memory state and its write-through to storage.
//!
//! Every mutation is applied to memory synchronously through `State::reduce`, then the affected
//! collection is handed to a single background writer task that persists it. Writes reach storage
//! in the same order the mutations were made. A failed write is logged and never rolls back memory.

mod state;

pub use state::{Action, State};

use crate::calc::monthly_stats;
use crate::model::{
    default_categories, AppSettings, Category, MonthKey, MonthlyStats, SettingsPatch, Transaction,
};
use crate::storage::{Storage, ALL_KEYS, CATEGORIES_KEY, SETTINGS_KEY, TRANSACTIONS_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace, warn};

/// The outcome of a write-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// The new value is in storage.
    Persisted,
    /// The new value exists only in memory. The reason has been logged.
    MemoryOnly,
}

/// Resolves once the write triggered by a mutation has finished. Dropping it does not cancel the
/// write.
#[derive(Debug)]
pub struct PendingWrite {
    rx: oneshot::Receiver<Durability>,
}

impl PendingWrite {
    fn ready(durability: Durability) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(durability);
        Self { rx }
    }
}

impl Future for PendingWrite {
    type Output = Durability;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A closed channel means the writer is gone, so the value never made it to storage.
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Durability::MemoryOnly))
    }
}

enum Op {
    Write { key: &'static str, bytes: Vec<u8> },
    Clear,
}

struct Job {
    op: Op,
    done: oneshot::Sender<Durability>,
}

/// Owns the app state. Reads never wait on storage.
///
/// `Store::new` spawns the writer task, so it must be called from within a tokio runtime.
pub struct Store {
    state: Mutex<State>,
    storage: Arc<dyn Storage>,
    writer: mpsc::UnboundedSender<Job>,
}

impl Store {
    /// Creates a store in its initial state without reading anything from storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (writer, jobs) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage.clone(), jobs));
        Self {
            state: Mutex::new(State::default()),
            storage,
            writer,
        }
    }

    /// Creates a store and loads it from storage.
    pub async fn open(storage: Arc<dyn Storage>) -> Self {
        let store = Self::new(storage);
        store.load().await;
        store
    }

    /// Reads all three collections concurrently. Each one that is missing, unreadable or corrupt
    /// falls back to its default on its own.
    pub async fn load(&self) {
        self.dispatch(Action::SetLoading(true));
        let storage = self.storage.as_ref();
        let (transactions, categories, settings) = tokio::join!(
            read_or(storage, TRANSACTIONS_KEY, Vec::<Transaction>::new),
            read_or(storage, CATEGORIES_KEY, default_categories),
            read_or(storage, SETTINGS_KEY, AppSettings::default),
        );
        debug!(
            "Loaded {} transactions and {} categories",
            transactions.len(),
            categories.len()
        );
        self.dispatch(Action::SetTransactions(transactions));
        self.dispatch(Action::SetCategories(categories));
        self.dispatch(Action::SetSettings(settings));
        self.dispatch(Action::SetLoading(false));
    }

    /// A copy of the whole state.
    pub fn snapshot(&self) -> State {
        self.lock().clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn settings(&self) -> AppSettings {
        self.lock().settings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Statistics for `month` over the current transactions.
    pub fn stats(&self, month: &MonthKey) -> MonthlyStats {
        monthly_stats(&self.lock().transactions, month)
    }

    pub fn add_transaction(&self, transaction: Transaction) -> PendingWrite {
        self.mutate(Action::AddTransaction(transaction), TRANSACTIONS_KEY, |s| {
            &s.transactions
        })
    }

    /// Replaces the transaction with the same id. Nothing changes in memory if the id is unknown,
    /// but the collection is still written.
    pub fn update_transaction(&self, transaction: Transaction) -> PendingWrite {
        self.mutate(Action::UpdateTransaction(transaction), TRANSACTIONS_KEY, |s| {
            &s.transactions
        })
    }

    pub fn delete_transaction(&self, id: impl Into<String>) -> PendingWrite {
        self.mutate(Action::DeleteTransaction(id.into()), TRANSACTIONS_KEY, |s| {
            &s.transactions
        })
    }

    pub fn add_category(&self, category: Category) -> PendingWrite {
        self.mutate(Action::AddCategory(category), CATEGORIES_KEY, |s| {
            &s.categories
        })
    }

    pub fn update_category(&self, category: Category) -> PendingWrite {
        self.mutate(Action::UpdateCategory(category), CATEGORIES_KEY, |s| {
            &s.categories
        })
    }

    /// Removes the category. Transactions that name it keep the name.
    pub fn delete_category(&self, id: impl Into<String>) -> PendingWrite {
        self.mutate(Action::DeleteCategory(id.into()), CATEGORIES_KEY, |s| {
            &s.categories
        })
    }

    pub fn update_settings(&self, patch: SettingsPatch) -> PendingWrite {
        self.mutate(Action::UpdateSettings(patch), SETTINGS_KEY, |s| &s.settings)
    }

    /// Removes every key from storage and resets memory to the initial collections.
    pub fn clear_all(&self) -> PendingWrite {
        let mut state = self.lock();
        *state = State {
            is_loading: false,
            ..State::default()
        };
        self.enqueue(Op::Clear)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, action: Action) {
        trace!("dispatch {action:?}");
        let mut state = self.lock();
        *state = std::mem::take(&mut *state).reduce(action);
    }

    /// Applies `action` and enqueues the collection chosen by `select`. The lock is held until the
    /// write is queued so that queue order matches the order of state transitions.
    fn mutate<T, F>(&self, action: Action, key: &'static str, select: F) -> PendingWrite
    where
        T: Serialize,
        F: FnOnce(&State) -> &T,
    {
        trace!("dispatch {action:?}");
        let mut state = self.lock();
        *state = std::mem::take(&mut *state).reduce(action);
        match serde_json::to_vec(select(&*state)) {
            Ok(bytes) => self.enqueue(Op::Write { key, bytes }),
            Err(e) => {
                error!("Unable to serialize '{key}', the change is held in memory only: {e}");
                PendingWrite::ready(Durability::MemoryOnly)
            }
        }
    }

    fn enqueue(&self, op: Op) -> PendingWrite {
        let (done, rx) = oneshot::channel();
        if self.writer.send(Job { op, done }).is_err() {
            error!("The storage writer has stopped, the change is held in memory only");
        }
        PendingWrite { rx }
    }
}

/// Performs queued jobs one at a time until every `Store` handle is gone.
async fn run_writer(storage: Arc<dyn Storage>, mut jobs: mpsc::UnboundedReceiver<Job>) {
    while let Some(Job { op, done }) = jobs.recv().await {
        let (what, result) = match op {
            Op::Write { key, bytes } => (key, storage.write(key, &bytes).await),
            Op::Clear => ("all data", storage.delete(&ALL_KEYS).await),
        };
        let durability = match result {
            Ok(()) => {
                trace!("Persisted {what}");
                Durability::Persisted
            }
            Err(e) => {
                error!("Unable to persist {what}, the change is held in memory only: {e:#}");
                Durability::MemoryOnly
            }
        };
        let _ = done.send(durability);
    }
    trace!("Storage writer stopped");
}

async fn read_or<T, F>(storage: &dyn Storage, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match storage.read(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!("The data stored under '{key}' is corrupt, using the default: {e}");
                fallback()
            }
        },
        Ok(None) => {
            debug!("Nothing stored under '{key}', using the default");
            fallback()
        }
        Err(e) => {
            warn!("Unable to read '{key}', using the default: {e:#}");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, CategoryType, Theme, TransactionType};
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::test::{sample_transactions, transaction, TestEnv};
    use crate::Result;
    use anyhow::bail;
    use std::collections::HashMap;
    use tokio::sync::Semaphore;

    /// Fails every read and write.
    struct BrokenStorage;

    #[async_trait::async_trait]
    impl Storage for BrokenStorage {
        async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
            bail!("read of {key} failed")
        }

        async fn write(&self, key: &str, _: &[u8]) -> Result<()> {
            bail!("write of {key} failed")
        }

        async fn delete(&self, _: &[&str]) -> Result<()> {
            bail!("delete failed")
        }
    }

    /// Records every write in order. Each write waits for a permit so a test can hold writes back.
    struct GatedStorage {
        gate: Semaphore,
        writes: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl GatedStorage {
        fn new(permits: usize) -> Self {
            Self {
                gate: Semaphore::new(permits),
                writes: Mutex::new(Vec::new()),
            }
        }

        fn writes(&self) -> Vec<(String, Vec<u8>)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Storage for GatedStorage {
        async fn read(&self, _: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
            self.gate.acquire().await?.forget();
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_vec()));
            Ok(())
        }

        async fn delete(&self, _: &[&str]) -> Result<()> {
            Ok(())
        }
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_open_empty_storage_uses_defaults() {
        let store = Store::open(Arc::new(MemoryStorage::new())).await;
        let state = store.snapshot();
        assert!(state.transactions.is_empty());
        assert_eq!(state.categories, default_categories());
        assert_eq!(state.settings, AppSettings::default());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_new_store_is_loading_until_loaded() {
        let store = Store::new(Arc::new(MemoryStorage::new()));
        assert!(store.is_loading());
        store.load().await;
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_falls_back_per_key() {
        let categories = vec![Category::new(
            "c1",
            "Gifts",
            "#000000",
            "🎁",
            CategoryType::Both,
        )];
        let mut seed = HashMap::new();
        seed.insert(TRANSACTIONS_KEY.to_string(), b"not json".to_vec());
        seed.insert(
            CATEGORIES_KEY.to_string(),
            serde_json::to_vec(&categories).unwrap(),
        );
        seed.insert(SETTINGS_KEY.to_string(), br#"{"theme":"dark"}"#.to_vec());
        let store = Store::open(Arc::new(MemoryStorage::with_data(seed))).await;

        assert!(store.transactions().is_empty());
        assert_eq!(store.categories(), categories);
        assert_eq!(store.settings().theme, Theme::Dark);
        assert_eq!(store.settings().currency, "USD");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_read_errors_fall_back() {
        let store = Store::open(Arc::new(BrokenStorage)).await;
        let state = store.snapshot();
        assert!(state.transactions.is_empty());
        assert_eq!(state.categories, default_categories());
        assert_eq!(state.settings, AppSettings::default());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_mutation_writes_full_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let store = Store::open(storage.clone()).await;
        for t in sample_transactions() {
            let _ = store.add_transaction(t);
        }
        let durability = store.delete_transaction("3").await;
        assert_eq!(durability, Durability::Persisted);

        let stored: Vec<Transaction> =
            decode(&storage.read(TRANSACTIONS_KEY).await.unwrap().unwrap());
        assert_eq!(stored, store.transactions());
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_writes_are_applied_in_call_order() {
        let storage = Arc::new(GatedStorage::new(usize::MAX >> 4));
        let store = Store::open(storage.clone()).await;
        let a = transaction("a", TransactionType::Expense, 100, "Food", "2024-01-01");
        let b = transaction("b", TransactionType::Income, 200, "Salary", "2024-01-02");

        let _ = store.add_transaction(a.clone());
        let _ = store.update_settings(SettingsPatch {
            currency: Some("EUR".to_string()),
            ..SettingsPatch::default()
        });
        let _ = store.add_transaction(b.clone());
        let last = store.delete_transaction("a");
        assert_eq!(last.await, Durability::Persisted);

        let writes = storage.writes();
        let keys: Vec<&str> = writes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![TRANSACTIONS_KEY, SETTINGS_KEY, TRANSACTIONS_KEY, TRANSACTIONS_KEY]
        );
        assert_eq!(decode::<Vec<Transaction>>(&writes[0].1), vec![a.clone()]);
        assert_eq!(decode::<AppSettings>(&writes[1].1).currency, "EUR");
        assert_eq!(decode::<Vec<Transaction>>(&writes[2].1), vec![a, b.clone()]);
        assert_eq!(decode::<Vec<Transaction>>(&writes[3].1), vec![b]);
    }

    #[tokio::test]
    async fn test_memory_is_updated_before_write_completes() {
        let storage = Arc::new(GatedStorage::new(0));
        let store = Store::open(storage.clone()).await;
        let t = transaction("x", TransactionType::Expense, 1500, "Food", "2024-01-15");

        let pending = store.add_transaction(t.clone());
        assert_eq!(store.transactions(), vec![t]);
        assert_eq!(store.stats(&crate::test::month("2024-01")).total_expenses, Amount::new(1500));
        assert!(storage.writes().is_empty());

        storage.gate.add_permits(1);
        assert_eq!(pending.await, Durability::Persisted);
        assert_eq!(storage.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory() {
        let store = Store::open(Arc::new(BrokenStorage)).await;
        let t = transaction("x", TransactionType::Income, 100, "Salary", "2024-01-01");
        assert_eq!(store.add_transaction(t.clone()).await, Durability::MemoryOnly);
        assert_eq!(store.transactions(), vec![t]);

        let patch = SettingsPatch {
            theme: Some(Theme::Light),
            ..SettingsPatch::default()
        };
        assert_eq!(store.update_settings(patch).await, Durability::MemoryOnly);
        assert_eq!(store.settings().theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let store = Store::open(Arc::new(MemoryStorage::new())).await;
        for t in sample_transactions() {
            let _ = store.add_transaction(t);
        }
        let before = store.snapshot();
        let _ = store.delete_transaction("999").await;
        let _ = store.delete_category("cat-missing").await;
        assert_eq!(before, store.snapshot());
    }

    #[tokio::test]
    async fn test_category_mutations_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let store = Store::open(storage.clone()).await;
        let gifts = Category::new("cat-gifts", "Gifts", "#111111", "🎁", CategoryType::Both);
        let _ = store.add_category(gifts.clone());
        let mut renamed = gifts;
        renamed.color = "#222222".to_string();
        let _ = store.update_category(renamed);
        assert_eq!(
            store.delete_category("cat-food").await,
            Durability::Persisted
        );

        let stored: Vec<Category> = decode(&storage.read(CATEGORIES_KEY).await.unwrap().unwrap());
        assert_eq!(stored.len(), 10);
        assert!(stored.iter().all(|c| c.id != "cat-food"));
        assert_eq!(stored[9].color, "#222222");
    }

    #[tokio::test]
    async fn test_clear_all() {
        let storage = Arc::new(MemoryStorage::new());
        let store = Store::open(storage.clone()).await;
        let _ = store.add_transaction(sample_transactions().remove(0));
        let _ = store.delete_category("cat-food");
        assert_eq!(store.clear_all().await, Durability::Persisted);

        assert!(storage.get_state().is_empty());
        let state = store.snapshot();
        assert!(state.transactions.is_empty());
        assert_eq!(state.categories, default_categories());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_state_survives_reopen_from_files() {
        let env = TestEnv::new().await;
        let store = Store::open(Arc::new(env.storage())).await;
        for t in sample_transactions() {
            let _ = store.add_transaction(t);
        }
        let patch = SettingsPatch {
            currency: Some("GBP".to_string()),
            ..SettingsPatch::default()
        };
        assert_eq!(store.update_settings(patch).await, Durability::Persisted);
        drop(store);

        let reopened = Store::open(Arc::new(FileStorage::new(env.config().data_dir()))).await;
        assert_eq!(reopened.transactions(), sample_transactions());
        assert_eq!(reopened.settings().currency, "GBP");
        assert_eq!(reopened.categories(), default_categories());
    }
}
