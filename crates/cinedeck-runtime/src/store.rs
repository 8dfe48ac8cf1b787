use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use cinedeck_core::error::CoreError;
use cinedeck_core::storage::{KeyValueStore, SqliteStore};

/// Async handle to a [`SqliteStore`] owned by a dedicated thread.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

enum StoreCommand {
    Get {
        key: String,
        reply: oneshot::Sender<Result<Option<String>, CoreError>>,
    },
    Set {
        key: String,
        value: String,
        reply: oneshot::Sender<Result<(), CoreError>>,
    },
    Remove {
        key: String,
        reply: oneshot::Sender<Result<(), CoreError>>,
    },
}

impl StoreHandle {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let storage = SqliteStore::open(path)?;
        Self::spawn(storage)
    }

    pub fn open_memory() -> Result<Self, CoreError> {
        let storage = SqliteStore::open_memory()?;
        Self::spawn(storage)
    }

    fn spawn(storage: SqliteStore) -> Result<Self, CoreError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("store-actor".into())
            .spawn(move || actor_loop(storage, rx))
            .map_err(|e| {
                tracing::error!("Failed to spawn store thread: {e}");
                CoreError::Io(e)
            })?;

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, CoreError>>) -> StoreCommand,
    ) -> Result<T, CoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| CoreError::StoreClosed)?;
        rx.await.unwrap_or(Err(CoreError::StoreClosed))
    }
}

impl KeyValueStore for StoreHandle {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let key = key.to_owned();
        self.request(|reply| StoreCommand::Get { key, reply }).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let key = key.to_owned();
        self.request(|reply| StoreCommand::Set { key, value, reply })
            .await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let key = key.to_owned();
        self.request(|reply| StoreCommand::Remove { key, reply })
            .await
    }
}

fn actor_loop(storage: SqliteStore, mut rx: mpsc::UnboundedReceiver<StoreCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            StoreCommand::Get { key, reply } => {
                let _ = reply.send(storage.get(&key));
            }
            StoreCommand::Set { key, value, reply } => {
                let _ = reply.send(storage.set(&key, &value));
            }
            StoreCommand::Remove { key, reply } => {
                let _ = reply.send(storage.remove(&key));
            }
        }
    }
    tracing::debug!("Store actor stopped");
}
