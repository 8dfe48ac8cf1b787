use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, oneshot};

use cinedeck_core::favorites::FavoritesSet;
use cinedeck_core::models::Movie;
use cinedeck_core::storage::{KeyValueStore, FAVORITES_KEY};

enum WriteCommand {
    Persist(String),
    Flush(oneshot::Sender<()>),
}

/// The user's favorites, mirrored to local storage write-behind.
///
/// Mutations land in memory synchronously; the full serialized set is then
/// queued to a single writer task, so the stored copy converges on the
/// in-memory one in mutation order. Write failures are logged and dropped.
pub struct FavoritesStore<S> {
    set: Arc<Mutex<FavoritesSet>>,
    store: S,
    writer: mpsc::UnboundedSender<WriteCommand>,
}

impl<S> FavoritesStore<S>
where
    S: KeyValueStore + Clone + 'static,
{
    /// Start with an empty set. Spawns the writer task, so this must run
    /// inside a Tokio runtime.
    pub fn new(store: S) -> Self {
        let (writer, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(store.clone(), rx));
        Self {
            set: Arc::new(Mutex::new(FavoritesSet::new())),
            store,
            writer,
        }
    }

    /// Replace the in-memory set with the persisted one. Missing or
    /// unreadable data leaves the current set untouched.
    pub async fn load(&self) {
        let raw = match self.store.get(FAVORITES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored favorites");
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to read favorites: {e}");
                return;
            }
        };

        match FavoritesSet::from_json(&raw) {
            Ok(loaded) => {
                tracing::debug!(count = loaded.len(), "Loaded favorites");
                *self.lock() = loaded;
            }
            Err(e) => tracing::warn!("Ignoring malformed favorites: {e}"),
        }
    }

    /// Add `movie` unless its id is already a favorite.
    pub fn add(&self, movie: Movie) {
        let mut set = self.lock();
        if set.insert(movie) {
            self.persist(&set);
        }
    }

    pub fn remove(&self, id: u64) {
        let mut set = self.lock();
        if set.remove(id) {
            self.persist(&set);
        }
    }

    /// Flip the favorite state of `movie`; returns the new state.
    pub fn toggle(&self, movie: Movie) -> bool {
        let mut set = self.lock();
        let now_favorite = if set.contains(movie.id) {
            set.remove(movie.id);
            false
        } else {
            set.insert(movie);
            true
        };
        self.persist(&set);
        now_favorite
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.lock().contains(id)
    }

    /// Snapshot in insertion order.
    pub fn movies(&self) -> Vec<Movie> {
        self.lock().movies().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.writer.send(WriteCommand::Flush(reply)).is_ok() {
            let _ = done.await;
        }
    }

    // Called with the set lock held so queue order matches mutation order.
    fn persist(&self, set: &FavoritesSet) {
        match set.to_json() {
            Ok(json) => {
                if self.writer.send(WriteCommand::Persist(json)).is_err() {
                    tracing::warn!("Favorites writer stopped; change not persisted");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize favorites: {e}"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FavoritesSet> {
        self.set
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

async fn writer_loop<S: KeyValueStore>(store: S, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WriteCommand::Persist(json) => {
                if let Err(e) = store.set(FAVORITES_KEY, json).await {
                    tracing::warn!("Failed to persist favorites: {e}");
                }
            }
            WriteCommand::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
}
