//! In-process backends for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use cinedeck_api::auth::AuthError;
use cinedeck_api::catalog::FetchError;
use cinedeck_api::traits::{AuthBackend, AuthResponse, CatalogBackend, Credentials};
use cinedeck_core::error::CoreError;
use cinedeck_core::models::Movie;
use cinedeck_core::storage::{KeyValueStore, MemoryStore};

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.into(),
        year: 2000 + (id % 25) as u32,
        director: "Test Director".into(),
        genres: vec!["Drama".into()],
        plot: format!("Plot of {title}."),
        rating: 7.5,
        poster_url: format!("https://example.com/posters/{id}.jpg"),
    }
}

pub fn numbered(n: u64) -> Vec<Movie> {
    (1..=n).map(|i| movie(i, &format!("Movie {i}"))).collect()
}

/// Holds a backend call until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

pub struct FakeAuth {
    token: String,
    id: Option<u64>,
    pub accept: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
    gate: Option<Arc<Gate>>,
}

impl FakeAuth {
    pub fn accepting(token: &str) -> Self {
        Self {
            token: token.into(),
            id: None,
            accept: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    pub fn rejecting() -> Self {
        let fake = Self::accepting("never-issued");
        fake.accept.store(false, Ordering::SeqCst);
        fake
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Make every call wait on the returned gate.
    pub fn gate(&mut self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gate = Some(Arc::clone(&gate));
        gate
    }

    async fn respond(&self, rejection: AuthError) -> Result<AuthResponse, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if self.accept.load(Ordering::SeqCst) {
            Ok(AuthResponse {
                token: self.token.clone(),
                id: self.id,
            })
        } else {
            Err(rejection)
        }
    }
}

impl AuthBackend for FakeAuth {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.respond(AuthError::InvalidCredentials).await
    }

    async fn register(&self, _credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.respond(AuthError::EmailConflictOrInvalid).await
    }
}

#[derive(Clone)]
pub struct FakeCatalog {
    movies: Arc<Mutex<Vec<Movie>>>,
    pub fail: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
    gates: Arc<Mutex<VecDeque<Arc<Gate>>>>,
}

impl FakeCatalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies: Arc::new(Mutex::new(movies)),
            fail: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
            gates: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// The next `fetch_all` call waits on the returned gate.
    pub fn gate_next(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.lock().unwrap().push_back(Arc::clone(&gate));
        gate
    }

    fn snapshot(&self) -> Result<Vec<Movie>, FetchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Api {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        Ok(self.movies.lock().unwrap().clone())
    }
}

impl CatalogBackend for FakeCatalog {
    async fn fetch_all(&self) -> Result<Vec<Movie>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.snapshot()
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Movie, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(FetchError::NotFound(id))
    }
}

/// A store whose every operation fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
        Err(CoreError::StoreClosed)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), CoreError> {
        Err(CoreError::StoreClosed)
    }

    async fn remove(&self, _key: &str) -> Result<(), CoreError> {
        Err(CoreError::StoreClosed)
    }
}

/// Memory store that also keeps every value written.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingStore {
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.inner.remove(key).await
    }
}
