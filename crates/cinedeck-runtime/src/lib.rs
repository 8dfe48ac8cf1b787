mod auth;
mod catalog;
mod favorites;
mod store;
#[cfg(test)]
mod testing;

use serde::Serialize;

use cinedeck_api::auth::{AuthClient, AuthError};
use cinedeck_api::catalog::{CatalogClient, FetchError};
use cinedeck_api::traits::{AuthBackend, CatalogBackend};
use cinedeck_core::config::AppConfig;
use cinedeck_core::models::{Movie, Session};
use cinedeck_core::storage::KeyValueStore;

pub use auth::AuthSession;
pub use catalog::{BrowseSnapshot, CatalogBrowser, CatalogFetcher, PageOutcome};
pub use favorites::FavoritesStore;
pub use store::StoreHandle;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// A movie plus whether the user has favorited it, for the details view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetailsDto {
    pub movie: Movie,
    pub is_favorite: bool,
}

/// One session, catalog browser and favorites list, wired to shared storage.
pub struct Runtime<A = AuthClient, C = CatalogClient, S = StoreHandle> {
    auth: AuthSession<A, S>,
    browser: CatalogBrowser<C>,
    favorites: FavoritesStore<S>,
}

impl Runtime {
    /// Build from the user's config: on-disk store and the real backends.
    /// Must run inside a Tokio runtime.
    pub fn new() -> Result<Self, RuntimeError> {
        let config = AppConfig::load().map_err(|e| RuntimeError::Config(e.to_string()))?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, RuntimeError> {
        let db_path = config
            .ensure_db_path()
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        let store =
            StoreHandle::open(&db_path).map_err(|e| RuntimeError::Storage(e.to_string()))?;

        let timeout = config.http.timeout();
        let auth = AuthClient::with_timeout(&config.auth.base_url, timeout)
            .map_err(|e| RuntimeError::Http(e.to_string()))?
            .with_api_key(config.auth.api_key.clone());
        let catalog = CatalogClient::with_timeout(&config.catalog.base_url, timeout)
            .map_err(|e| RuntimeError::Http(e.to_string()))?;

        tracing::debug!(db = %db_path.display(), "Runtime configured");
        Ok(Self::from_parts(auth, catalog, store))
    }
}

impl<A, C, S> Runtime<A, C, S>
where
    A: AuthBackend,
    C: CatalogBackend,
    S: KeyValueStore + Clone + 'static,
{
    /// Must run inside a Tokio runtime.
    pub fn from_parts(auth: A, catalog: C, store: S) -> Self {
        Self {
            auth: AuthSession::new(auth, store.clone()),
            browser: CatalogBrowser::new(CatalogFetcher::new(catalog)),
            favorites: FavoritesStore::new(store),
        }
    }

    /// Startup: restore the stored session, then load favorites.
    pub async fn start(&self) -> Session {
        let session = self.auth.restore_session().await;
        self.favorites.load().await;
        session
    }

    pub fn auth(&self) -> &AuthSession<A, S> {
        &self.auth
    }

    pub fn browser(&self) -> &CatalogBrowser<C> {
        &self.browser
    }

    pub fn catalog(&self) -> &CatalogFetcher<C> {
        self.browser.fetcher()
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub async fn movie_details(&self, id: u64) -> Result<MovieDetailsDto, FetchError> {
        let movie = self.catalog().fetch_by_id(id).await?;
        let is_favorite = self.favorites.is_favorite(movie.id);
        Ok(MovieDetailsDto { movie, is_favorite })
    }

    /// Favorites are only reachable for signed-in users.
    pub fn favorites_for_user(&self) -> Result<Vec<Movie>, AuthError> {
        self.auth.require_authenticated()?;
        Ok(self.favorites.movies())
    }
}
