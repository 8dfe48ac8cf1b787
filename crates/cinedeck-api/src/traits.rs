//! Backend seams.
//!
//! The runtime talks to the auth and catalog services only through these
//! traits, so session and browsing logic can run against in-process fakes.

use std::future::Future;

use serde::Serialize;

use cinedeck_core::models::Movie;

use crate::auth::AuthError;
use crate::catalog::FetchError;

/// Email/password pair posted to the auth backend.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    /// Never empty.
    pub token: String,
    pub id: Option<u64>,
}

/// Email/password authentication service.
pub trait AuthBackend: Send + Sync {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthResponse, AuthError>> + Send;

    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthResponse, AuthError>> + Send;
}

/// Read-only movie catalog.
pub trait CatalogBackend: Send + Sync {
    /// The whole collection, in backend order.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Movie>, FetchError>> + Send;

    fn fetch_by_id(&self, id: u64) -> impl Future<Output = Result<Movie, FetchError>> + Send;
}
