use serde::{Deserialize, Serialize};

/// The signed-in account, as far as the client knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    /// Only the register endpoint hands back an id.
    pub id: Option<u64>,
}

/// Authentication state of the current user.
///
/// There is no stored `is_authenticated` flag: a session is authenticated
/// exactly when it carries a non-empty token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Mark the session authenticated. An empty token leaves it anonymous.
    pub fn authenticate(&mut self, token: String, user: Option<User>) {
        if token.is_empty() {
            self.sign_out();
            return;
        }
        self.token = Some(token);
        self.user = user;
        self.last_error = None;
    }

    /// Drop token and user. `loading` is left alone since it tracks
    /// in-flight requests, not the outcome of this one.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.last_error = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
