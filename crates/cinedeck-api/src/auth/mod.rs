pub mod client;
pub mod error;
pub mod types;

pub use client::AuthClient;
pub use error::AuthError;
