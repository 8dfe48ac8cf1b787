pub mod client;
pub mod error;
pub mod types;

pub use client::CatalogClient;
pub use error::FetchError;
