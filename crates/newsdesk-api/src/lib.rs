use async_trait::async_trait;
use newsdesk_models::{Collection, Desk, User};

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

/// Read access to the desks and users collections of the content API.
#[async_trait]
pub trait DeskSource: Send + Sync {
    /// First page of the `desks` collection, at most `max_results` items.
    async fn query_desks(&self, max_results: u32) -> Result<Collection<Desk>, ApiError>;

    /// One page of the `users` collection. Pages are 1-based.
    async fn list_users(&self, page: u32, max_results: u32) -> Result<Collection<User>, ApiError>;

    async fn get_desk(&self, id: &str) -> Result<Desk, ApiError>;

    /// Desks collection found at a hypermedia href, e.g. `users/42/desks`.
    async fn get_desks_by_href(&self, href: &str) -> Result<Collection<Desk>, ApiError>;
}
