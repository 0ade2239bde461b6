use std::sync::Arc;

use newsdesk_api::ApiError;
use newsdesk_storage::StorageError;
use thiserror::Error;

/// Outcome of a failed initialization, shared by every caller awaiting it.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("failed to fetch desks: {0}")]
    Desks(Arc<ApiError>),
    #[error("failed to fetch users: {0}")]
    Users(Arc<ApiError>),
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
