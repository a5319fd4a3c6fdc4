//! Site Errors

use page_binding::StorageError;

pub type SiteResult<T> = Result<T, SiteError>;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),
}
