//! Storage layer abstractions for blogs, entries, and responses.
//!
//! The moderation pipeline never owns persistence. It consumes a narrow
//! [`Fetcher`] trait for loading entries and saving responses, and the
//! orchestration layer decides when to call it. A [`memory::MemoryFetcher`]
//! implementation is provided for tests and embedding.

use async_trait::async_trait;

use crate::errors::StorageError;

pub mod blog;
pub mod entry;
pub mod memory;
pub mod response;

pub use blog::Blog;
pub use entry::Entry;
pub use response::{Response, ResponseKind, ResponseStatus};

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Persistence seam consumed by the response orchestration layer.
///
/// Implementations must be `Send + Sync`; they are shared across request
/// tasks behind an `Arc`. The pipeline calls this trait only from the
/// orchestration layer, never from listeners.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Load a single entry from a blog.
    ///
    /// # Returns
    ///
    /// * `Ok(entry)` - Entry found and loaded
    /// * `Err(StorageError::EntryNotFound)` - No entry with the given id
    async fn load_entry(&self, blog_id: &str, entry_id: &str) -> StorageResult<Entry>;

    /// Persist a response against its entry.
    async fn save_response(&self, blog: &Blog, response: &Response) -> StorageResult<()>;

    /// Load a previously persisted response.
    async fn load_response(&self, blog_id: &str, response_id: &str) -> StorageResult<Response>;

    /// Update the status of a persisted response.
    ///
    /// Used by the moderation queue when a human approves, rejects, or
    /// marks a response as spam.
    async fn update_response_status(
        &self,
        blog_id: &str,
        response_id: &str,
        status: ResponseStatus,
    ) -> StorageResult<()>;
}
