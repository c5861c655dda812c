//! In-memory [`Fetcher`] implementation.
//!
//! Suitable for tests and for embedding the pipeline without a database.
//! All state lives in maps behind `parking_lot` locks; guards are never
//! held across await points.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{Blog, Entry, Fetcher, Response, ResponseStatus, StorageResult};
use crate::errors::StorageError;

/// Map-backed fetcher.
#[derive(Default)]
pub struct MemoryFetcher {
    entries: RwLock<HashMap<(String, String), Entry>>,
    responses: RwLock<HashMap<(String, String), Response>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, replacing any previous entry with the same id.
    pub fn put_entry(&self, entry: Entry) {
        self.entries
            .write()
            .insert((entry.blog_id.clone(), entry.id.clone()), entry);
    }

    /// Number of responses currently stored for a blog.
    pub fn response_count(&self, blog_id: &str) -> usize {
        self.responses
            .read()
            .keys()
            .filter(|(b, _)| b == blog_id)
            .count()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn load_entry(&self, blog_id: &str, entry_id: &str) -> StorageResult<Entry> {
        self.entries
            .read()
            .get(&(blog_id.to_string(), entry_id.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            })
    }

    async fn save_response(&self, blog: &Blog, response: &Response) -> StorageResult<()> {
        if response.blog_id != blog.id {
            return Err(StorageError::InvalidInput {
                details: format!(
                    "response blog id {} does not match blog {}",
                    response.blog_id, blog.id
                ),
            });
        }

        self.responses.write().insert(
            (response.blog_id.clone(), response.id.clone()),
            response.clone(),
        );
        Ok(())
    }

    async fn load_response(&self, blog_id: &str, response_id: &str) -> StorageResult<Response> {
        self.responses
            .read()
            .get(&(blog_id.to_string(), response_id.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::ResponseNotFound {
                response_id: response_id.to_string(),
            })
    }

    async fn update_response_status(
        &self,
        blog_id: &str,
        response_id: &str,
        status: ResponseStatus,
    ) -> StorageResult<()> {
        let mut responses = self.responses.write();
        let response = responses
            .get_mut(&(blog_id.to_string(), response_id.to_string()))
            .ok_or_else(|| StorageError::ResponseNotFound {
                response_id: response_id.to_string(),
            })?;

        response.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ResponseKind;

    fn test_entry() -> Entry {
        Entry::new("e1", "b1", "First post", "http://example.com/e1", "author")
    }

    fn test_response() -> Response {
        Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "",
            "hello",
            "10.0.0.1",
            ResponseStatus::Pending,
        )
    }

    #[tokio::test]
    async fn test_load_entry_roundtrip() {
        let fetcher = MemoryFetcher::new();
        fetcher.put_entry(test_entry());

        let entry = fetcher.load_entry("b1", "e1").await.unwrap();
        assert_eq!(entry.title, "First post");

        let missing = fetcher.load_entry("b1", "nope").await;
        assert!(matches!(missing, Err(StorageError::EntryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_save_and_update_response() {
        let fetcher = MemoryFetcher::new();
        let blog = Blog::new("b1", "Test", "http://example.com", "owner", "o@example.com");
        let response = test_response();
        let id = response.id.clone();

        fetcher.save_response(&blog, &response).await.unwrap();
        assert_eq!(fetcher.response_count("b1"), 1);

        fetcher
            .update_response_status("b1", &id, ResponseStatus::Spam)
            .await
            .unwrap();

        let loaded = fetcher.load_response("b1", &id).await.unwrap();
        assert_eq!(loaded.status, ResponseStatus::Spam);
    }

    #[tokio::test]
    async fn test_save_rejects_mismatched_blog() {
        let fetcher = MemoryFetcher::new();
        let other_blog = Blog::new("b2", "Other", "http://other.com", "owner", "o@example.com");

        let result = fetcher.save_response(&other_blog, &test_response()).await;
        assert!(matches!(result, Err(StorageError::InvalidInput { .. })));
    }
}
