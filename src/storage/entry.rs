use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published blog entry that responses are submitted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier for this entry.
    pub id: String,

    /// Blog this entry belongs to.
    pub blog_id: String,

    /// Entry title, used in notification email subjects.
    pub title: String,

    /// Permanent link to the entry, sent to spam classification services.
    pub permalink: String,

    /// Entry author display name.
    pub author: String,

    /// When this entry was published.
    pub posted_at: DateTime<Utc>,

    /// Whether this entry accepts comments.
    #[serde(default = "default_allows")]
    pub allows_comments: bool,

    /// Whether this entry accepts trackbacks.
    #[serde(default = "default_allows")]
    pub allows_trackbacks: bool,

    /// Whether this entry accepts pingbacks.
    #[serde(default = "default_allows")]
    pub allows_pingbacks: bool,
}

fn default_allows() -> bool {
    true
}

impl Entry {
    /// Create an entry that accepts every response kind.
    pub fn new(id: &str, blog_id: &str, title: &str, permalink: &str, author: &str) -> Self {
        Self {
            id: id.to_string(),
            blog_id: blog_id.to_string(),
            title: title.to_string(),
            permalink: permalink.to_string(),
            author: author.to_string(),
            posted_at: Utc::now(),
            allows_comments: true,
            allows_trackbacks: true,
            allows_pingbacks: true,
        }
    }

    /// Number of whole days elapsed since this entry was published.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.posted_at).num_days()
    }
}
