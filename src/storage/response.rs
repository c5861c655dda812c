use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The kind of reader-submitted response: comment, trackback, or pingback.
///
/// Listeners discriminate behavior on this kind rather than on concrete
/// event types, and per-kind configuration keys are resolved through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Comment,
    Trackback,
    Pingback,
}

impl ResponseKind {
    /// Stable lowercase form, also used as the spam classification
    /// `comment_type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Comment => "comment",
            ResponseKind::Trackback => "trackback",
            ResponseKind::Pingback => "pingback",
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a persisted response.
///
/// `Pending` responses sit in the human moderation queue; `Approved`
/// responses are published; `Spam` responses were rejected by a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[serde(rename = "new")]
    Pending,
    Approved,
    Spam,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "new",
            ResponseStatus::Approved => "approved",
            ResponseStatus::Spam => "spam",
        }
    }
}

/// A persisted comment, trackback, or pingback.
///
/// The two `submitter_item` fields carry kind-specific contact data:
/// author email and URL for comments, linking post title and URL for
/// trackbacks, source and target URIs for pingbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Generated ulid identifier.
    pub id: String,

    pub kind: ResponseKind,

    /// Entry this response was submitted against.
    pub entry_id: String,

    /// Blog the entry belongs to.
    pub blog_id: String,

    /// Submitter display name (comment author, trackback blog name).
    pub submitter: String,

    pub submitter_item1: String,

    pub submitter_item2: String,

    /// Response body text.
    pub content: String,

    /// Remote address the submission arrived from.
    pub ip: String,

    pub submitted_at: DateTime<Utc>,

    pub status: ResponseStatus,

    /// Free-form metadata carried over from the submission event at save
    /// time, owned by the persistence layer thereafter.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Response {
    /// Create a response with a fresh ulid and the given status.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ResponseKind,
        blog_id: &str,
        entry_id: &str,
        submitter: &str,
        submitter_item1: &str,
        submitter_item2: &str,
        content: &str,
        ip: &str,
        status: ResponseStatus,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind,
            entry_id: entry_id.to_string(),
            blog_id: blog_id.to_string(),
            submitter: submitter.to_string(),
            submitter_item1: submitter_item1.to_string(),
            submitter_item2: submitter_item2.to_string(),
            content: content.to_string(),
            ip: ip.to_string(),
            submitted_at: Utc::now(),
            status,
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_forms() {
        assert_eq!(ResponseKind::Comment.as_str(), "comment");
        assert_eq!(ResponseKind::Trackback.as_str(), "trackback");
        assert_eq!(ResponseKind::Pingback.as_str(), "pingback");
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(ResponseStatus::Pending.as_str(), "new");
        assert_eq!(ResponseStatus::Approved.as_str(), "approved");
        assert_eq!(ResponseStatus::Spam.as_str(), "spam");

        let json = serde_json::to_string(&ResponseStatus::Pending).unwrap();
        assert_eq!(json, "\"new\"");
    }

    #[test]
    fn test_response_ids_are_unique() {
        let a = Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "http://alice.example.com",
            "nice post",
            "10.0.0.1",
            ResponseStatus::Approved,
        );
        let b = Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "http://alice.example.com",
            "nice post",
            "10.0.0.1",
            ResponseStatus::Approved,
        );
        assert_ne!(a.id, b.id);
    }
}
