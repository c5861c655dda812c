//! Event types and dispatch for the response moderation pipeline.
//!
//! Two categories of event flow through the system:
//!
//! - [`ResponseSubmission`] is the pre-commit event. It is dispatched
//!   through [`broadcaster::EventBroadcaster::process_event`] before a
//!   response is persisted and carries veto power: listeners mutate its
//!   [`verdict::ModerationVerdict`] and metadata map in place.
//! - [`Event`] is the post-commit broadcast union. Added and
//!   marked/unmarked-spam events are dispatched through
//!   [`broadcaster::EventBroadcaster::broadcast_event`] purely for side
//!   effects; listeners have no veto at that point.
//!
//! Events live for the duration of a single dispatch. They are never
//! persisted, queued, or retried.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::storage::{Blog, Entry, Response, ResponseKind};

pub mod broadcaster;
pub mod verdict;

pub use broadcaster::{EventBroadcaster, Listener};
pub use verdict::{Decision, Disposition, ModerationVerdict};

/// Request-scoped context captured from the inbound HTTP request.
///
/// The HTTP layer itself is an external collaborator; only the fields the
/// moderation listeners actually inspect are carried on the event.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Remote address the submission arrived from, if known.
    pub remote_addr: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl RequestContext {
    pub fn new(remote_addr: &str) -> Self {
        Self {
            remote_addr: Some(remote_addr.to_string()),
            user_agent: None,
            referrer: None,
        }
    }
}

/// Pre-commit response submission event.
///
/// One instance exists per inbound submission. The broadcaster hands the
/// same instance to every listener in registration order; the verdict and
/// metadata map are mutated in place and never replaced wholesale.
/// Listeners may also rewrite the submitter and content fields, and the
/// orchestration layer reads them back after dispatch.
#[derive(Debug)]
pub struct ResponseSubmission {
    pub kind: ResponseKind,
    pub blog: Blog,
    pub entry: Entry,
    pub request: RequestContext,

    /// Submitter display name (comment author, trackback blog name).
    pub submitter: String,

    /// First kind-specific contact field (comment author email,
    /// trackback title, pingback source URI).
    pub submitter_item1: String,

    /// Second kind-specific contact field (comment author URL,
    /// trackback URL, pingback target URI).
    pub submitter_item2: String,

    /// Response body text.
    pub content: String,

    /// Free-form annotations, copied onto the persisted response at save
    /// time.
    pub metadata: HashMap<String, Value>,

    /// Accumulated moderation consensus.
    pub verdict: ModerationVerdict,

    pub created_at: DateTime<Utc>,
}

impl ResponseSubmission {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ResponseKind,
        blog: Blog,
        entry: Entry,
        request: RequestContext,
        submitter: &str,
        submitter_item1: &str,
        submitter_item2: &str,
        content: &str,
    ) -> Self {
        Self {
            kind,
            blog,
            entry,
            request,
            submitter: submitter.to_string(),
            submitter_item1: submitter_item1.to_string(),
            submitter_item2: submitter_item2.to_string(),
            content: content.to_string(),
            metadata: HashMap::new(),
            verdict: ModerationVerdict::new(),
            created_at: Utc::now(),
        }
    }

    /// Seed the metadata map, for callers that collected annotations
    /// before dispatch.
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Remote address of the submission, if the request carried one.
    pub fn remote_addr(&self) -> Option<&str> {
        self.request.remote_addr.as_deref()
    }
}

/// Post-commit broadcast events.
///
/// `ResponseAdded` is terminal for a submission; the marked/unmarked
/// variants originate from human actions in the moderation queue and are
/// used to train external spam classification services.
#[derive(Debug, Clone)]
pub enum Event {
    ResponseAdded {
        blog: Blog,
        response: Response,
        entry: Entry,
    },
    ResponseMarkedSpam {
        blog: Blog,
        response: Response,
        entry: Entry,
    },
    ResponseUnmarkedSpam {
        blog: Blog,
        response: Response,
        entry: Entry,
    },
}

impl Event {
    /// The response kind this event concerns.
    pub fn kind(&self) -> ResponseKind {
        match self {
            Event::ResponseAdded { response, .. }
            | Event::ResponseMarkedSpam { response, .. }
            | Event::ResponseUnmarkedSpam { response, .. } => response.kind,
        }
    }
}
