//! Listener registry and the two dispatch primitives.
//!
//! The broadcaster is constructed explicitly at startup, populated with
//! every listener, and then shared behind an `Arc`. Registration order is
//! dispatch order, and that order is a first-class semantic for
//! [`EventBroadcaster::process_event`]: earlier listeners' verdict
//! contributions are visible to later ones.
//!
//! # Failure isolation
//!
//! A listener returning an error contributes no verdict for that event.
//! The error is logged and dispatch continues with the remaining
//! listeners; nothing propagates to the caller and no event is retried.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::{Event, ResponseSubmission};

/// A moderation or notification plugin.
///
/// Listeners implement a two-method contract. [`Listener::process_event`]
/// reacts to pre-commit submission events and may contribute to the shared
/// verdict; [`Listener::handle_event`] reacts to post-commit broadcast
/// events purely for side effects. Both default to no-ops so that
/// submission-only and broadcast-only listeners implement exactly one.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the registry is shared across
/// request tasks. Listeners are never invoked concurrently for the same
/// event, so they need no locking around the submission they are handed.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Short stable identifier, used for verdict attribution and logging.
    fn id(&self) -> &str;

    /// React to a pre-commit submission event.
    ///
    /// Implementations read blog-scoped configuration from
    /// `submission.blog`, evaluate their predicate, and record a decision
    /// on `submission.verdict`. Absent or blank configuration must lead to
    /// abstention, never to a spam finding.
    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        let _ = submission;
        Ok(())
    }

    /// React to a post-commit broadcast event.
    async fn handle_event(&self, event: &Event) -> anyhow::Result<()> {
        let _ = event;
        Ok(())
    }
}

/// Registry of listeners with sequential dispatch.
///
/// Listeners are stored in registration order; registering the same
/// listener twice means it runs twice. The registry is write-once: it is
/// built at startup and only read afterwards, so sharing an immutable
/// instance behind `Arc` is safe for concurrent dispatch from many
/// request tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use moderato::event::EventBroadcaster;
/// use moderato::moderation::{IpAddressListener, SpamPhraseListener};
///
/// let broadcaster = Arc::new(
///     EventBroadcaster::new()
///         .listener(Arc::new(IpAddressListener::new()))
///         .listener(Arc::new(SpamPhraseListener::new())),
/// );
/// ```
pub struct EventBroadcaster {
    listeners: Vec<Arc<dyn Listener>>,
}

impl EventBroadcaster {
    /// Create a broadcaster with no listeners registered.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener, returning `self` for chaining.
    ///
    /// Duplicate registration is not deduplicated; a listener registered
    /// twice is invoked twice per event.
    pub fn listener(mut self, listener: Arc<dyn Listener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Register a listener on an already-built broadcaster.
    pub fn add_listener(&mut self, listener: Arc<dyn Listener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch a pre-commit submission through every listener.
    ///
    /// Listeners run strictly sequentially, in registration order, against
    /// the same submission instance; each sees the verdict and metadata
    /// mutations of its predecessors. Returns only after every listener
    /// has run.
    pub async fn process_event(&self, submission: &mut ResponseSubmission) {
        for listener in &self.listeners {
            if let Err(e) = listener.process_event(submission).await {
                warn!(
                    listener = listener.id(),
                    error = ?e,
                    kind = %submission.kind,
                    "Listener failed while processing submission, continuing with remaining listeners"
                );
            }
        }
    }

    /// Broadcast a post-commit event to every listener.
    ///
    /// Side-effect only; listener errors are logged and swallowed.
    pub async fn broadcast_event(&self, event: &Event) {
        for listener in &self.listeners {
            if let Err(e) = listener.handle_event(event).await {
                warn!(
                    listener = listener.id(),
                    error = ?e,
                    kind = %event.kind(),
                    "Listener failed while handling broadcast event"
                );
            }
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Decision, RequestContext};
    use crate::storage::{Blog, Entry, ResponseKind};
    use parking_lot::Mutex;

    fn test_submission() -> ResponseSubmission {
        let blog = Blog::new("b1", "Test", "http://example.com", "owner", "o@example.com");
        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        ResponseSubmission::new(
            ResponseKind::Comment,
            blog,
            entry,
            RequestContext::new("10.0.0.1"),
            "alice",
            "alice@example.com",
            "",
            "hello",
        )
    }

    /// Records every invocation into a shared log.
    struct RecordingListener {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
        decision: Option<Decision>,
    }

    #[async_trait]
    impl Listener for RecordingListener {
        fn id(&self) -> &str {
            &self.name
        }

        async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
            self.log.lock().push(format!("process:{}", self.name));
            if let Some(decision) = self.decision {
                submission.verdict.record(&self.name, decision);
            }
            Ok(())
        }

        async fn handle_event(&self, _event: &Event) -> anyhow::Result<()> {
            self.log.lock().push(format!("handle:{}", self.name));
            Ok(())
        }
    }

    struct FailingListener;

    #[async_trait]
    impl Listener for FailingListener {
        fn id(&self) -> &str {
            "failing"
        }

        async fn process_event(&self, _submission: &mut ResponseSubmission) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("simulated listener failure"))
        }
    }

    #[tokio::test]
    async fn test_process_event_runs_listeners_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let broadcaster = EventBroadcaster::new()
            .listener(Arc::new(RecordingListener {
                name: "first".to_string(),
                log: log.clone(),
                decision: None,
            }))
            .listener(Arc::new(RecordingListener {
                name: "second".to_string(),
                log: log.clone(),
                decision: None,
            }))
            .listener(Arc::new(RecordingListener {
                name: "third".to_string(),
                log: log.clone(),
                decision: None,
            }));

        let mut submission = test_submission();
        broadcaster.process_event(&mut submission).await;

        assert_eq!(
            *log.lock(),
            vec!["process:first", "process:second", "process:third"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_means_duplicate_invocation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = Arc::new(RecordingListener {
            name: "dup".to_string(),
            log: log.clone(),
            decision: None,
        });

        let broadcaster = EventBroadcaster::new()
            .listener(listener.clone())
            .listener(listener);

        let mut submission = test_submission();
        broadcaster.process_event(&mut submission).await;

        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_listener_does_not_stop_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let broadcaster = EventBroadcaster::new()
            .listener(Arc::new(FailingListener))
            .listener(Arc::new(RecordingListener {
                name: "after".to_string(),
                log: log.clone(),
                decision: Some(Decision::Hold),
            }));

        let mut submission = test_submission();
        broadcaster.process_event(&mut submission).await;

        // The listener after the failure still ran and recorded a verdict
        assert_eq!(*log.lock(), vec!["process:after"]);
        assert_eq!(submission.verdict.approved(), Some(false));
    }

    #[tokio::test]
    async fn test_later_listeners_see_earlier_verdicts() {
        struct VerdictInspector {
            saw_hold: Arc<Mutex<bool>>,
        }

        #[async_trait]
        impl Listener for VerdictInspector {
            fn id(&self) -> &str {
                "inspector"
            }

            async fn process_event(
                &self,
                submission: &mut ResponseSubmission,
            ) -> anyhow::Result<()> {
                *self.saw_hold.lock() = submission.verdict.approved() == Some(false);
                Ok(())
            }
        }

        let saw_hold = Arc::new(Mutex::new(false));
        let log = Arc::new(Mutex::new(Vec::new()));
        let broadcaster = EventBroadcaster::new()
            .listener(Arc::new(RecordingListener {
                name: "holder".to_string(),
                log,
                decision: Some(Decision::Hold),
            }))
            .listener(Arc::new(VerdictInspector {
                saw_hold: saw_hold.clone(),
            }));

        let mut submission = test_submission();
        broadcaster.process_event(&mut submission).await;

        assert!(*saw_hold.lock());
    }

    #[tokio::test]
    async fn test_broadcast_event_reaches_every_listener() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let broadcaster = EventBroadcaster::new()
            .listener(Arc::new(RecordingListener {
                name: "a".to_string(),
                log: log.clone(),
                decision: None,
            }))
            .listener(Arc::new(RecordingListener {
                name: "b".to_string(),
                log: log.clone(),
                decision: None,
            }));

        let submission = test_submission();
        let response = crate::storage::Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "",
            "hello",
            "10.0.0.1",
            crate::storage::ResponseStatus::Approved,
        );
        let event = Event::ResponseAdded {
            blog: submission.blog.clone(),
            response,
            entry: submission.entry.clone(),
        };

        broadcaster.broadcast_event(&event).await;

        assert_eq!(*log.lock(), vec!["handle:a", "handle:b"]);
    }

    #[tokio::test]
    async fn test_broadcaster_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventBroadcaster>();
        assert_send_sync::<Arc<dyn Listener>>();
    }
}
