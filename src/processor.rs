//! Response submission orchestration.
//!
//! The processor is the caller side of the moderation protocol. For every
//! inbound comment, trackback, or pingback it:
//!
//! 1. applies the per-IP throttle gate before any event exists,
//! 2. loads the target entry and checks that the response kind is
//!    accepted by the blog and the entry,
//! 3. builds the [`ResponseSubmission`] and runs the sequential-veto
//!    dispatch through the [`EventBroadcaster`],
//! 4. routes on the verdict disposition: discard without persisting,
//!    persist pending, or persist approved,
//! 5. broadcasts the terminal added event for persisted responses.
//!
//! It also hosts the moderation queue actions that flip a persisted
//! response's status and broadcast the marked/unmarked spam events used
//! to train external classifiers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::constants::{
    COMMENT_DAYS_EXPIRATION, COMMENT_THROTTLE_MINUTES, TRACKBACK_THROTTLE_MINUTES,
};
use crate::errors::ProcessorError;
use crate::event::{Disposition, Event, EventBroadcaster, RequestContext, ResponseSubmission};
use crate::storage::{Blog, Fetcher, Response, ResponseKind, ResponseStatus};
use crate::throttle::ResponseThrottler;

/// A comment as it arrives from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub entry_id: String,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub content: String,
    pub request: RequestContext,
    /// Annotations collected before dispatch, seeded onto the submission
    /// event's metadata map.
    pub metadata: HashMap<String, Value>,
}

/// A trackback ping as it arrives from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct NewTrackback {
    pub entry_id: String,
    pub blog_name: String,
    pub title: String,
    pub url: String,
    pub excerpt: String,
    pub request: RequestContext,
    pub metadata: HashMap<String, Value>,
}

/// A pingback as it arrives from the XML-RPC layer.
#[derive(Debug, Clone, Default)]
pub struct NewPingback {
    pub entry_id: String,
    pub source_uri: String,
    pub target_uri: String,
    pub title: String,
    pub excerpt: String,
    pub request: RequestContext,
    pub metadata: HashMap<String, Value>,
}

/// Final outcome of one submission, as seen by the HTTP-facing caller.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Persisted in the approved state and broadcast.
    Published(Response),
    /// Persisted in the pending state for human review and broadcast.
    Queued(Response),
    /// Destroyed by the moderation chain; nothing was persisted.
    Discarded,
    /// Rejected before dispatch (throttled, kind disabled, expired).
    Rejected { reason: String },
}

/// Caller-side orchestrator for the moderation pipeline.
///
/// Built once at startup with the storage, dispatch, and throttle seams,
/// then shared across request tasks.
pub struct ResponseProcessor {
    fetcher: Arc<dyn Fetcher>,
    broadcaster: Arc<EventBroadcaster>,
    throttler: Arc<dyn ResponseThrottler>,
}

impl ResponseProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        broadcaster: Arc<EventBroadcaster>,
        throttler: Arc<dyn ResponseThrottler>,
    ) -> Self {
        Self {
            fetcher,
            broadcaster,
            throttler,
        }
    }

    /// Submit a comment through the moderation pipeline.
    pub async fn submit_comment(
        &self,
        blog: &Blog,
        comment: NewComment,
    ) -> Result<SubmissionOutcome, ProcessorError> {
        if !blog.comments_enabled {
            return Ok(SubmissionOutcome::Rejected {
                reason: "comments are disabled for this blog".to_string(),
            });
        }

        if let Some(outcome) = self
            .throttle_gate(blog, &comment.request, COMMENT_THROTTLE_MINUTES)
            .await
        {
            return Ok(outcome);
        }

        let entry = self.load_entry(blog, &comment.entry_id).await?;
        if !entry.allows_comments {
            return Ok(SubmissionOutcome::Rejected {
                reason: format!("comments are disabled for entry {}", entry.id),
            });
        }

        // Entries past the configured expiration no longer accept comments
        if let Some(days) = blog.property(COMMENT_DAYS_EXPIRATION) {
            if let Ok(expiration) = days.parse::<i64>() {
                if expiration > 0 && entry.age_in_days(chrono::Utc::now()) >= expiration {
                    debug!(entry = %entry.id, expiration, "Comment period for this entry has expired");
                    return Ok(SubmissionOutcome::Rejected {
                        reason: format!("comment period for entry {} has expired", entry.id),
                    });
                }
            }
        }

        let submission = ResponseSubmission::new(
            ResponseKind::Comment,
            blog.clone(),
            entry,
            comment.request,
            &comment.author,
            &comment.author_email,
            &comment.author_url,
            &comment.content,
        )
        .with_metadata(comment.metadata);

        self.dispatch_and_persist(blog, submission).await
    }

    /// Submit a trackback through the moderation pipeline.
    pub async fn submit_trackback(
        &self,
        blog: &Blog,
        trackback: NewTrackback,
    ) -> Result<SubmissionOutcome, ProcessorError> {
        if !blog.trackbacks_enabled {
            return Ok(SubmissionOutcome::Rejected {
                reason: "trackbacks are disabled for this blog".to_string(),
            });
        }

        if let Some(outcome) = self
            .throttle_gate(blog, &trackback.request, TRACKBACK_THROTTLE_MINUTES)
            .await
        {
            return Ok(outcome);
        }

        let entry = self.load_entry(blog, &trackback.entry_id).await?;
        if !entry.allows_trackbacks {
            return Ok(SubmissionOutcome::Rejected {
                reason: format!("trackbacks are disabled for entry {}", entry.id),
            });
        }

        let submission = ResponseSubmission::new(
            ResponseKind::Trackback,
            blog.clone(),
            entry,
            trackback.request,
            &trackback.blog_name,
            &trackback.title,
            &trackback.url,
            &trackback.excerpt,
        )
        .with_metadata(trackback.metadata);

        self.dispatch_and_persist(blog, submission).await
    }

    /// Submit a pingback through the moderation pipeline.
    ///
    /// Pingbacks are not throttled; the XML-RPC layer performs its own
    /// source verification before calling in.
    pub async fn submit_pingback(
        &self,
        blog: &Blog,
        pingback: NewPingback,
    ) -> Result<SubmissionOutcome, ProcessorError> {
        if !blog.pingbacks_enabled {
            return Ok(SubmissionOutcome::Rejected {
                reason: "pingbacks are disabled for this blog".to_string(),
            });
        }

        let entry = self.load_entry(blog, &pingback.entry_id).await?;
        if !entry.allows_pingbacks {
            return Ok(SubmissionOutcome::Rejected {
                reason: format!("pingbacks are disabled for entry {}", entry.id),
            });
        }

        let submission = ResponseSubmission::new(
            ResponseKind::Pingback,
            blog.clone(),
            entry,
            pingback.request,
            &pingback.title,
            &pingback.source_uri,
            &pingback.target_uri,
            &pingback.excerpt,
        )
        .with_metadata(pingback.metadata);

        self.dispatch_and_persist(blog, submission).await
    }

    /// Mark a persisted response as spam and broadcast the correction.
    pub async fn mark_spam(&self, blog: &Blog, response_id: &str) -> Result<(), ProcessorError> {
        let response = self
            .set_status(blog, response_id, ResponseStatus::Spam)
            .await?;
        let entry = self.load_entry(blog, &response.entry_id).await?;

        self.broadcaster
            .broadcast_event(&Event::ResponseMarkedSpam {
                blog: blog.clone(),
                response,
                entry,
            })
            .await;

        Ok(())
    }

    /// Clear a spam marking, restoring the response to the approved
    /// state, and broadcast the correction.
    pub async fn unmark_spam(&self, blog: &Blog, response_id: &str) -> Result<(), ProcessorError> {
        let response = self
            .set_status(blog, response_id, ResponseStatus::Approved)
            .await?;
        let entry = self.load_entry(blog, &response.entry_id).await?;

        self.broadcaster
            .broadcast_event(&Event::ResponseUnmarkedSpam {
                blog: blog.clone(),
                response,
                entry,
            })
            .await;

        Ok(())
    }

    async fn throttle_gate(
        &self,
        blog: &Blog,
        request: &RequestContext,
        interval_property: &str,
    ) -> Option<SubmissionOutcome> {
        let interval = blog.property(interval_property)?;
        let interval_minutes = interval
            .parse::<i64>()
            .unwrap_or(crate::constants::DEFAULT_THROTTLE_MINUTES);

        let key = request.remote_addr.as_deref()?;
        match self.throttler.throttle(key, interval_minutes).await {
            Ok(true) => {
                debug!(ip = %key, interval_minutes, "Submission throttled");
                Some(SubmissionOutcome::Rejected {
                    reason: "too many submissions from this address".to_string(),
                })
            }
            Ok(false) => None,
            Err(e) => {
                // Throttle check failures fail open
                tracing::warn!(error = ?e, ip = %key, "Throttle check failed, allowing submission");
                None
            }
        }
    }

    async fn load_entry(
        &self,
        blog: &Blog,
        entry_id: &str,
    ) -> Result<crate::storage::Entry, ProcessorError> {
        self.fetcher
            .load_entry(&blog.id, entry_id)
            .await
            .map_err(|source| ProcessorError::EntryLookupFailed {
                entry_id: entry_id.to_string(),
                source,
            })
    }

    async fn set_status(
        &self,
        blog: &Blog,
        response_id: &str,
        status: ResponseStatus,
    ) -> Result<Response, ProcessorError> {
        self.fetcher
            .update_response_status(&blog.id, response_id, status)
            .await
            .map_err(|source| ProcessorError::PersistenceFailed { source })?;

        self.fetcher
            .load_response(&blog.id, response_id)
            .await
            .map_err(|source| ProcessorError::PersistenceFailed { source })
    }

    async fn dispatch_and_persist(
        &self,
        blog: &Blog,
        mut submission: ResponseSubmission,
    ) -> Result<SubmissionOutcome, ProcessorError> {
        self.broadcaster.process_event(&mut submission).await;

        let disposition = submission.verdict.disposition();
        let status = match disposition {
            Disposition::Discard => {
                info!(
                    kind = %submission.kind,
                    entry = %submission.entry.id,
                    contributed_by = ?submission.verdict.contributed_by(),
                    "Response destroyed by moderation chain, not persisting"
                );
                return Ok(SubmissionOutcome::Discarded);
            }
            Disposition::HoldForModeration => ResponseStatus::Pending,
            Disposition::Publish => ResponseStatus::Approved,
        };

        let mut response = Response::new(
            submission.kind,
            &blog.id,
            &submission.entry.id,
            &submission.submitter,
            &submission.submitter_item1,
            &submission.submitter_item2,
            &submission.content,
            submission.remote_addr().unwrap_or_default(),
            status,
        );
        response.metadata = submission.metadata.clone();
        if !submission.verdict.is_abstained() {
            response.metadata.insert(
                "moderation".to_string(),
                serde_json::to_value(&submission.verdict).unwrap_or(Value::Null),
            );
        }

        self.fetcher
            .save_response(blog, &response)
            .await
            .map_err(|source| ProcessorError::PersistenceFailed { source })?;

        self.broadcaster
            .broadcast_event(&Event::ResponseAdded {
                blog: blog.clone(),
                response: response.clone(),
                entry: submission.entry,
            })
            .await;

        match disposition {
            Disposition::HoldForModeration => Ok(SubmissionOutcome::Queued(response)),
            _ => Ok(SubmissionOutcome::Published(response)),
        }
    }
}
