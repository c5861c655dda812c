//! Link spam moderation listener.
//!
//! Counts anchor tags in the submission content and flags submissions at
//! or above a blog-configured threshold. Comment and trackback thresholds
//! are configured independently; pingbacks use the default.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::spam_decision;
use crate::constants::{
    DEFAULT_LINK_THRESHOLD, DELETE_LINK_SPAM, LINKSPAM_COMMENT_THRESHOLD,
    LINKSPAM_TRACKBACK_THRESHOLD,
};
use crate::event::{Listener, ResponseSubmission};
use crate::storage::ResponseKind;

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a.*?href=.*?>").expect("link pattern is valid"));

/// Listener flagging submissions that carry too many links.
///
/// Configuration properties:
///
/// * `linkspam-comment-threshold` - link count at which comments flag
/// * `linkspam-trackback-threshold` - link count at which trackbacks flag
/// * `delete-linkspam` - destroy instead of queueing for moderation
///
/// Absent or unparseable thresholds fall back to the default of 3.
#[derive(Debug, Clone, Default)]
pub struct LinkSpamListener;

impl LinkSpamListener {
    pub fn new() -> Self {
        Self
    }

    fn threshold_for(submission: &ResponseSubmission) -> u32 {
        let key = match submission.kind {
            ResponseKind::Comment => Some(LINKSPAM_COMMENT_THRESHOLD),
            ResponseKind::Trackback => Some(LINKSPAM_TRACKBACK_THRESHOLD),
            ResponseKind::Pingback => None,
        };

        key.map(|key| {
            submission
                .blog
                .int_property(key, DEFAULT_LINK_THRESHOLD as i64)
                .clamp(0, u32::MAX as i64) as u32
        })
        .unwrap_or(DEFAULT_LINK_THRESHOLD)
    }

    pub(crate) fn count_links(content: &str) -> u32 {
        LINK_PATTERN.find_iter(content).count() as u32
    }
}

#[async_trait]
impl Listener for LinkSpamListener {
    fn id(&self) -> &str {
        "link-spam"
    }

    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        if submission.content.trim().is_empty() {
            return Ok(());
        }

        let link_count = Self::count_links(&submission.content);
        let threshold = Self::threshold_for(submission);

        if link_count >= threshold {
            tracing::debug!(
                links = link_count,
                threshold,
                "Exceeded threshold for links in response"
            );
            let delete = submission.blog.bool_property(DELETE_LINK_SPAM);
            submission.verdict.record(self.id(), spam_decision(delete));
        }

        Ok(())
    }
}
