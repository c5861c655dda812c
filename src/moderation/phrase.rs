//! Spam phrase moderation listener.
//!
//! Matches a blog-configured phrase blacklist against the submission
//! content and every submitter-supplied field. Phrases match as anchored
//! regular expressions or plain substrings.

use async_trait::async_trait;

use super::{load_property_list, matches_pattern, spam_decision};
use crate::constants::{DELETE_PHRASE_SPAM, SPAM_PHRASE_BLACKLIST};
use crate::event::{Listener, ResponseSubmission};

/// Listener flagging submissions that contain configured spam phrases.
///
/// Configuration properties:
///
/// * `spam-phrase-blacklist` - newline-separated phrase list
/// * `delete-phrasespam` - destroy instead of queueing for moderation
#[derive(Debug, Clone, Default)]
pub struct SpamPhraseListener;

impl SpamPhraseListener {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Listener for SpamPhraseListener {
    fn id(&self) -> &str {
        "spam-phrase"
    }

    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        if submission.content.trim().is_empty() {
            tracing::debug!("No content to evaluate for response");
            return Ok(());
        }

        let phrases = load_property_list(&submission.blog, SPAM_PHRASE_BLACKLIST);
        if phrases.is_empty() {
            tracing::debug!("Spam phrase blacklist not populated");
            return Ok(());
        }

        let candidates = [
            submission.content.as_str(),
            submission.submitter.as_str(),
            submission.submitter_item1.as_str(),
            submission.submitter_item2.as_str(),
        ];

        let mut phrase_spam_found = false;
        'phrases: for phrase in &phrases {
            for candidate in candidates {
                if matches_pattern(candidate, phrase)? {
                    tracing::debug!(phrase = %phrase, "Spam phrase found in submission");
                    phrase_spam_found = true;
                    break 'phrases;
                }
            }
        }

        if phrase_spam_found {
            let delete = submission.blog.bool_property(DELETE_PHRASE_SPAM);
            submission.verdict.record(self.id(), spam_decision(delete));
        }

        Ok(())
    }
}
