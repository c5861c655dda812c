//! Moderation listeners for inbound response submissions.
//!
//! Each listener in this module implements the two-phase [`Listener`]
//! contract: it evaluates a predicate against a pre-commit submission and,
//! on a spam finding, records either a destroy or a hold decision on the
//! shared verdict depending on the blog's delete flag for that check.
//!
//! Listeners are independent and composable. They coordinate only through
//! the typed verdict carried on the submission event, and they are invoked
//! strictly in registration order by the
//! [`crate::event::EventBroadcaster`].
//!
//! # Fail-open policy
//!
//! Absent or blank configuration for a listener (no blacklist, no API key)
//! always short-circuits to abstention, never to a spam finding. The
//! default-safe direction is permissive.

use regex::Regex;

use crate::errors::ModerationError;
use crate::event::Decision;
use crate::storage::Blog;

pub mod akismet;
pub mod ip;
pub mod link;
pub mod phrase;
pub mod proxy;

pub use akismet::{AkismetClient, AkismetListener};
pub use ip::IpAddressListener;
pub use link::LinkSpamListener;
pub use phrase::SpamPhraseListener;
pub use proxy::OpenProxyListener;

/// Load a newline-separated list from a blog property.
///
/// Blank properties yield an empty list; blank lines are dropped.
pub(crate) fn load_property_list(blog: &Blog, key: &str) -> Vec<String> {
    blog.property(key)
        .map(|value| {
            value
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Whole-string regex or substring match, the matching rule every
/// list-based listener uses for its patterns.
///
/// The pattern is first applied as an anchored regular expression and then
/// as a plain substring. An invalid pattern is an error so that the
/// dispatch boundary can skip the listener for this event.
pub(crate) fn matches_pattern(candidate: &str, pattern: &str) -> Result<bool, ModerationError> {
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        ModerationError::PatternCompilationFailed {
            pattern: pattern.to_string(),
            details: e.to_string(),
        }
    })?;

    Ok(regex.is_match(candidate) || candidate.contains(pattern))
}

/// Decision for a positive spam finding given the blog's delete flag.
pub(crate) fn spam_decision(delete: bool) -> Decision {
    if delete {
        Decision::Destroy
    } else {
        Decision::Hold
    }
}
