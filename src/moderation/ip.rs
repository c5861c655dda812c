//! IP address moderation listener.
//!
//! Checks the submission's remote address against a blog-configured
//! blacklist, honoring a whitelist that takes precedence. Addresses match
//! as anchored regular expressions or plain substrings, so both exact
//! addresses and range patterns like `192\.168\.1\..*` work.

use async_trait::async_trait;

use super::{load_property_list, matches_pattern, spam_decision};
use crate::constants::{DELETE_IP_SPAM, IP_BLACKLIST, IP_WHITELIST};
use crate::event::{Listener, ResponseSubmission};

/// Listener flagging submissions from blacklisted addresses.
///
/// Configuration properties:
///
/// * `ip-whitelist` - newline-separated patterns that always pass
/// * `ip-blacklist` - newline-separated patterns that flag the submission
/// * `delete-ipspam` - destroy instead of queueing for moderation
#[derive(Debug, Clone, Default)]
pub struct IpAddressListener;

impl IpAddressListener {
    pub fn new() -> Self {
        Self
    }

    fn any_match(address: &str, patterns: &[String]) -> anyhow::Result<bool> {
        for pattern in patterns {
            if matches_pattern(address, pattern)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl Listener for IpAddressListener {
    fn id(&self) -> &str {
        "ip-address"
    }

    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        let Some(remote_addr) = submission.remote_addr().map(str::to_string) else {
            tracing::debug!("IP address not available");
            return Ok(());
        };

        let whitelist = load_property_list(&submission.blog, IP_WHITELIST);
        if Self::any_match(&remote_addr, &whitelist)? {
            tracing::debug!(ip = %remote_addr, "IP address found in whitelist");
            return Ok(());
        }

        let blacklist = load_property_list(&submission.blog, IP_BLACKLIST);
        if blacklist.is_empty() {
            tracing::debug!("IP address blacklist not populated");
            return Ok(());
        }

        if Self::any_match(&remote_addr, &blacklist)? {
            tracing::debug!(ip = %remote_addr, "IP address found in blacklist");
            let delete = submission.blog.bool_property(DELETE_IP_SPAM);
            submission.verdict.record(self.id(), spam_decision(delete));
        }

        Ok(())
    }
}
