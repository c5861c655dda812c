//! Open proxy moderation listener.
//!
//! Queries a DNS blackhole list when a response is submitted. The
//! submitter's IPv4 address is reversed octet-wise and resolved under the
//! configured zone; a successful resolution means the address is listed as
//! an open proxy. This listener works in conjunction with the other
//! moderation listeners, contributing to the same shared verdict.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

use super::spam_decision;
use crate::constants::{DEFAULT_DNSBL_ZONE, DELETE_OPEN_PROXY_SPAM};
use crate::event::{Listener, ResponseSubmission};

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Listener flagging submissions from addresses on a DNS blackhole list.
///
/// Configuration properties:
///
/// * `delete-openproxy-spam` - destroy instead of queueing for moderation
///
/// A lookup that does not resolve means the address is not listed, so the
/// listener abstains. Resolution failures and timeouts also abstain;
/// the blackhole list being unreachable must never flag legitimate
/// submissions. Addresses that are not plain IPv4 abstain as well.
#[derive(Debug, Clone)]
pub struct OpenProxyListener {
    zone: String,
    lookup_timeout: Duration,
}

impl OpenProxyListener {
    /// Create a listener against the default blackhole zone.
    pub fn new() -> Self {
        Self {
            zone: DEFAULT_DNSBL_ZONE.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Create a listener against a specific blackhole zone.
    pub fn with_zone(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the lookup timeout, returning `self` for chaining.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Blackhole query hostname for an IPv4 address: octets reversed,
    /// prepended to the zone.
    pub(crate) fn query_host(&self, addr: Ipv4Addr) -> String {
        let [a, b, c, d] = addr.octets();
        format!("{d}.{c}.{b}.{a}.{}", self.zone)
    }

    async fn is_listed(&self, addr: Ipv4Addr) -> bool {
        let host = self.query_host(addr);

        let lookup = tokio::net::lookup_host((host.as_str(), 0));
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(_)) => {
                // Not listed, or the resolver is unreachable. Either way
                // the listener abstains.
                false
            }
            Err(_) => {
                tracing::debug!(host = %host, "Blackhole list lookup timed out");
                false
            }
        }
    }
}

impl Default for OpenProxyListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for OpenProxyListener {
    fn id(&self) -> &str {
        "open-proxy"
    }

    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        let Some(remote_addr) = submission.remote_addr() else {
            return Ok(());
        };

        let Ok(addr) = remote_addr.parse::<Ipv4Addr>() else {
            tracing::debug!(ip = %remote_addr, "Remote address is not IPv4, skipping open proxy check");
            return Ok(());
        };

        if self.is_listed(addr).await {
            tracing::debug!(ip = %remote_addr, "Failed open proxy check for response submission");
            let delete = submission.blog.bool_property(DELETE_OPEN_PROXY_SPAM);
            submission.verdict.record(self.id(), spam_decision(delete));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RequestContext;
    use crate::storage::{Blog, Entry, ResponseKind};

    fn submission_from(remote_addr: &str) -> ResponseSubmission {
        let blog = Blog::new("b1", "Test", "http://example.com", "owner", "o@example.com");
        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        ResponseSubmission::new(
            ResponseKind::Comment,
            blog,
            entry,
            RequestContext::new(remote_addr),
            "alice",
            "",
            "",
            "hello",
        )
    }

    #[test]
    fn test_query_host_reverses_octets() {
        let listener = OpenProxyListener::with_zone("bl.example.org");
        assert_eq!(
            listener.query_host(Ipv4Addr::new(192, 168, 1, 5)),
            "5.1.168.192.bl.example.org"
        );
    }

    #[tokio::test]
    async fn test_non_ipv4_address_abstains() {
        let listener = OpenProxyListener::new();
        let mut submission = submission_from("2001:db8::1");

        listener.process_event(&mut submission).await.unwrap();

        assert!(submission.verdict.is_abstained());
    }

    #[tokio::test]
    async fn test_unlisted_address_abstains() {
        // An invalid TLD guarantees the lookup cannot resolve
        let listener = OpenProxyListener::with_zone("bl.invalid")
            .lookup_timeout(Duration::from_millis(500));
        let mut submission = submission_from("192.0.2.1");

        listener.process_event(&mut submission).await.unwrap();

        assert!(submission.verdict.is_abstained());
    }

    #[tokio::test]
    async fn test_missing_remote_address_abstains() {
        let listener = OpenProxyListener::new();
        let blog = Blog::new("b1", "Test", "http://example.com", "owner", "o@example.com");
        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        let mut submission = ResponseSubmission::new(
            ResponseKind::Comment,
            blog,
            entry,
            RequestContext::default(),
            "alice",
            "",
            "",
            "hello",
        );

        listener.process_event(&mut submission).await.unwrap();

        assert!(submission.verdict.is_abstained());
    }
}
