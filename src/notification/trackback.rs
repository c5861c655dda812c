//! Trackback email notification listener.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Mailer, added_of_kind, notify_added};
use crate::constants::{DEFAULT_TRACKBACK_EMAIL_PREFIX, TRACKBACK_EMAIL_PREFIX};
use crate::event::{Event, Listener};
use crate::storage::ResponseKind;

/// Emails the blog owner when a trackback is added.
///
/// No-op unless the blog has email enabled. The subject line is the
/// entry title prefixed with the `plugin-trackback-email-prefix`
/// property, falling back to a default prefix.
pub struct TrackbackEmailListener {
    mailer: Arc<dyn Mailer>,
}

impl TrackbackEmailListener {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl Listener for TrackbackEmailListener {
    fn id(&self) -> &str {
        "trackback-email"
    }

    async fn handle_event(&self, event: &Event) -> anyhow::Result<()> {
        let Some((blog, response, entry)) = added_of_kind(event, ResponseKind::Trackback) else {
            return Ok(());
        };

        if !blog.email_enabled {
            return Ok(());
        }

        let prefix = blog
            .property(TRACKBACK_EMAIL_PREFIX)
            .unwrap_or(DEFAULT_TRACKBACK_EMAIL_PREFIX);

        notify_added(
            self.mailer.as_ref(),
            "trackback_email",
            prefix,
            blog,
            entry,
            response,
        )
        .await;

        Ok(())
    }
}
