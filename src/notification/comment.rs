//! Comment email notification listener.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Mailer, added_of_kind, notify_added};
use crate::constants::{COMMENT_EMAIL_PREFIX, DEFAULT_COMMENT_EMAIL_PREFIX};
use crate::event::{Event, Listener};
use crate::storage::ResponseKind;

/// Emails the blog owner when a comment is added.
///
/// No-op unless the blog has email enabled. The subject line is the
/// entry title prefixed with the `plugin-comment-email-prefix` property,
/// falling back to a default prefix.
pub struct CommentEmailListener {
    mailer: Arc<dyn Mailer>,
}

impl CommentEmailListener {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl Listener for CommentEmailListener {
    fn id(&self) -> &str {
        "comment-email"
    }

    async fn handle_event(&self, event: &Event) -> anyhow::Result<()> {
        let Some((blog, response, entry)) = added_of_kind(event, ResponseKind::Comment) else {
            return Ok(());
        };

        if !blog.email_enabled {
            return Ok(());
        }

        let prefix = blog
            .property(COMMENT_EMAIL_PREFIX)
            .unwrap_or(DEFAULT_COMMENT_EMAIL_PREFIX);

        notify_added(
            self.mailer.as_ref(),
            "comment_email",
            prefix,
            blog,
            entry,
            response,
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::test_support::RecordingMailer;
    use crate::storage::{Blog, Entry, Response, ResponseStatus};

    fn added_event(blog: Blog) -> Event {
        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        let response = Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "",
            "great post",
            "10.0.0.1",
            ResponseStatus::Approved,
        );
        Event::ResponseAdded {
            blog,
            response,
            entry,
        }
    }

    fn blog_with_email() -> Blog {
        let mut blog = Blog::new(
            "b1",
            "Example Blog",
            "http://example.com",
            "owner",
            "owner@example.com",
        );
        blog.email_enabled = true;
        blog
    }

    #[tokio::test]
    async fn test_comment_added_sends_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let listener = CommentEmailListener::new(mailer.clone());

        listener.handle_event(&added_event(blog_with_email())).await.unwrap();

        let sent = mailer.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_address, "owner@example.com");
        assert_eq!(sent[0].subject, "[comment] First post");
        assert!(sent[0].text_body.contains("great post"));
        assert!(sent[0].html_body.contains("great post"));
    }

    #[tokio::test]
    async fn test_email_disabled_is_a_no_op() {
        let mailer = Arc::new(RecordingMailer::default());
        let listener = CommentEmailListener::new(mailer.clone());

        let blog = Blog::new(
            "b1",
            "Example Blog",
            "http://example.com",
            "owner",
            "owner@example.com",
        );
        listener.handle_event(&added_event(blog)).await.unwrap();

        assert!(mailer.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_configured_prefix_wins() {
        let mailer = Arc::new(RecordingMailer::default());
        let listener = CommentEmailListener::new(mailer.clone());

        let blog = blog_with_email().with_property("plugin-comment-email-prefix", "New comment: ");
        listener.handle_event(&added_event(blog)).await.unwrap();

        assert_eq!(mailer.sent.lock()[0].subject, "New comment: First post");
    }

    #[tokio::test]
    async fn test_trackback_added_is_ignored() {
        let mailer = Arc::new(RecordingMailer::default());
        let listener = CommentEmailListener::new(mailer.clone());

        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        let response = Response::new(
            ResponseKind::Trackback,
            "b1",
            "e1",
            "other blog",
            "http://other.example.com",
            "",
            "excerpt",
            "10.0.0.2",
            ResponseStatus::Approved,
        );
        let event = Event::ResponseAdded {
            blog: blog_with_email(),
            response,
            entry,
        };

        listener.handle_event(&event).await.unwrap();

        assert!(mailer.sent.lock().is_empty());
    }
}
