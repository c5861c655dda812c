//! Notification listeners for terminal response-added events.
//!
//! When a response survives moderation and is persisted, a kind-specific
//! notification listener renders parallel text and HTML email bodies from
//! built-in templates and hands them to a [`Mailer`] transport.
//!
//! Notification is best-effort by design: the response has already
//! committed by the time these listeners run, so every failure here,
//! whether a template problem or a transport problem, is logged and
//! swallowed.

use async_trait::async_trait;
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use tracing::{debug, error};

use crate::errors::NotificationError;
use crate::event::Event;
use crate::storage::{Blog, Entry, Response};

pub mod comment;
pub mod smtp;
pub mod trackback;

pub use comment::CommentEmailListener;
pub use smtp::SmtpMailer;
pub use trackback::TrackbackEmailListener;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(
        "comment_email.txt",
        include_str!("templates/comment_email.txt.j2"),
    )
    .expect("comment text template is valid");
    env.add_template(
        "comment_email.html",
        include_str!("templates/comment_email.html.j2"),
    )
    .expect("comment html template is valid");
    env.add_template(
        "trackback_email.txt",
        include_str!("templates/trackback_email.txt.j2"),
    )
    .expect("trackback text template is valid");
    env.add_template(
        "trackback_email.html",
        include_str!("templates/trackback_email.html.j2"),
    )
    .expect("trackback html template is valid");
    env
});

/// A rendered notification email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Mail transport seam for notification delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. Implementations decide transport specifics;
    /// callers treat any error as a logged, non-fatal event.
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError>;
}

/// A mailer that silently discards every message.
///
/// Useful for deployments without a mail server and for tests.
#[derive(Debug, Clone, Default)]
pub struct NoopMailer;

impl NoopMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        debug!(to = %email.to_address, subject = %email.subject, "Discarding notification email");
        Ok(())
    }
}

/// Render the text and HTML bodies for a response notification.
pub(crate) fn render_bodies(
    template_base: &str,
    blog: &Blog,
    entry: &Entry,
    response: &Response,
) -> Result<(String, String), NotificationError> {
    let ctx = context! { blog => blog, entry => entry, response => response };

    let render = |name: String| -> Result<String, NotificationError> {
        TEMPLATES
            .get_template(&name)
            .and_then(|t| t.render(&ctx))
            .map_err(|source| NotificationError::TemplateRenderFailed {
                template: name,
                source,
            })
    };

    let text = render(format!("{template_base}.txt"))?;
    let html = render(format!("{template_base}.html"))?;
    Ok((text, html))
}

/// Build and deliver a notification for an added response, logging and
/// swallowing every failure.
pub(crate) async fn notify_added(
    mailer: &dyn Mailer,
    template_base: &str,
    subject_prefix: &str,
    blog: &Blog,
    entry: &Entry,
    response: &Response,
) {
    let (text_body, html_body) = match render_bodies(template_base, blog, entry, response) {
        Ok(bodies) => bodies,
        Err(e) => {
            error!(error = ?e, "Failed to render notification email");
            return;
        }
    };

    let email = OutboundEmail {
        to_name: blog.owner.clone(),
        to_address: blog.owner_email.clone(),
        subject: format!("{subject_prefix}{}", entry.title),
        text_body,
        html_body,
    };

    if let Err(e) = mailer.send(&email).await {
        error!(error = ?e, to = %email.to_address, "Failed to send notification email");
    }
}

/// The event's payload when it is an added event of the wanted kind.
pub(crate) fn added_of_kind<'a>(
    event: &'a Event,
    kind: crate::storage::ResponseKind,
) -> Option<(&'a Blog, &'a Response, &'a Entry)> {
    match event {
        Event::ResponseAdded {
            blog,
            response,
            entry,
        } if response.kind == kind => Some((blog, response, entry)),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use parking_lot::Mutex;

    /// Mailer that records every message it is handed.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
            self.sent.lock().push(email.clone());
            Ok(())
        }
    }

    /// Mailer that fails every send.
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutboundEmail) -> Result<(), NotificationError> {
            Err(NotificationError::TransportFailed {
                details: "simulated transport failure".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ResponseKind, ResponseStatus};

    fn fixtures() -> (Blog, Entry, Response) {
        let blog = Blog::new(
            "b1",
            "Example Blog",
            "http://example.com",
            "owner",
            "owner@example.com",
        );
        let entry = Entry::new("e1", "b1", "First post", "http://example.com/e1", "author");
        let response = Response::new(
            ResponseKind::Comment,
            "b1",
            "e1",
            "alice",
            "alice@example.com",
            "http://alice.example.com",
            "what a great post",
            "10.0.0.1",
            ResponseStatus::Approved,
        );
        (blog, entry, response)
    }

    #[test]
    fn test_render_bodies_populates_both_variants() {
        let (blog, entry, response) = fixtures();
        let (text, html) = render_bodies("comment_email", &blog, &entry, &response).unwrap();

        assert!(text.contains("First post"));
        assert!(text.contains("alice"));
        assert!(text.contains("what a great post"));
        assert!(html.contains("<a href=\"http://example.com/e1\">"));
        assert!(html.contains("what a great post"));
    }

    #[test]
    fn test_added_of_kind_filters_kind_and_variant() {
        let (blog, entry, response) = fixtures();
        let event = Event::ResponseAdded {
            blog: blog.clone(),
            response: response.clone(),
            entry: entry.clone(),
        };

        assert!(added_of_kind(&event, ResponseKind::Comment).is_some());
        assert!(added_of_kind(&event, ResponseKind::Trackback).is_none());

        let marked = Event::ResponseMarkedSpam {
            blog,
            response,
            entry,
        };
        assert!(added_of_kind(&marked, ResponseKind::Comment).is_none());
    }

    #[tokio::test]
    async fn test_notify_added_swallows_transport_failure() {
        let (blog, entry, response) = fixtures();

        // Must not panic or propagate
        notify_added(
            &test_support::FailingMailer,
            "comment_email",
            "[comment] ",
            &blog,
            &entry,
            &response,
        )
        .await;
    }
}
