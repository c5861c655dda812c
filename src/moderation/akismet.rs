//! Akismet spam classification listener and HTTP client.
//!
//! The listener asks the Akismet service to classify each submission and
//! contributes the result to the shared verdict. Unlike the list-based
//! listeners it also reacts to moderation queue corrections: responses a
//! human marks or unmarks as spam are reported back to the service as
//! missed spam or false positives.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::spam_decision;
use crate::constants::{AKISMET_API_KEY, AKISMET_AUTOMATIC_APPROVAL, AKISMET_DELETE_SPAM};
use crate::errors::ModerationError;
use crate::event::{Event, Listener, ResponseSubmission};
use crate::storage::{Blog, Response};

const DEFAULT_ENDPOINT: &str = "https://rest.akismet.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One response's worth of classification data sent to the service.
///
/// The same payload shape is used for checking, reporting spam, and
/// reporting ham.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub user_ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub permalink: String,
    /// One of `comment`, `trackback`, `pingback`.
    pub comment_type: String,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub content: String,
}

impl Classification {
    fn from_submission(submission: &ResponseSubmission) -> Self {
        Self {
            user_ip: submission.remote_addr().unwrap_or_default().to_string(),
            user_agent: submission.request.user_agent.clone(),
            referrer: submission.request.referrer.clone(),
            permalink: submission.entry.permalink.clone(),
            comment_type: submission.kind.as_str().to_string(),
            author: submission.submitter.clone(),
            author_email: submission.submitter_item1.clone(),
            author_url: submission.submitter_item2.clone(),
            content: submission.content.clone(),
        }
    }

    fn from_response(response: &Response, permalink: &str) -> Self {
        Self {
            user_ip: response.ip.clone(),
            user_agent: None,
            referrer: None,
            permalink: permalink.to_string(),
            comment_type: response.kind.as_str().to_string(),
            author: response.submitter.clone(),
            author_email: response.submitter_item1.clone(),
            author_url: response.submitter_item2.clone(),
            content: response.content.clone(),
        }
    }

    fn form(&self, api_key: &str, blog_url: &str) -> HashMap<&'static str, String> {
        let mut form = HashMap::from([
            ("api_key", api_key.to_string()),
            ("blog", blog_url.to_string()),
            ("user_ip", self.user_ip.clone()),
            ("permalink", self.permalink.clone()),
            ("comment_type", self.comment_type.clone()),
            ("comment_author", self.author.clone()),
            ("comment_author_email", self.author_email.clone()),
            ("comment_author_url", self.author_url.clone()),
            ("comment_content", self.content.clone()),
        ]);

        if let Some(user_agent) = &self.user_agent {
            form.insert("user_agent", user_agent.clone());
        }
        if let Some(referrer) = &self.referrer {
            form.insert("referrer", referrer.clone());
        }

        form
    }
}

/// HTTP client for the Akismet REST API.
///
/// All calls are synchronous form POSTs; `comment_check` returns the
/// classification, the submit calls are fire-and-forget corrections.
#[derive(Debug, Clone)]
pub struct AkismetClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AkismetClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a specific endpoint base URL.
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self::with_endpoint_and_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout, bounding how
    /// long a classification call can block the submitting request.
    pub fn with_endpoint_and_timeout(endpoint: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn post(
        &self,
        operation: &str,
        api_key: &str,
        blog_url: &str,
        classification: &Classification,
    ) -> Result<String, ModerationError> {
        let url = format!("{}/1.1/{}", self.endpoint, operation);
        let response = self
            .http
            .post(&url)
            .form(&classification.form(api_key, blog_url))
            .send()
            .await
            .map_err(|e| ModerationError::ClassificationFailed {
                operation: operation.to_string(),
                details: e.to_string(),
            })?;

        response
            .text()
            .await
            .map_err(|e| ModerationError::ClassificationFailed {
                operation: operation.to_string(),
                details: e.to_string(),
            })
    }

    /// Classify a response. Returns `true` when the service considers it
    /// spam.
    pub async fn comment_check(
        &self,
        api_key: &str,
        blog_url: &str,
        classification: &Classification,
    ) -> Result<bool, ModerationError> {
        let body = self
            .post("comment-check", api_key, blog_url, classification)
            .await?;

        match body.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            "invalid" => Err(ModerationError::ApiKeyRejected),
            other => Err(ModerationError::ClassificationResponseInvalid {
                body: other.to_string(),
            }),
        }
    }

    /// Report a response the service missed as spam.
    pub async fn submit_spam(
        &self,
        api_key: &str,
        blog_url: &str,
        classification: &Classification,
    ) -> Result<(), ModerationError> {
        self.post("submit-spam", api_key, blog_url, classification)
            .await
            .map(|_| ())
    }

    /// Check an API key against the service. Returns `true` for a valid
    /// key.
    pub async fn verify_key(
        &self,
        api_key: &str,
        blog_url: &str,
    ) -> Result<bool, ModerationError> {
        let url = format!("{}/1.1/verify-key", self.endpoint);
        let form = HashMap::from([("key", api_key.to_string()), ("blog", blog_url.to_string())]);

        let body = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ModerationError::ClassificationFailed {
                operation: "verify-key".to_string(),
                details: e.to_string(),
            })?
            .text()
            .await
            .map_err(|e| ModerationError::ClassificationFailed {
                operation: "verify-key".to_string(),
                details: e.to_string(),
            })?;

        Ok(body.trim() == "valid")
    }

    /// Report a response the service wrongly classified as spam.
    pub async fn submit_ham(
        &self,
        api_key: &str,
        blog_url: &str,
        classification: &Classification,
    ) -> Result<(), ModerationError> {
        self.post("submit-ham", api_key, blog_url, classification)
            .await
            .map(|_| ())
    }
}

impl Default for AkismetClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener delegating spam classification to the Akismet service.
///
/// Configuration properties:
///
/// * `akismet-plugin-api-key` - per-blog API key; blank means the
///   listener abstains entirely
/// * `akismet-plugin-delete-spam` - destroy instead of queueing
/// * `akismet-plugin-automatic-approval` - explicitly approve responses
///   the service classifies as ham, unless an earlier listener already
///   objected
pub struct AkismetListener {
    client: AkismetClient,
}

impl AkismetListener {
    pub fn new() -> Self {
        Self {
            client: AkismetClient::new(),
        }
    }

    pub fn with_client(client: AkismetClient) -> Self {
        Self { client }
    }

    fn api_key(blog: &Blog) -> Option<String> {
        let key = blog.property(AKISMET_API_KEY).map(str::to_string);
        if key.is_none() {
            info!(
                "No Akismet API key provided for blog property: {}",
                AKISMET_API_KEY
            );
        }
        key
    }
}

impl Default for AkismetListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for AkismetListener {
    fn id(&self) -> &str {
        "akismet"
    }

    async fn process_event(&self, submission: &mut ResponseSubmission) -> anyhow::Result<()> {
        let Some(api_key) = Self::api_key(&submission.blog) else {
            return Ok(());
        };

        let classification = Classification::from_submission(submission);
        let is_spam = self
            .client
            .comment_check(&api_key, &submission.blog.url, &classification)
            .await?;

        if is_spam {
            debug!(kind = %submission.kind, "Akismet classified response as spam");
            let delete = submission.blog.bool_property(AKISMET_DELETE_SPAM);
            submission.verdict.record(self.id(), spam_decision(delete));
        } else if submission.blog.bool_property(AKISMET_AUTOMATIC_APPROVAL)
            && submission.verdict.is_abstained()
        {
            debug!(kind = %submission.kind, "Akismet automatic approval");
            submission
                .verdict
                .record(self.id(), crate::event::Decision::Approve);
        }

        Ok(())
    }

    async fn handle_event(&self, event: &Event) -> anyhow::Result<()> {
        match event {
            Event::ResponseMarkedSpam {
                blog,
                response,
                entry,
            } => {
                let Some(api_key) = Self::api_key(blog) else {
                    return Ok(());
                };

                let classification = Classification::from_response(response, &entry.permalink);
                if let Err(e) = self
                    .client
                    .submit_spam(&api_key, &blog.url, &classification)
                    .await
                {
                    warn!(error = ?e, response = %response.id, "Failed to report spam to Akismet");
                }
            }
            Event::ResponseUnmarkedSpam {
                blog,
                response,
                entry,
            } => {
                let Some(api_key) = Self::api_key(blog) else {
                    return Ok(());
                };

                let classification = Classification::from_response(response, &entry.permalink);
                if let Err(e) = self
                    .client
                    .submit_ham(&api_key, &blog.url, &classification)
                    .await
                {
                    warn!(error = ?e, response = %response.id, "Failed to report ham to Akismet");
                }
            }
            Event::ResponseAdded { .. } => {}
        }

        Ok(())
    }
}
