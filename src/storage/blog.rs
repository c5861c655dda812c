use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single blog and its moderation-relevant configuration.
///
/// Moderation listeners read their per-blog configuration through the
/// string-keyed property map rather than typed fields, so that new
/// listeners can be deployed without touching the blog schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Stable identifier for this blog.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Base URL of the blog, used as the site link in spam classification
    /// requests and notification emails.
    pub url: String,

    /// Blog owner display name.
    pub owner: String,

    /// Blog owner email address, the default notification recipient.
    pub owner_email: String,

    /// Whether notification emails are sent for this blog.
    #[serde(default)]
    pub email_enabled: bool,

    /// Whether comments are accepted at all.
    #[serde(default = "default_enabled")]
    pub comments_enabled: bool,

    /// Whether trackbacks are accepted at all.
    #[serde(default = "default_enabled")]
    pub trackbacks_enabled: bool,

    /// Whether pingbacks are accepted at all.
    #[serde(default = "default_enabled")]
    pub pingbacks_enabled: bool,

    /// Free-form per-blog configuration properties.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

impl Blog {
    /// Create a blog with the given identity and no properties.
    pub fn new(id: &str, name: &str, url: &str, owner: &str, owner_email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            owner: owner.to_string(),
            owner_email: owner_email.to_string(),
            email_enabled: false,
            comments_enabled: true,
            trackbacks_enabled: true,
            pingbacks_enabled: true,
            properties: HashMap::new(),
        }
    }

    /// Set a configuration property, returning `self` for chaining.
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a configuration property.
    ///
    /// Blank values are treated the same as absent ones; every consumer of
    /// blog configuration wants "unset" semantics for empty strings.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Look up a boolean property.
    ///
    /// Absent, blank, and unparseable values all return `false`, matching
    /// the permissive default used for delete-vs-queue flags.
    pub fn bool_property(&self, key: &str) -> bool {
        self.property(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Look up an integer property, falling back to `default` when the
    /// property is absent or unparseable.
    pub fn int_property(&self, key: &str, default: i64) -> i64 {
        self.property(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default)
    }
}
