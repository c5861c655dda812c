//! Blog property keys and defaults recognized by the moderation pipeline

/// Spam phrase moderation properties
pub(crate) const SPAM_PHRASE_BLACKLIST: &str = "spam-phrase-blacklist";
pub(crate) const DELETE_PHRASE_SPAM: &str = "delete-phrasespam";

/// IP address moderation properties
pub(crate) const IP_BLACKLIST: &str = "ip-blacklist";
pub(crate) const IP_WHITELIST: &str = "ip-whitelist";
pub(crate) const DELETE_IP_SPAM: &str = "delete-ipspam";

/// Link spam moderation properties
pub(crate) const LINKSPAM_COMMENT_THRESHOLD: &str = "linkspam-comment-threshold";
pub(crate) const LINKSPAM_TRACKBACK_THRESHOLD: &str = "linkspam-trackback-threshold";
pub(crate) const DELETE_LINK_SPAM: &str = "delete-linkspam";
pub(crate) const DEFAULT_LINK_THRESHOLD: u32 = 3;

/// Open proxy moderation properties
pub(crate) const DELETE_OPEN_PROXY_SPAM: &str = "delete-openproxy-spam";
pub(crate) const DEFAULT_DNSBL_ZONE: &str = "list.dsbl.org";

/// Akismet moderation properties
pub(crate) const AKISMET_API_KEY: &str = "akismet-plugin-api-key";
pub(crate) const AKISMET_DELETE_SPAM: &str = "akismet-plugin-delete-spam";
pub(crate) const AKISMET_AUTOMATIC_APPROVAL: &str = "akismet-plugin-automatic-approval";

/// Submission throttling properties (minutes between responses per IP)
pub(crate) const COMMENT_THROTTLE_MINUTES: &str = "plugin-comment-throttle";
pub(crate) const TRACKBACK_THROTTLE_MINUTES: &str = "plugin-trackback-throttle";
pub(crate) const DEFAULT_THROTTLE_MINUTES: i64 = 5;

/// Comment auto-expiration property (days after entry publication)
pub(crate) const COMMENT_DAYS_EXPIRATION: &str = "comment-days-expiration";

/// Notification email properties
pub(crate) const COMMENT_EMAIL_PREFIX: &str = "plugin-comment-email-prefix";
pub(crate) const TRACKBACK_EMAIL_PREFIX: &str = "plugin-trackback-email-prefix";
pub(crate) const DEFAULT_COMMENT_EMAIL_PREFIX: &str = "[comment] ";
pub(crate) const DEFAULT_TRACKBACK_EMAIL_PREFIX: &str = "[trackback] ";
