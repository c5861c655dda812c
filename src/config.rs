use crate::errors::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

/// HTTP client timeout configuration.
///
/// Specifies the default timeout duration for outbound HTTP requests made
/// by the pipeline, such as spam classification calls.
#[derive(Clone, Debug)]
pub struct HttpClientTimeout(std::time::Duration);

impl Default for HttpClientTimeout {
    fn default() -> Self {
        Self(std::time::Duration::from_millis(10_000))
    }
}

impl TryFrom<String> for HttpClientTimeout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        let millis = value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout {
                value: value.clone(),
            })?;

        if millis == 0 {
            return Err(ConfigError::InvalidTimeout { value });
        }

        Ok(Self(std::time::Duration::from_millis(millis)))
    }
}

impl HttpClientTimeout {
    pub fn to_duration(&self) -> std::time::Duration {
        self.0
    }
}

/// DNS blackhole list zone configuration.
///
/// The zone queried by the open proxy listener. Reversed submitter
/// addresses are resolved beneath this zone.
#[derive(Clone, Debug)]
pub struct DnsblZone(String);

impl Default for DnsblZone {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_DNSBL_ZONE.to_string())
    }
}

impl TryFrom<String> for DnsblZone {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        let zone = value.trim().trim_matches('.').to_string();
        if zone.is_empty() || zone.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidDnsblZone { zone: value });
        }

        Ok(Self(zone))
    }
}

impl AsRef<str> for DnsblZone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Spam classification endpoint configuration.
///
/// Base URL of the Akismet-compatible classification service. Overridable
/// so deployments can point at a proxy or a test double.
#[derive(Clone, Debug)]
pub struct ClassificationEndpoint(String);

impl Default for ClassificationEndpoint {
    fn default() -> Self {
        Self("https://rest.akismet.com".to_string())
    }
}

impl TryFrom<String> for ClassificationEndpoint {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint { url: value });
        }

        Ok(Self(value.trim_end_matches('/').to_string()))
    }
}

impl AsRef<str> for ClassificationEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// SMTP transport configuration for notification email delivery.
#[derive(Clone, Debug)]
pub struct MailTransportConfig {
    /// SMTP relay hostname.
    pub host: String,
    /// Optional SMTP username; credentials require both username and
    /// password.
    pub username: Option<String>,
    /// Optional SMTP password.
    pub password: Option<String>,
    /// Display name on the from header.
    pub from_name: String,
    /// Address on the from header.
    pub from_address: String,
}

impl MailTransportConfig {
    fn from_env() -> Result<Option<Self>> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };

        if host.trim().is_empty() {
            return Ok(None);
        }

        let username = std::env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty());
        let password = std::env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty());

        if username.is_some() != password.is_some() {
            return Err(ConfigError::InvalidMailTransport {
                details: "SMTP_USERNAME and SMTP_PASSWORD must be set together".to_string(),
            });
        }

        let from_address =
            std::env::var("MAIL_FROM").map_err(|_| ConfigError::EnvVarRequired {
                var_name: "MAIL_FROM".to_string(),
            })?;
        let from_name = std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "moderato".to_string());

        Ok(Some(Self {
            host,
            username,
            password,
            from_name,
            from_address,
        }))
    }
}

/// Process-level configuration, loaded from environment variables.
///
/// Per-blog moderation settings do not live here; they come from the
/// blog's own property map. This configuration covers the shared
/// infrastructure: mail transport, classification endpoint, blackhole
/// zone, and client timeouts.
///
/// Recognized variables:
///
/// - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `MAIL_FROM`,
///   `MAIL_FROM_NAME`: notification transport; absent `SMTP_HOST`
///   disables mail entirely
/// - `DNSBL_ZONE`: open proxy blackhole zone
/// - `CLASSIFICATION_ENDPOINT`: Akismet-compatible base URL
/// - `HTTP_CLIENT_TIMEOUT_MS`: outbound HTTP timeout
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub mail: Option<MailTransportConfig>,
    pub dnsbl_zone: DnsblZone,
    pub classification_endpoint: ClassificationEndpoint,
    pub http_client_timeout: HttpClientTimeout,
}

impl Config {
    /// Load configuration from the environment.
    pub fn new() -> Result<Self> {
        let mail = MailTransportConfig::from_env()?;

        let dnsbl_zone = match std::env::var("DNSBL_ZONE") {
            Ok(value) => DnsblZone::try_from(value)?,
            Err(_) => DnsblZone::default(),
        };

        let classification_endpoint = match std::env::var("CLASSIFICATION_ENDPOINT") {
            Ok(value) => ClassificationEndpoint::try_from(value)?,
            Err(_) => ClassificationEndpoint::default(),
        };

        let http_client_timeout = match std::env::var("HTTP_CLIENT_TIMEOUT_MS") {
            Ok(value) => HttpClientTimeout::try_from(value)?,
            Err(_) => HttpClientTimeout::default(),
        };

        Ok(Self {
            mail,
            dnsbl_zone,
            classification_endpoint,
            http_client_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_parsing() {
        assert!(HttpClientTimeout::try_from("5000".to_string()).is_ok());
        assert!(HttpClientTimeout::try_from("0".to_string()).is_err());
        assert!(HttpClientTimeout::try_from("soon".to_string()).is_err());

        let timeout = HttpClientTimeout::try_from("2500".to_string()).unwrap();
        assert_eq!(timeout.to_duration().as_millis(), 2500);
    }

    #[test]
    fn test_dnsbl_zone_validation() {
        let zone = DnsblZone::try_from("bl.example.org.".to_string()).unwrap();
        assert_eq!(zone.as_ref(), "bl.example.org");

        assert!(DnsblZone::try_from("  ".to_string()).is_err());
        assert!(DnsblZone::try_from("has spaces.org".to_string()).is_err());
        assert_eq!(DnsblZone::default().as_ref(), "list.dsbl.org");
    }

    #[test]
    fn test_classification_endpoint_validation() {
        let endpoint =
            ClassificationEndpoint::try_from("http://localhost:8080/".to_string()).unwrap();
        assert_eq!(endpoint.as_ref(), "http://localhost:8080");

        assert!(ClassificationEndpoint::try_from("ftp://example.com".to_string()).is_err());
        assert_eq!(
            ClassificationEndpoint::default().as_ref(),
            "https://rest.akismet.com"
        );
    }
}
