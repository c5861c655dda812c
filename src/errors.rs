use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error-moderato-config-1 Required environment variable not set: {var_name}")]
    EnvVarRequired { var_name: String },

    #[error("error-moderato-config-2 Invalid timeout value: {value}")]
    InvalidTimeout { value: String },

    #[error("error-moderato-config-3 Invalid mail transport configuration: {details}")]
    InvalidMailTransport { details: String },

    #[error("error-moderato-config-4 Invalid DNS blackhole zone: {zone}")]
    InvalidDnsblZone { zone: String },

    #[error("error-moderato-config-5 Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("error-moderato-moderation-1 Pattern compilation failed: {pattern}: {details}")]
    PatternCompilationFailed { pattern: String, details: String },

    #[error("error-moderato-moderation-2 Spam classification request failed: {operation}: {details}")]
    ClassificationFailed { operation: String, details: String },

    #[error("error-moderato-moderation-3 Spam classification response invalid: {body}")]
    ClassificationResponseInvalid { body: String },

    #[error("error-moderato-moderation-4 API key rejected by classification service")]
    ApiKeyRejected,
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("error-moderato-notification-1 Template rendering failed: {template}: {source}")]
    TemplateRenderFailed {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("error-moderato-notification-2 Message construction failed: {details}")]
    MessageBuildFailed { details: String },

    #[error("error-moderato-notification-3 Mail transport failed: {details}")]
    TransportFailed { details: String },
}

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("error-moderato-processor-1 Response persistence failed: {source}")]
    PersistenceFailed {
        #[source]
        source: StorageError,
    },

    #[error("error-moderato-processor-2 Entry lookup failed: {entry_id}: {source}")]
    EntryLookupFailed {
        entry_id: String,
        #[source]
        source: StorageError,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("error-moderato-storage-1 Entry not found: {entry_id}")]
    EntryNotFound { entry_id: String },

    #[error("error-moderato-storage-2 Response not found: {response_id}")]
    ResponseNotFound { response_id: String },

    #[error("error-moderato-storage-3 Invalid input data: {details}")]
    InvalidInput { details: String },
}
