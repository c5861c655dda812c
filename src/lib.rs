//! # moderato
//!
//! moderato is the event broadcasting and response moderation pipeline of a
//! blog publishing service. It decides what happens to reader-submitted
//! comments, trackbacks, and pingbacks: publish immediately, queue for
//! human moderation, or destroy outright.
//!
//! ## Architecture Overview
//!
//! The pipeline is built around a small number of components:
//!
//! ### Events
//! - **Submission events** are pre-commit and carry veto power. One
//!   mutable event instance is passed through every listener in
//!   registration order.
//! - **Added events** are post-commit and terminal; listeners react to
//!   them purely for side effects such as notification email.
//! - **Marked/unmarked spam events** record human moderation queue
//!   corrections and feed external classifier training.
//!
//! ### Broadcaster and listeners
//! - The [`event::EventBroadcaster`] is an explicitly constructed,
//!   dependency-injected listener registry with two dispatch primitives:
//!   sequential-veto `process_event` and fire-and-forget
//!   `broadcast_event`. A failing listener is logged and skipped; the
//!   chain always runs to completion.
//! - Moderation listeners (spam phrase, IP address, link count, open
//!   proxy, Akismet) contribute typed decisions to a shared
//!   [`event::ModerationVerdict`] with fixed merge precedence: destroy
//!   wins over hold wins over approve wins over abstain.
//!
//! ### Orchestration
//! - The [`processor::ResponseProcessor`] is the caller side of the
//!   protocol: throttle, dispatch, inspect the verdict, persist through
//!   the [`storage::Fetcher`] seam, broadcast the added event.
//!
//! ## Configuration
//!
//! Per-blog moderation settings live on the blog's property map, with
//! recognized keys such as `ip-blacklist`, `spam-phrase-blacklist`,
//! `linkspam-comment-threshold`, and `akismet-plugin-api-key`.
//! Process-level settings such as the SMTP relay and classification
//! endpoint come from environment variables through [`config::Config`].
//!
//! ## Error Handling
//!
//! All error strings use the format: `error-moderato-<domain>-<number> <message>: <details>`
//!
//! ## Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use moderato::event::EventBroadcaster;
//! use moderato::moderation::{IpAddressListener, LinkSpamListener, SpamPhraseListener};
//! use moderato::processor::ResponseProcessor;
//! use moderato::storage::memory::MemoryFetcher;
//! use moderato::throttle::InMemoryResponseThrottler;
//!
//! let broadcaster = Arc::new(
//!     EventBroadcaster::new()
//!         .listener(Arc::new(IpAddressListener::new()))
//!         .listener(Arc::new(SpamPhraseListener::new()))
//!         .listener(Arc::new(LinkSpamListener::new())),
//! );
//!
//! let processor = ResponseProcessor::new(
//!     Arc::new(MemoryFetcher::new()),
//!     broadcaster,
//!     Arc::new(InMemoryResponseThrottler::new()),
//! );
//! ```

/// Configuration management for the moderation pipeline.
///
/// Process-level settings loaded from environment variables: mail
/// transport, classification endpoint, blackhole zone, client timeouts.
pub mod config;

pub(crate) mod constants;

pub(crate) mod errors;

/// Event types, the typed moderation verdict, and the broadcaster.
pub mod event;

/// Moderation listeners: spam phrase, IP address, link spam, open proxy,
/// and Akismet classification.
pub mod moderation;

/// Notification listeners and mail transports for added responses.
pub mod notification;

/// Response submission orchestration and moderation queue actions.
pub mod processor;

/// Storage layer abstractions and the in-memory implementation.
pub mod storage;

/// Rate limiting for inbound submissions per source address.
pub mod throttle;

pub use errors::{
    ConfigError, ModerationError, NotificationError, ProcessorError, StorageError,
};
