//! Response submission throttling.
//!
//! This module provides traits and implementations for throttling inbound
//! response submissions per source IP address, so a single address cannot
//! flood a blog with comments or trackbacks. The throttle gate runs before
//! a submission event is even constructed.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use anyhow::Result;

/// Trait for throttling response submissions.
///
/// Implementations decide whether a submission from `key` (normally the
/// remote IP address) arriving now should be rejected, given the minimum
/// configured interval between accepted submissions.
#[async_trait]
pub trait ResponseThrottler: Send + Sync {
    /// Check if a submission should be throttled.
    ///
    /// # Arguments
    ///
    /// * `key` - Identity of the submitter, normally the remote IP address
    /// * `interval_minutes` - Minimum minutes between accepted submissions
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the submission should be rejected,
    /// `Ok(false)` if it can proceed.
    async fn throttle(&self, key: &str, interval_minutes: i64) -> Result<bool>;
}

/// A no-op implementation of ResponseThrottler that never throttles.
#[derive(Debug, Clone, Default)]
pub struct NoOpResponseThrottler;

impl NoOpResponseThrottler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseThrottler for NoOpResponseThrottler {
    async fn throttle(&self, _key: &str, _interval_minutes: i64) -> Result<bool> {
        Ok(false)
    }
}

/// In-memory interval throttler keyed on the submitter identity.
///
/// The timestamp map is shared across concurrent request tasks and is
/// therefore kept behind a mutex; entries record the time of the last
/// accepted submission per key.
///
/// A submission inside the interval is rejected without refreshing the
/// stored timestamp, so a persistent submitter becomes eligible again
/// `interval` minutes after their last accepted submission.
#[derive(Debug, Default)]
pub struct InMemoryResponseThrottler {
    last_accepted: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryResponseThrottler {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, key: &str, interval_minutes: i64, now: DateTime<Utc>) -> bool {
        if interval_minutes <= 0 {
            return false;
        }

        let mut last_accepted = self.last_accepted.lock();
        match last_accepted.get(key) {
            Some(previous) if now - *previous < Duration::minutes(interval_minutes) => true,
            _ => {
                last_accepted.insert(key.to_string(), now);
                false
            }
        }
    }
}

#[async_trait]
impl ResponseThrottler for InMemoryResponseThrottler {
    async fn throttle(&self, key: &str, interval_minutes: i64) -> Result<bool> {
        Ok(self.check(key, interval_minutes, Utc::now()))
    }
}
