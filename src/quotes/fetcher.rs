//! Bounded-retry quote fetching with optional author filtering
//!
//! Without a filter a single attempt is made. With a filter, attempts repeat
//! until an author matches or the attempt budget runs out; the last
//! non-matching quote is kept as a fallback. Attempt failures never reach
//! the caller, only the final string does.

use super::source::{FetchError, QuoteSource, RawQuote};
use crate::config::FetchConfig;
use std::sync::Arc;
use std::time::Duration;

/// Returned when no attempt produced a quote
pub const FALLBACK_QUOTE: &str = "Could not load quote. Try again.";

/// Retry budget and timing for one fetch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub filtered_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            filtered_attempts: 12,
            attempt_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_millis(120),
        }
    }
}

impl From<&FetchConfig> for FetchPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            filtered_attempts: config.filtered_attempts.max(1),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Case-insensitive substring or exact match; an empty author never matches
pub fn author_matches(author: &str, filter: &str) -> bool {
    let author = author.trim().to_lowercase();
    let needle = filter.trim().to_lowercase();
    !author.is_empty() && (author.contains(&needle) || author == needle)
}

#[derive(Clone)]
pub struct QuoteFetcher {
    source: Arc<dyn QuoteSource>,
    policy: FetchPolicy,
}

impl QuoteFetcher {
    pub fn new(source: Arc<dyn QuoteSource>, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch one formatted quote, honoring `author_filter` when non-blank
    pub async fn fetch_quote(&self, author_filter: &str) -> String {
        let filter = author_filter.trim();
        let wants_filter = !filter.is_empty();
        let attempts = if wants_filter { self.policy.filtered_attempts.max(1) } else { 1 };

        let mut last: Option<String> = None;

        for attempt in 1..=attempts {
            let raw = match self.attempt().await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!("Attempt {}/{} failed: {}", attempt, attempts, e);
                    continue;
                }
            };

            let text = raw.formatted();
            if !wants_filter {
                return text;
            }

            if author_matches(raw.author_trimmed(), filter) {
                tracing::debug!("Attempt {}/{} matched author filter '{}'", attempt, attempts, filter);
                return text;
            }

            tracing::trace!("Attempt {}/{}: '{}' does not match", attempt, attempts, raw.author_trimmed());
            last = Some(text);
            tokio::time::sleep(self.policy.retry_delay).await;
        }

        match last {
            Some(text) => {
                if wants_filter {
                    tracing::info!("No author matched '{}' after {} attempts", filter, attempts);
                }
                text
            }
            None => {
                tracing::info!("No quote could be fetched after {} attempt(s)", attempts);
                FALLBACK_QUOTE.to_string()
            }
        }
    }

    /// Fetch the next quote to display, retrying once unfiltered if it
    /// repeats `last_quote`. A second repeat is accepted.
    pub async fn next_quote(&self, author_filter: &str, last_quote: &str) -> String {
        let next = self.fetch_quote(author_filter).await;
        if next != last_quote {
            return next;
        }

        tracing::debug!("Fetched quote repeats the last one, retrying once");
        let retry = self.fetch_quote("").await;
        if retry != last_quote {
            retry
        } else {
            next
        }
    }

    /// One request bounded by the attempt timeout; expiry drops the request
    async fn attempt(&self) -> Result<RawQuote, FetchError> {
        match tokio::time::timeout(self.policy.attempt_timeout, self.source.random_quote()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.policy.attempt_timeout.as_millis() as u64)),
        }
    }
}
