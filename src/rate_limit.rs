//! Sliding-window rate limiting for NCBI API compliance
//!
//! NCBI E-utilities rate limits:
//! - 3 requests per second without API key
//! - 10 requests per second with API key
//! - Violations can result in IP blocking
//!
//! Unlike a token bucket, the sliding window never allows a burst above the
//! limit inside any trailing one-second interval.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

/// Guard added to every computed wait so a woken caller does not land exactly on
/// the window boundary and re-enter the full window.
const BOUNDARY_GUARD: Duration = Duration::from_millis(1);

/// Strict sliding-window rate limiter
///
/// Cloning the limiter shares the underlying window, so every clone draws from
/// the same budget. Construct one instance per process and hand clones to every
/// component that issues outbound calls.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    window: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window_length: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter allowing `max_requests` per second
    ///
    /// A limit of zero is raised to one.
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_gateway::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(3);
    /// assert_eq!(limiter.max_requests(), 3);
    /// ```
    pub fn new(max_requests: usize) -> Self {
        Self::with_window(max_requests, Duration::from_secs(1))
    }

    /// Create a rate limiter with a custom window length
    pub fn with_window(max_requests: usize, window_length: Duration) -> Self {
        let max_requests = max_requests.max(1);
        Self {
            window: Arc::new(Mutex::new(VecDeque::with_capacity(max_requests))),
            max_requests,
            window_length,
        }
    }

    /// Create rate limiter for NCBI API without API key (3 requests/second)
    pub fn ncbi_default() -> Self {
        Self::new(3)
    }

    /// Create rate limiter for NCBI API with API key (10 requests/second)
    pub fn ncbi_with_key() -> Self {
        Self::new(10)
    }

    /// Wait until a call is allowed, record it, and return the recorded instant
    ///
    /// Every attempt re-evaluates the window from scratch: another caller may
    /// have taken the slot freed while this one was sleeping.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::RateLimiter;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let limiter = RateLimiter::ncbi_default();
    ///
    ///     limiter.acquire().await;
    ///     // Make API call here
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Instant {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                self.evict_expired(&mut window, now);

                if window.len() < self.max_requests {
                    window.push_back(now);
                    debug!(in_window = window.len(), "Rate limit slot acquired");
                    return now;
                }

                // Window is full, so it holds at least one entry
                let oldest = window[0];
                (oldest + self.window_length).saturating_duration_since(now) + BOUNDARY_GUARD
            };

            debug!(wait_ms = wait.as_millis(), "Rate limit reached, sleeping");
            sleep(wait).await;
        }
    }

    /// Check if a call would be allowed right now without recording it
    pub async fn check_available(&self) -> bool {
        let mut window = self.window.lock().await;
        self.evict_expired(&mut window, Instant::now());
        window.len() < self.max_requests
    }

    /// Number of calls recorded in the current window
    pub async fn in_flight(&self) -> usize {
        let mut window = self.window.lock().await;
        self.evict_expired(&mut window, Instant::now());
        window.len()
    }

    /// Maximum number of calls per window
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Length of the rolling window
    pub fn window_length(&self) -> Duration {
        self.window_length
    }

    fn evict_expired(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&front) = window.front() {
            if now.saturating_duration_since(front) >= self.window_length {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}
