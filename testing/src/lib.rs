//! # Concierge Testing
//!
//! Testing utilities and helpers for the Concierge architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A fluent Given-When-Then API for testing reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use concierge_testing::test_clock;
//! use concierge_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let env = test_environment();
//!     let store = Store::new(ReservationsState::default(), ReservationsReducer, env);
//!
//!     store.send(ReservationsAction::Fetch).await;
//!
//!     let state = store.state(|s| s.clone()).await;
//!     assert!(state.loading);
//! }
//! ```

use chrono::{DateTime, Utc};
use concierge_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use concierge_testing::mocks::FixedClock;
    /// use concierge_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for store-level (integration) tests.
pub mod store {
    use concierge_core::reducer::Reducer;
    use concierge_runtime::Store;
    use std::time::Duration;

    /// Poll store state until the predicate holds or the timeout expires.
    ///
    /// Effect feedback actions are broadcast before they are reduced, so a
    /// test that observed a terminal action may still be a beat ahead of the
    /// state change it implies. Returns `true` once the predicate holds.
    pub async fn eventually<S, A, E, R, P>(
        store: &Store<S, A, E, R>,
        timeout: Duration,
        predicate: P,
    ) -> bool
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
        P: Fn(&S) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if store.state(|s| predicate(s)).await {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use store::eventually;
