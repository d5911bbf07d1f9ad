//! # NicheFlow Testing
//!
//! Testing utilities and helpers for the NicheFlow client architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A fluent Given-When-Then builder for reducer tests
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use nicheflow_testing::{ReducerTest, test_clock};
//!
//! #[test]
//! fn locale_command_schedules_persistence() {
//!     ReducerTest::new(PreferencesReducer::new())
//!         .with_env(test_environment())
//!         .given_state(PreferencesState::default())
//!         .when_action(PreferencesAction::SetLocale {
//!             correlation_id,
//!             locale: "fr".to_string(),
//!         })
//!         .then_state(|state| {
//!             assert_eq!(state.preferences.language, "fr");
//!         })
//!         .then_effects(|effects| {
//!             assertions::assert_has_future_effect(effects);
//!         })
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use nicheflow_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use nicheflow_testing::mocks::FixedClock;
    /// use nicheflow_core::environment::Clock;
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities.
pub mod helpers {
    /// Initialize tracing output for a test binary
    ///
    /// Reads `RUST_LOG` when set, defaults to `info` otherwise. Safe to call
    /// from every test; only the first call installs the subscriber.
    pub fn init_test_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
