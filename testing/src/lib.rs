//! # Todo-me Testing
//!
//! Test helpers shared by the workspace:
//!
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`FixedClock`]: deterministic [`Clock`] implementation
//!
//! ```
//! use todome_testing::test_clock;
//! use todome_core::environment::Clock;
//!
//! let clock = test_clock();
//! assert_eq!(clock.now(), clock.now());
//! ```

use chrono::{DateTime, Utc};
use todome_core::environment::Clock;

pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::TimeZone;

    /// Fixed clock for deterministic tests
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Clock fixed at midnight UTC on the given calendar day.
        ///
        /// Out-of-range dates fall back to the Unix epoch.
        #[must_use]
        pub fn on(year: i32, month: u32, day: u32) -> Self {
            let time = Utc
                .with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::UNIX_EPOCH);
            Self::new(time)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::on(2025, 1, 1)
    }
}

pub use mocks::{test_clock, FixedClock};
