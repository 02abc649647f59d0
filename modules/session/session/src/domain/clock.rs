//! Wall-clock source used for token expiry checks.

use time::OffsetDateTime;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i128;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i128 {
        (OffsetDateTime::now_utc() - OffsetDateTime::UNIX_EPOCH).whole_milliseconds()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i128);

impl FixedClock {
    /// Clock frozen at `secs` seconds since the Unix epoch.
    #[must_use]
    pub fn at_secs(secs: i64) -> Self {
        Self(i128::from(secs) * 1000)
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i128 {
        self.0
    }
}
