/// Time source for record ids and `dateAdded` stamps
use std::cell::Cell;

use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::error::TabManError;

/// Anything that can tell the current time.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock. On wasm32 this reads `Date.now()` through the `time` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<OffsetDateTime>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime, step: Duration) -> Self {
        ManualClock {
            current: Cell::new(start),
            step,
        }
    }

    /// A clock that never moves.
    pub fn frozen(at: OffsetDateTime) -> Self {
        Self::new(at, Duration::ZERO)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}

/// Milliseconds since the Unix epoch, the same value `Date.now()` yields.
pub fn epoch_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ` (UTC, millisecond precision).
pub fn iso_timestamp(at: OffsetDateTime) -> Result<String, TabManError> {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    Ok(at.to_offset(UtcOffset::UTC).format(&format)?)
}
