//! Time source

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;

/// Supplies "now" in the kiosk timezone
pub trait Clock: Send + Sync {
    fn now(&self, tz: Tz) -> DateTime<Tz>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(&tz)
    }
}

/// Manually driven clock for tests
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new<T: chrono::TimeZone>(at: DateTime<T>) -> Self {
        Self {
            at: Mutex::new(at.with_timezone(&Utc)),
        }
    }

    pub fn set<T: chrono::TimeZone>(&self, at: DateTime<T>) {
        *self.at.lock() = at.with_timezone(&Utc);
    }

    pub fn advance(&self, by: Duration) {
        *self.at.lock() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        self.at.lock().with_timezone(&tz)
    }
}
