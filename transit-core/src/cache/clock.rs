//! Time sources for cache freshness.

use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock time as an offset from the Unix epoch.
pub trait Clock {
    /// Current time since the Unix epoch.
    fn now(&self) -> Duration;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        // A clock set before 1970 reads as the epoch; entries then look fresh.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
