//! Delay policy between feed pages.

use std::time::Duration;

use rand::Rng;

/// Decides how long to wait before fetching a page.
pub trait DelayPolicy: Send + Sync {
    /// Delay before the next fetch. `first_page` is true for the first fetch of
    /// a collection.
    fn delay(&self, first_page: bool) -> Duration;
}

impl<F> DelayPolicy for F
where
    F: Fn(bool) -> Duration + Send + Sync,
{
    fn delay(&self, first_page: bool) -> Duration {
        self(first_page)
    }
}

/// Random delay within `[min, max]` before every page except the first.
#[derive(Debug, Clone, Copy)]
pub struct JitteredDelay {
    min: Duration,
    max: Duration,
}

impl JitteredDelay {
    /// Build a policy; bounds given in the wrong order are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }
}

impl Default for JitteredDelay {
    fn default() -> Self {
        Self::from_millis(3000, 5000)
    }
}

impl DelayPolicy for JitteredDelay {
    fn delay(&self, first_page: bool) -> Duration {
        if first_page {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(ms as u64)
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn delay(&self, _first_page: bool) -> Duration {
        Duration::ZERO
    }
}
