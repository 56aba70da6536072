//! Millisecond clock used to age measurement cache entries.

use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(all(target_arch = "wasm32", feature = "dom"))]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(all(target_arch = "wasm32", feature = "dom")))]
    fn now_ms(&self) -> f64 {
        match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs_f64() * 1000.0,
            Err(_) => 0.0,
        }
    }
}

/// Clock advanced explicitly by its owner. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self { now: Rc::new(Cell::new(start_ms)) }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
