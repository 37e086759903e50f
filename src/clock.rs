use web_time::{Instant, SystemTime};

/// Time source for the render loop.
pub trait Clock {
    /// Monotonic milliseconds from an arbitrary origin.
    fn now_ms(&self) -> f64;
    /// Milliseconds since the Unix epoch, for display only.
    fn wall_clock_ms(&self) -> f64;
}

/// `performance.now()`/`Date.now()` in the browser, std time on the host.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wall_clock_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}
