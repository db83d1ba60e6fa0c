use std::thread;
use std::time::{Duration, Instant};

/// Tick rate limiter
///
/// `tick()` sleeps for whatever is left of the tick interval since the previous
/// tick. An unpaced clock never sleeps.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Option<Duration>,
    last_tick: Option<Instant>,
}

impl Pacer {
    pub fn new(fps: Option<u32>) -> Self {
        Self {
            interval: fps
                .filter(|&f| f > 0)
                .map(|f| Duration::from_secs_f64(1.0 / f as f64)),
            last_tick: None,
        }
    }

    pub fn unpaced() -> Self {
        Self::new(None)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Time the next tick from now
    pub fn restart(&mut self) {
        self.last_tick = Some(Instant::now());
    }

    /// Wait out the remainder of the current tick; returns the time slept
    pub fn tick(&mut self) -> Duration {
        let Some(interval) = self.interval else {
            return Duration::ZERO;
        };
        let now = Instant::now();
        let slept = match self.last_tick {
            Some(last) => {
                let remaining = interval.saturating_sub(now.duration_since(last));
                if !remaining.is_zero() {
                    thread::sleep(remaining);
                }
                remaining
            }
            None => Duration::ZERO,
        };
        self.last_tick = Some(Instant::now());
        slept
    }
}
