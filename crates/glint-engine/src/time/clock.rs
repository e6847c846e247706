use std::time::{Duration, Instant};

/// Frame-rate governor for a blocking main loop.
///
/// `tick` sleeps off whatever remains of the frame budget, so a loop that
/// calls it once per frame runs at (approximately) the target rate. One clock
/// per loop; the delta baseline is not shareable.
#[derive(Debug, Clone)]
pub struct Clock {
    last: Instant,
    fps: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            fps: 0.0,
        }
    }

    /// Advances the clock, sleeping to hold the target frame rate.
    ///
    /// `target_fps == 0` disables the cap. Returns the elapsed time since the
    /// previous tick in milliseconds, after any sleep.
    pub fn tick(&mut self, target_fps: u32) -> f32 {
        let now = Instant::now();
        let mut elapsed = now.saturating_duration_since(self.last);

        if target_fps > 0 {
            let budget = Duration::from_secs_f64(1.0 / target_fps as f64);
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
                elapsed = Instant::now().saturating_duration_since(self.last);
            }
        }

        self.last = Instant::now();

        let dt = elapsed.as_secs_f32();
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            // Light smoothing so displayed figures do not jitter.
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps * 0.9 + instant_fps * 0.1
            };
        }

        dt * 1000.0
    }

    /// Smoothed frames-per-second figure from recent ticks.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_tick_reports_elapsed_time() {
        let mut clock = Clock::new();
        std::thread::sleep(Duration::from_millis(5));
        let ms = clock.tick(0);
        assert!(ms >= 5.0);
    }

    #[test]
    fn capped_tick_holds_the_frame_budget() {
        let mut clock = Clock::new();
        clock.tick(0);
        // 200 fps → 5ms budget; an immediate second tick must wait it out.
        let ms = clock.tick(200);
        assert!(ms >= 4.0, "tick returned after {ms}ms");
    }

    #[test]
    fn fps_is_positive_after_ticks() {
        let mut clock = Clock::new();
        std::thread::sleep(Duration::from_millis(2));
        clock.tick(0);
        assert!(clock.fps() > 0.0);
    }
}
