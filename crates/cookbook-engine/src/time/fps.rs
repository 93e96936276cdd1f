/// Averages the frame rate over fixed intervals.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    avg_interval: f32,
    accumulated: f32,
    frames: u32,
}

impl FpsCounter {
    /// Creates a counter averaging over `avg_interval` seconds.
    pub fn new(avg_interval: f32) -> Self {
        debug_assert!(avg_interval > 0.0);
        Self {
            avg_interval,
            accumulated: 0.0,
            frames: 0,
        }
    }

    /// Records one rendered frame that took `dt` seconds.
    ///
    /// Returns the new average once an interval completes, `None` otherwise.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        self.accumulated += dt;
        self.frames += 1;

        if self.accumulated < self.avg_interval {
            return None;
        }

        let avg = self.frames as f32 / self.accumulated;
        self.accumulated = 0.0;
        self.frames = 0;
        Some(avg)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_when_interval_completes() {
        let mut fps = FpsCounter::new(0.5);
        // 1/64 s frames sum exactly to the interval on the 32nd frame.
        for _ in 0..31 {
            assert!(fps.tick(1.0 / 64.0).is_none());
        }
        let avg = fps.tick(1.0 / 64.0).expect("interval should complete on the 32nd frame");
        assert_eq!(avg, 64.0);
        // The next interval starts from scratch.
        assert!(fps.tick(1.0 / 64.0).is_none());
    }

    #[test]
    fn single_slow_frame_completes_interval() {
        let mut fps = FpsCounter::new(0.5);
        assert_eq!(fps.tick(1.0), Some(1.0));
    }
}
