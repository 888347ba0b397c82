/// Frame-rate counter over a fixed reporting interval.
///
/// Accumulates frames and wall time from per-frame `dt` values and yields the
/// frame count once per interval. The demos log the result as an
/// `FPS: <n>` line once per second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    interval: f32,
}

impl FpsCounter {
    /// Counter with a one second reporting interval.
    pub fn new() -> Self {
        Self::with_interval(1.0)
    }

    pub fn with_interval(interval: f32) -> Self {
        debug_assert!(interval > 0.0);
        Self {
            frames: 0,
            elapsed: 0.0,
            interval,
        }
    }

    /// Records one frame of `dt` seconds.
    ///
    /// Returns `Some(frames)` once per interval and resets the accumulator.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;

        if self.elapsed >= self.interval {
            let frames = self.frames;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(frames)
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_after_interval() {
        // 0.0125 is exact in binary, so 80 ticks sum to exactly one second.
        let mut fps = FpsCounter::new();
        for _ in 0..79 {
            assert_eq!(fps.tick(0.0125), None);
        }
        assert_eq!(fps.tick(0.0125), Some(80));
    }

    #[test]
    fn resets_after_report() {
        let mut fps = FpsCounter::with_interval(0.5);
        assert_eq!(fps.tick(0.6), Some(1));
        assert_eq!(fps.tick(0.1), None);
        assert_eq!(fps.tick(0.5), Some(2));
    }
}
