//! Frame timing

/// Milliseconds since an arbitrary, fixed origin
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Milliseconds since page load
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

/// Longest step handed to the systems; a backgrounded tab or a debugger
/// pause otherwise turns into one huge jump
const MAX_DELTA_SECS: f32 = 0.1;

/// Turns frame timestamps into delta and elapsed time
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    last_ms: f64,
    frame: u64,
}

/// Timing of one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, capped
    pub delta: f32,
    /// Seconds since the first frame
    pub elapsed: f32,
    pub frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let start = *self.start_ms.get_or_insert(now_ms);
        let delta = if self.frame == 0 {
            0.0
        } else {
            (((now_ms - self.last_ms) / 1000.0) as f32).clamp(0.0, MAX_DELTA_SECS)
        };
        self.last_ms = now_ms;
        let time = FrameTime {
            delta,
            elapsed: ((now_ms - start) / 1000.0) as f32,
            frame: self.frame,
        };
        self.frame += 1;
        time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick() {
        let mut clock = FrameClock::new();
        let first = clock.tick(1000.0);
        assert_eq!(first.delta, 0.0);
        assert_eq!(first.elapsed, 0.0);
        assert_eq!(first.frame, 0);

        let second = clock.tick(1016.0);
        assert!((second.delta - 0.016).abs() < 1e-6);
        assert!((second.elapsed - 0.016).abs() < 1e-6);
        assert_eq!(second.frame, 1);

        let stalled = clock.tick(6016.0);
        assert_eq!(stalled.delta, MAX_DELTA_SECS);
        assert!((stalled.elapsed - 5.016).abs() < 1e-4);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn test_now_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
