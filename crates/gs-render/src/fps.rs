use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// # Example
/// ```
/// use gs_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(60);
/// counter.tick();
/// assert!(counter.fps().abs() < f64::EPSILON);
/// ```
pub struct FpsCounter {
    timestamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
    frame_time: Duration,
}

impl FpsCounter {
    /// Create a counter averaging over the last `window` frames (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time: Duration::ZERO,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a frame finished at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(&last) = self.timestamps.back() {
            self.frame_time = now.saturating_duration_since(last);
        }
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front() {
            let secs = now.saturating_duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Durée de la dernière frame.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_ticks_give_steady_fps() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(10);
        for i in 0..30u32 {
            counter.tick_at(start + Duration::from_millis(20) * i);
        }
        assert!((counter.fps() - 50.0).abs() < 0.5, "{}", counter.fps());
        assert_eq!(counter.frame_time(), Duration::from_millis(20));
    }

    #[test]
    fn window_forgets_old_frames() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(3);
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_secs(1));
        for i in 1..=4u32 {
            counter.tick_at(start + Duration::from_secs(1) + Duration::from_millis(100) * i);
        }
        assert!((counter.fps() - 10.0).abs() < 0.01, "{}", counter.fps());
    }
}
