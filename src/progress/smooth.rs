use std::time::{Duration, Instant};

/// Default animation length of one smooth scroll.
pub const DEFAULT_SMOOTH_DURATION: Duration = Duration::from_millis(1200);

/// Exponential ease-out used for wheel-driven scrolling.
pub fn smooth_ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    start: Instant,
}

/// Time-based scroll animator.
///
/// Each [`scroll_to`](Self::scroll_to) starts a new tween from the current position. The ease
/// starts at `0.001` rather than zero, so a new tween moves 0.1% of the distance at once.
/// Positions are clamped to `[0, limit]`.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    duration: Duration,
    limit: f64,
    position: f64,
    target: f64,
    tween: Option<Tween>,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTH_DURATION)
    }
}

impl SmoothScroll {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            limit: f64::INFINITY,
            position: 0.0,
            target: 0.0,
            tween: None,
        }
    }

    /// Upper scroll bound (document height minus viewport height).
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.set_limit(limit);
        self
    }

    pub fn set_limit(&mut self, limit: f64) {
        self.limit = if limit.is_nan() { 0.0 } else { limit.max(0.0) };
        self.position = self.clamp(self.position);
        self.target = self.clamp(self.target);
    }

    fn clamp(&self, y: f64) -> f64 {
        if y.is_nan() { 0.0 } else { y.clamp(0.0, self.limit) }
    }

    /// Animate towards `target`, starting at `now`.
    pub fn scroll_to(&mut self, target: f64, now: Instant) {
        let target = self.clamp(target);
        if self.duration.is_zero() {
            self.jump_to(target);
            return;
        }
        self.target = target;
        self.tween = Some(Tween {
            from: self.position,
            to: target,
            start: now,
        });
    }

    /// Wheel or touch input: move the target by `delta`.
    pub fn scroll_by(&mut self, delta: f64, now: Instant) {
        self.scroll_to(self.target + delta, now);
    }

    /// Move immediately, cancelling any animation.
    pub fn jump_to(&mut self, target: f64) {
        let target = self.clamp(target);
        self.position = target;
        self.target = target;
        self.tween = None;
    }

    /// Advance the animation to `now` and return the current position.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let Some(tween) = self.tween else {
            return self.position;
        };
        let elapsed = now.saturating_duration_since(tween.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if t >= 1.0 {
            self.position = tween.to;
            self.tween = None;
        } else {
            self.position = tween.from + (tween.to - tween.from) * smooth_ease(t);
        }
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

#[cfg(test)]
#[path = "../../tests/unit/progress/smooth.rs"]
mod tests;
