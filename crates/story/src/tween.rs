use std::time::{Duration, Instant};

use gpui::{Pixels, Point, point, px};

/// Eased interpolation between two translations, retargeted whenever the
/// engine publishes a new transform.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: Point<Pixels>,
    to: Point<Pixels>,
    start: Instant,
    duration: Duration,
}

impl Tween {
    pub fn at(position: Point<Pixels>, now: Instant) -> Self {
        Self {
            from: position,
            to: position,
            start: now,
            duration: Duration::ZERO,
        }
    }

    pub fn target(&self) -> Point<Pixels> {
        self.to
    }

    /// Current value and whether the tween has reached its target.
    pub fn value(&self, now: Instant) -> (Point<Pixels>, bool) {
        if self.from == self.to || self.duration.is_zero() {
            return (self.to, true);
        }

        let t = now.saturating_duration_since(self.start).as_secs_f32()
            / self.duration.as_secs_f32();
        if t >= 1.0 {
            return (self.to, true);
        }

        let t = t.clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        let lerp = |from: Pixels, to: Pixels| {
            px(f32::from(from) + (f32::from(to) - f32::from(from)) * eased)
        };
        (
            point(lerp(self.from.x, self.to.x), lerp(self.from.y, self.to.y)),
            false,
        )
    }

    /// Heads towards `to`, animated over `duration` or jumping when `None`.
    pub fn retarget(&mut self, to: Point<Pixels>, duration: Option<Duration>, now: Instant) {
        if self.to == to {
            return;
        }
        let (current, _) = self.value(now);
        self.from = if duration.is_some() { current } else { to };
        self.to = to;
        self.start = now;
        self.duration = duration.unwrap_or_default();
    }
}
