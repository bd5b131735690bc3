use crate::model::Point;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 2.0;

/// Add `delta` to `scale`, keeping the result in `[MIN_SCALE, MAX_SCALE]`.
pub fn apply_zoom(scale: f32, delta: f32) -> f32 {
    (scale + delta).clamp(MIN_SCALE, MAX_SCALE)
}

/// Pan and zoom applied by the presentation layer when drawing. The
/// engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub translation: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Point::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn zoom_by(&mut self, delta: f32) {
        self.scale = apply_zoom(self.scale, delta);
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.translation += delta;
    }

    /// The same transform with `scale` forced into `[MIN_SCALE, MAX_SCALE]`.
    /// Non-finite values fall back to the identity.
    pub fn clamped(self) -> Self {
        let scale = if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        };
        let translation = if self.translation.x.is_finite()
            && self.translation.y.is_finite()
        {
            self.translation
        } else {
            Point::ZERO
        };
        Self { scale, translation }
    }

    /// Canvas coordinates to screen coordinates.
    pub fn apply(&self, p: Point) -> Point {
        p * self.scale + self.translation
    }

    /// Screen coordinates back to canvas coordinates.
    pub fn invert(&self, p: Point) -> Point {
        (p - self.translation) * (1.0 / self.scale)
    }
}
