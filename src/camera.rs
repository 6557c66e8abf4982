//! Horizontal scrolling camera.

use crate::geometry::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World x of the viewport's left edge.
    offset: f32,
    level_width: f32,
    viewport_width: f32,
}

impl Camera {
    pub fn new(level_width: f32, viewport_width: f32) -> Self {
        Camera {
            offset: 0.0,
            level_width,
            viewport_width,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn level_width(&self) -> f32 {
        self.level_width
    }

    /// Largest offset that keeps the viewport inside the level.
    pub fn max_offset(&self) -> f32 {
        (self.level_width - self.viewport_width).max(0.0)
    }

    /// Centres the viewport on `focus_x`, clamped to the level bounds.
    pub fn update(&mut self, focus_x: f32) {
        let target = focus_x - self.viewport_width / 2.0;
        self.offset = target.clamp(0.0, self.max_offset());
    }

    /// World → screen. Only the x axis scrolls.
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translate(-self.offset, 0.0)
    }
}
