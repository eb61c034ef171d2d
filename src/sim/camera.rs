//! Follow camera bounded by the map

use glam::Vec2;

use super::rect::Rect;

#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the view's top-left corner
    pub scroll: Vec2,
    /// View size in pixels
    pub viewport: Vec2,
    /// Area the view may not leave
    pub bounds: Rect,
}

impl Camera {
    pub fn new(viewport: Vec2, bounds: Rect) -> Self {
        Self {
            scroll: Vec2::ZERO,
            viewport,
            bounds,
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Center on `target`, clamped to the bounds.
    /// An axis where the bounds are smaller than the view pins to the bounds' origin.
    pub fn follow(&mut self, target: Vec2) {
        let desired = target - self.viewport / 2.0;
        let max_x = (self.bounds.right() - self.viewport.x).max(self.bounds.left());
        let max_y = (self.bounds.bottom() - self.viewport.y).max(self.bounds.top());
        self.scroll = Vec2::new(
            desired.x.clamp(self.bounds.left(), max_x),
            desired.y.clamp(self.bounds.top(), max_y),
        );
    }

    /// Visible world rectangle
    pub fn view(&self) -> Rect {
        Rect::new(self.scroll.x, self.scroll.y, self.viewport.x, self.viewport.y)
    }

    pub fn world_to_view(&self, p: Vec2) -> Vec2 {
        p - self.scroll
    }
}
