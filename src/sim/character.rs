//! Player character: sprite position, physics body and walk helpers

use glam::Vec2;

use super::anim::Animator;
use super::rect::Rect;
use crate::SceneConfig;

/// A walking sprite.
///
/// `pos` is the center of the sprite frame. The physics body is a smaller
/// rectangle inside the frame, placed by `body_offset` from the frame's
/// top-left corner.
#[derive(Debug, Clone)]
pub struct Character {
    pub pos: Vec2,
    pub vel: Vec2,
    pub frame_size: Vec2,
    pub body_size: Vec2,
    pub body_offset: Vec2,
    /// Keep the body inside the world bounds
    pub collide_world_bounds: bool,
    pub anim: Animator,
}

impl Character {
    pub fn new(pos: Vec2, config: &SceneConfig) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            frame_size: config.frame_size,
            body_size: config.body_size,
            body_offset: config.body_offset,
            collide_world_bounds: true,
            anim: Animator::new(),
        }
    }

    pub fn move_left(&mut self, speed: f32) {
        self.vel.x = -speed;
    }

    pub fn move_right(&mut self, speed: f32) {
        self.vel.x = speed;
    }

    pub fn move_up(&mut self, speed: f32) {
        self.vel.y = -speed;
    }

    pub fn move_down(&mut self, speed: f32) {
        self.vel.y = speed;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Teleport (velocity is kept)
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }

    /// Displayed sprite bounds, used for trigger checks
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.frame_size)
    }

    /// Physics body rectangle
    pub fn body(&self) -> Rect {
        let top_left = self.pos - self.frame_size / 2.0 + self.body_offset;
        Rect::new(top_left.x, top_left.y, self.body_size.x, self.body_size.y)
    }

    /// Move the sprite so its body lands at `body`'s position
    pub fn set_body_position(&mut self, body: &Rect) {
        self.pos = body.position() - self.body_offset + self.frame_size / 2.0;
    }
}
