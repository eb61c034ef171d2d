//! Arcade-style body movement
//!
//! Bodies move one axis at a time and are pushed back out of any solid
//! tile they end up overlapping. Good enough for a walking character at
//! fixed timestep; fast bodies could tunnel through thin walls.

use glam::Vec2;

use super::rect::Rect;
use super::tilemap::CollisionLayer;

/// Which sides of a body were stopped during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocked {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Blocked {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Result of moving a body for one step
#[derive(Debug, Clone, Copy)]
pub struct BodyStep {
    pub body: Rect,
    pub blocked: Blocked,
}

/// Move `body` by `vel * dt`, resolving against solid tiles and optional world bounds
pub fn step_body(
    body: Rect,
    vel: Vec2,
    dt: f32,
    collision: &CollisionLayer,
    bounds: Option<Rect>,
) -> BodyStep {
    let mut blocked = Blocked::default();
    let delta = vel * dt;

    // X axis
    let mut moved = body.translated(Vec2::new(delta.x, 0.0));
    if delta.x != 0.0 {
        for tile in collision.solid_tiles_in(&moved) {
            if delta.x > 0.0 && moved.right() > tile.left() {
                moved.x = tile.left() - moved.w;
                blocked.right = true;
            } else if delta.x < 0.0 && moved.left() < tile.right() {
                moved.x = tile.right();
                blocked.left = true;
            }
        }
    }

    // Y axis
    moved = moved.translated(Vec2::new(0.0, delta.y));
    if delta.y != 0.0 {
        for tile in collision.solid_tiles_in(&moved) {
            if delta.y > 0.0 && moved.bottom() > tile.top() {
                moved.y = tile.top() - moved.h;
                blocked.down = true;
            } else if delta.y < 0.0 && moved.top() < tile.bottom() {
                moved.y = tile.bottom();
                blocked.up = true;
            }
        }
    }

    if let Some(bounds) = bounds {
        if moved.left() < bounds.left() {
            moved.x = bounds.left();
            blocked.left = true;
        } else if moved.right() > bounds.right() {
            moved.x = bounds.right() - moved.w;
            blocked.right = true;
        }
        if moved.top() < bounds.top() {
            moved.y = bounds.top();
            blocked.up = true;
        } else if moved.bottom() > bounds.bottom() {
            moved.y = bounds.bottom() - moved.h;
            blocked.down = true;
        }
    }

    BodyStep {
        body: moved,
        blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    fn collision() -> CollisionLayer {
        fixtures::town_map()
            .collision_by_property("World", "collides")
            .unwrap()
    }

    #[test]
    fn test_free_movement() {
        let body = Rect::new(300.0, 300.0, 30.0, 40.0);
        let step = step_body(body, Vec2::new(300.0, 0.0), 0.1, &collision(), None);
        assert_eq!(step.body.x, 330.0);
        assert!(!step.blocked.any());
    }

    #[test]
    fn test_blocked_by_wall_moving_left() {
        // Wall occupies x 160..192
        let body = Rect::new(195.0, 300.0, 30.0, 40.0);
        let step = step_body(body, Vec2::new(-300.0, 0.0), 0.1, &collision(), None);
        assert_eq!(step.body.x, 192.0);
        assert!(step.blocked.left);
    }

    #[test]
    fn test_blocked_by_wall_moving_right() {
        let body = Rect::new(125.0, 300.0, 30.0, 40.0);
        let step = step_body(body, Vec2::new(300.0, 0.0), 0.1, &collision(), None);
        assert_eq!(step.body.right(), 160.0);
        assert!(step.blocked.right);
    }

    #[test]
    fn test_slides_along_wall() {
        // Pressing into the wall while walking down keeps vertical progress
        let body = Rect::new(192.0, 300.0, 30.0, 40.0);
        let step = step_body(body, Vec2::new(-212.0, 212.0), 0.1, &collision(), None);
        assert_eq!(step.body.x, 192.0);
        assert!((step.body.y - 321.2).abs() < 1e-3);
        assert!(step.blocked.left);
        assert!(!step.blocked.down);
    }

    #[test]
    fn test_world_bounds_clamp() {
        let bounds = Rect::new(0.0, 0.0, 1280.0, 640.0);
        let body = Rect::new(1240.0, 5.0, 30.0, 40.0);
        let step = step_body(body, Vec2::new(300.0, -300.0), 0.1, &collision(), Some(bounds));
        assert_eq!(step.body.right(), 1280.0);
        assert_eq!(step.body.top(), 0.0);
        assert!(step.blocked.right);
        assert!(step.blocked.up);
    }
}
