//! Enigme Town - a top-down town walk with a puzzle trigger
//!
//! Core modules:
//! - `sim`: Scene simulation (tilemap, movement, collisions, trigger zone)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input, asset fetching and the puzzle window
//! - `persistence`: LocalStorage access and string-boolean flags
//! - `settings`: User key bindings (`customKeys`)
//! - `progress`: Puzzle session flags (`gameState`, `enigmeSolved`) and the
//!   popup window lifecycle

pub mod persistence;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use progress::{PuzzleHandle, PuzzleProgress, PuzzleSession};
pub use settings::{Action, KeyBindings, KeyCode};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use sim::Rect;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player walk speed (pixels/s, also the diagonal speed)
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Atlas frame size of the player sprite
    pub const PLAYER_FRAME_W: f32 = 32.0;
    pub const PLAYER_FRAME_H: f32 = 64.0;
    /// Physics body inside the frame (feet only, so the head can overlap walls)
    pub const PLAYER_BODY_W: f32 = 30.0;
    pub const PLAYER_BODY_H: f32 = 40.0;
    pub const PLAYER_BODY_OFFSET_X: f32 = 0.0;
    pub const PLAYER_BODY_OFFSET_Y: f32 = 24.0;
    /// Walk animation speed (frames/s)
    pub const WALK_FRAME_RATE: f32 = 10.0;

    /// Tree trigger zone (center + size)
    pub const TREE_ZONE_X: f32 = 818.0;
    pub const TREE_ZONE_Y: f32 = 346.0;
    pub const TREE_ZONE_W: f32 = 64.0;
    pub const TREE_ZONE_H: f32 = 92.0;
    /// Where the player lands once the puzzle is solved
    pub const TELEPORT_X: f32 = 1000.0;
    pub const TELEPORT_Y: f32 = 300.0;

    /// Puzzle document and its popup window
    pub const PUZZLE_URL: &str = "enigme.html";
    pub const PUZZLE_WINDOW_NAME: &str = "Enigme";
    pub const PUZZLE_WINDOW_FEATURES: &str =
        "height=600,width=800,status=yes,toolbar=no,menubar=no,location=no";

    /// Assets
    pub const MAP_URL: &str = "assets/tilemaps/tuxemon-town.json";
    pub const TILESET_IMAGE_URL: &str = "assets/tilesets/tuxmon-sample-32px-extruded.png";
    pub const ATLAS_IMAGE_URL: &str = "assets/atlas/atlas.png";
    pub const ATLAS_JSON_URL: &str = "assets/atlas/atlas.json";
    pub const TILESET_NAME: &str = "tuxmon-sample-32px-extruded";

    /// Map layers and objects
    pub const BELOW_LAYER: &str = "Below Player";
    pub const WORLD_LAYER: &str = "World";
    pub const ABOVE_LAYER: &str = "Above Player";
    pub const OBJECTS_LAYER: &str = "Objects";
    pub const SPAWN_POINT: &str = "Spawn Point";
    /// Tile property marking solid tiles
    pub const COLLIDES_PROPERTY: &str = "collides";

    /// Fixed keys
    pub const INTERACT_KEY: &str = "E";
    pub const DEFAULT_DEBUG_KEY: &str = "D";
}

/// Scene tunables, defaulting to [`consts`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub speed: f32,
    pub frame_size: Vec2,
    pub body_size: Vec2,
    pub body_offset: Vec2,
    /// Trigger zone rectangle (top-left origin)
    pub tree_zone: Rect,
    pub teleport: Vec2,
    pub tileset: String,
    /// Visible area in pixels, used by the camera
    pub viewport: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use consts::*;
        Self {
            speed: PLAYER_SPEED,
            frame_size: Vec2::new(PLAYER_FRAME_W, PLAYER_FRAME_H),
            body_size: Vec2::new(PLAYER_BODY_W, PLAYER_BODY_H),
            body_offset: Vec2::new(PLAYER_BODY_OFFSET_X, PLAYER_BODY_OFFSET_Y),
            tree_zone: Rect::from_center(
                Vec2::new(TREE_ZONE_X, TREE_ZONE_Y),
                Vec2::new(TREE_ZONE_W, TREE_ZONE_H),
            ),
            teleport: Vec2::new(TELEPORT_X, TELEPORT_Y),
            tileset: TILESET_NAME.to_string(),
            viewport: Vec2::new(800.0, 600.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_zone_is_centered() {
        let config = SceneConfig::default();
        assert_eq!(config.tree_zone.x, 786.0);
        assert_eq!(config.tree_zone.y, 300.0);
        assert_eq!(config.tree_zone.right(), 850.0);
        assert_eq!(config.tree_zone.bottom(), 392.0);
    }

    #[test]
    fn test_config_json_fills_missing_fields() {
        let config: SceneConfig = serde_json::from_str(r#"{"speed": 150.0}"#).unwrap();
        assert_eq!(config.speed, 150.0);
        assert_eq!(config.teleport, Vec2::new(consts::TELEPORT_X, consts::TELEPORT_Y));
    }
}
