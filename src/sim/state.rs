//! Scene state and core simulation types

use glam::Vec2;

use super::anim::Animations;
use super::camera::Camera;
use super::character::Character;
use super::tilemap::{CollisionLayer, MapError, TileMap};
use super::trigger::{StatusText, TriggerZone};
use crate::SceneConfig;
use crate::consts::*;

/// Current phase of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Player walks around
    Exploring,
    /// Puzzle window is open; the scene is paused
    Puzzle,
}

/// Things the host must react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// Player bounds started overlapping the tree zone
    ZoneEntered,
    /// Player bounds stopped overlapping the tree zone
    ZoneExited,
    /// Interact pressed at the tree (or anywhere in debug mode)
    PuzzleRequested,
    /// Interact pressed while the puzzle window is already open
    PuzzleFocusRequested,
    /// Debug overlay switched on/off
    DebugToggled(bool),
    /// Player was moved after a solved puzzle
    Teleported { to: Vec2 },
}

/// Complete scene state
#[derive(Debug, Clone)]
pub struct SceneState {
    pub config: SceneConfig,
    pub map: TileMap,
    /// Solid tiles of the world layer
    pub collision: CollisionLayer,
    pub player: Character,
    pub animations: Animations,
    pub tree_zone: TriggerZone,
    pub camera: Camera,
    pub status: StatusText,
    pub phase: ScenePhase,
    pub debug_mode: bool,
}

impl SceneState {
    /// Build the scene from a loaded map.
    ///
    /// Fails when the tileset, one of the three tile layers or the spawn
    /// point is missing.
    pub fn new(map: TileMap, config: SceneConfig) -> Result<Self, MapError> {
        map.add_tileset(&config.tileset)?;
        map.layer(BELOW_LAYER)?;
        map.layer(ABOVE_LAYER)?;
        let collision = map.collision_by_property(WORLD_LAYER, COLLIDES_PROPERTY)?;

        let spawn = map.find_object(OBJECTS_LAYER, SPAWN_POINT)?;
        let player = Character::new(Vec2::new(spawn.x, spawn.y), &config);
        log::info!("Player spawned at ({}, {})", spawn.x, spawn.y);

        let mut camera = Camera::new(config.viewport, map.bounds());
        camera.follow(player.pos);

        Ok(Self {
            tree_zone: TriggerZone::new(config.tree_zone),
            config,
            map,
            collision,
            player,
            animations: Animations::player(),
            camera,
            status: StatusText::Hidden,
            phase: ScenePhase::Exploring,
            debug_mode: false,
        })
    }

    pub fn is_paused(&self) -> bool {
        self.phase == ScenePhase::Puzzle
    }

    /// Whether interact would open the puzzle right now
    pub fn can_open_puzzle(&self) -> bool {
        self.phase == ScenePhase::Exploring && (self.tree_zone.occupied || self.debug_mode)
    }

    /// Pause for the puzzle window
    pub fn begin_puzzle(&mut self) {
        self.phase = ScenePhase::Puzzle;
        self.player.stop();
        self.player.anim.stop();
        log::info!("Scene paused for puzzle");
    }

    /// Resume after the puzzle window closed.
    ///
    /// A solved puzzle moves the player to the teleport point and re-tests
    /// the tree zone from there.
    pub fn finish_puzzle(&mut self, solved: bool) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        if solved {
            let to = self.config.teleport;
            self.player.set_position(to.x, to.y);
            self.check_collision_after_teleport();
            self.camera.follow(self.player.pos);
            events.push(SceneEvent::Teleported { to });
            log::info!("Puzzle solved, player moved to ({}, {})", to.x, to.y);
        }
        self.phase = ScenePhase::Exploring;
        log::info!("Scene resumed");
        events
    }

    /// Re-test the tree zone unconditionally and set the label from the result
    pub fn check_collision_after_teleport(&mut self) {
        let bounds = self.player.bounds();
        self.status = if self.tree_zone.recheck(&bounds) {
            StatusText::Prompt
        } else {
            StatusText::Solved
        };
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        log::info!("Debug mode: {}", self.debug_mode);
        self.debug_mode
    }

    /// Resize the camera view (canvas resize)
    pub fn set_viewport(&mut self, w: f32, h: f32) {
        self.camera.set_viewport(Vec2::new(w, h));
        self.camera.follow(self.player.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    #[test]
    fn test_new_scene() {
        let state = SceneState::new(fixtures::town_map(), fixtures::config()).unwrap();
        assert_eq!(state.player.pos, Vec2::new(600.0, 346.0));
        assert_eq!(state.phase, ScenePhase::Exploring);
        assert_eq!(state.status, StatusText::Hidden);
        assert!(!state.tree_zone.occupied);
        assert_eq!(state.animations.len(), 4);
        assert!(state.collision.is_solid(5, 3));
    }

    #[test]
    fn test_new_scene_requires_spawn_and_tileset() {
        let mut config = fixtures::config();
        config.tileset = "missing".into();
        assert!(matches!(
            SceneState::new(fixtures::town_map(), config),
            Err(MapError::MissingTileset(_))
        ));

        let mut map = fixtures::town_map();
        map.object_groups.clear();
        assert!(matches!(
            SceneState::new(map, fixtures::config()),
            Err(MapError::MissingObject { .. })
        ));

        let mut map = fixtures::town_map();
        map.layers.retain(|l| l.name != "Above Player");
        assert!(matches!(
            SceneState::new(map, fixtures::config()),
            Err(MapError::MissingLayer(_))
        ));
    }

    #[test]
    fn test_finish_unsolved_keeps_position() {
        let mut state = SceneState::new(fixtures::town_map(), fixtures::config()).unwrap();
        state.begin_puzzle();
        assert!(state.is_paused());
        let events = state.finish_puzzle(false);
        assert!(events.is_empty());
        assert_eq!(state.player.pos, Vec2::new(600.0, 346.0));
        assert_eq!(state.phase, ScenePhase::Exploring);
        assert_eq!(state.status, StatusText::Hidden);
    }

    #[test]
    fn test_finish_solved_teleports() {
        let mut state = SceneState::new(fixtures::town_map(), fixtures::config()).unwrap();
        state.player.set_position(818.0, 346.0);
        state.tree_zone.occupied = true;
        state.status = StatusText::Prompt;
        state.begin_puzzle();

        let events = state.finish_puzzle(true);
        assert_eq!(
            events,
            vec![SceneEvent::Teleported {
                to: Vec2::new(1000.0, 300.0)
            }]
        );
        assert_eq!(state.player.pos, Vec2::new(1000.0, 300.0));
        assert!(!state.tree_zone.occupied);
        assert_eq!(state.status, StatusText::Solved);
    }

    #[test]
    fn test_teleport_into_zone_prompts() {
        let mut config = fixtures::config();
        config.teleport = Vec2::new(820.0, 350.0);
        let mut state = SceneState::new(fixtures::town_map(), config).unwrap();
        state.begin_puzzle();
        state.finish_puzzle(true);
        assert!(state.tree_zone.occupied);
        assert_eq!(state.status, StatusText::Prompt);
    }

    #[test]
    fn test_can_open_puzzle() {
        let mut state = SceneState::new(fixtures::town_map(), fixtures::config()).unwrap();
        assert!(!state.can_open_puzzle());
        state.toggle_debug();
        assert!(state.can_open_puzzle());
        state.begin_puzzle();
        assert!(!state.can_open_puzzle());
    }
}
