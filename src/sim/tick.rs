//! Fixed timestep simulation tick
//!
//! Advances the scene by one step: debug/interact commands, walking,
//! tile collisions, animation and the tree zone check.

use glam::Vec2;

use super::anim::keys;
use super::physics::step_body;
use super::state::{SceneEvent, SceneState};
use super::trigger::{StatusText, ZoneEdge};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Interact key went down (one-shot)
    pub interact: bool,
    /// Debug key went down (one-shot)
    pub toggle_debug: bool,
}

impl TickInput {
    pub fn any_direction(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Advance the scene by one fixed timestep
pub fn tick(state: &mut SceneState, input: &TickInput, dt: f32) -> Vec<SceneEvent> {
    let mut events = Vec::new();

    if input.toggle_debug {
        let on = state.toggle_debug();
        events.push(SceneEvent::DebugToggled(on));
    }

    if input.interact {
        if state.is_paused() {
            events.push(SceneEvent::PuzzleFocusRequested);
        } else if state.can_open_puzzle() {
            log::info!("Puzzle requested");
            events.push(SceneEvent::PuzzleRequested);
        }
    }

    // Nothing moves while the puzzle is open
    if state.is_paused() {
        return events;
    }

    // Walking: horizontal first, vertical animation wins on diagonals
    let speed = state.config.speed;
    let player = &mut state.player;
    player.stop();

    if input.left {
        player.move_left(speed);
        player.anim.play(keys::LEFT_WALK, true);
    } else if input.right {
        player.move_right(speed);
        player.anim.play(keys::RIGHT_WALK, true);
    }

    if input.up {
        player.move_up(speed);
        player.anim.play(keys::BACK_WALK, true);
    } else if input.down {
        player.move_down(speed);
        player.anim.play(keys::FRONT_WALK, true);
    }

    // Same speed on diagonals
    player.vel = player.vel.normalize_or_zero() * speed;

    if !input.any_direction() {
        player.anim.stop();
    }

    if player.vel != Vec2::ZERO {
        let bounds = player
            .collide_world_bounds
            .then(|| state.map.bounds());
        let step = step_body(player.body(), player.vel, dt, &state.collision, bounds);
        player.set_body_position(&step.body);
    }

    player.anim.update(dt, &state.animations);

    // Tree zone edges
    match state.tree_zone.update(&state.player.bounds()) {
        Some(ZoneEdge::Entered) => {
            log::debug!("Player reached the tree");
            state.status = StatusText::Prompt;
            events.push(SceneEvent::ZoneEntered);
        }
        Some(ZoneEdge::Exited) => {
            state.status = StatusText::Hidden;
            events.push(SceneEvent::ZoneExited);
        }
        None => {}
    }

    state.camera.follow(state.player.pos);

    events
}
