//! Keyboard state between browser events and simulation ticks

use std::collections::HashSet;

use crate::settings::{Action, KeyBindings, KeyCode};
use crate::sim::TickInput;

/// Held keys plus one-shot presses waiting for the next tick
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat does not count as a new press.
    pub fn press(&mut self, key: KeyCode) {
        if self.held.insert(key.clone()) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: &KeyCode) {
        self.held.remove(key);
    }

    /// Window lost focus: keyup events will never arrive
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    pub fn is_down(&self, key: &KeyCode) -> bool {
        self.held.contains(key)
    }

    /// Build the tick input for the current bindings
    pub fn resolve(&self, bindings: &KeyBindings) -> TickInput {
        let down = |action| self.is_down(&bindings.key_for(action));
        TickInput {
            left: down(Action::Left),
            right: down(Action::Right),
            up: down(Action::Up),
            down: down(Action::Down),
            interact: self.pressed.contains(&KeyCode::interact()),
            toggle_debug: self.pressed.contains(&bindings.key_for(Action::Debug)),
        }
    }

    /// Forget one-shot presses once a tick has consumed them
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }
}
