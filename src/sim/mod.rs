//! Scene simulation module
//!
//! Everything the scene does between frames lives here, free of browser
//! and GPU dependencies:
//! - Fixed timestep only
//! - Input arrives as a resolved [`TickInput`]
//! - Side effects (puzzle window, storage) are returned as [`SceneEvent`]s

pub mod anim;
pub mod camera;
pub mod character;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;
pub mod tilemap;
pub mod trigger;

#[cfg(test)]
pub(crate) mod fixtures;

pub use anim::{AnimationDef, Animations, Animator, generate_frame_names};
pub use camera::Camera;
pub use character::Character;
pub use physics::{Blocked, BodyStep, step_body};
pub use rect::Rect;
pub use state::{SceneEvent, ScenePhase, SceneState};
pub use tick::{TickInput, tick};
pub use tilemap::{CollisionLayer, MapError, MapObject, TileLayer, TileMap};
pub use trigger::{StatusText, TriggerZone, ZoneEdge};
