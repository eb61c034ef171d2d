//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input (held keys, one-shot presses)
//! - Asset loading (fetch on web, filesystem natively)
//! - The puzzle popup window (web only)

pub mod assets;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod puzzle;

pub use assets::AssetError;
pub use input::KeyboardState;
