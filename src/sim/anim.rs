//! Sprite frame animations
//!
//! Animations are named lists of atlas frame names played at a fixed rate.

use std::collections::HashMap;

use crate::consts::WALK_FRAME_RATE;

/// Build atlas frame names like `misa-left-walk.000` .. `misa-left-walk.003`
pub fn generate_frame_names(prefix: &str, start: u32, end: u32, zero_pad: usize) -> Vec<String> {
    (start..=end)
        .map(|i| format!("{prefix}{i:0zero_pad$}"))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    pub frames: Vec<String>,
    pub frame_rate: f32,
    /// Extra plays after the first; `None` loops forever
    pub repeat: Option<u32>,
}

/// Registry of animations by key
#[derive(Debug, Clone, Default)]
pub struct Animations {
    defs: HashMap<String, AnimationDef>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation (replaces an existing one with the same key)
    pub fn create(&mut self, def: AnimationDef) {
        self.defs.insert(def.key.clone(), def);
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.defs.get(key)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The four looping walk cycles of the player
    pub fn player() -> Self {
        let mut anims = Self::new();
        for key in [
            keys::LEFT_WALK,
            keys::RIGHT_WALK,
            keys::FRONT_WALK,
            keys::BACK_WALK,
        ] {
            anims.create(AnimationDef {
                key: key.to_string(),
                frames: generate_frame_names(&format!("{key}."), 0, 3, 3),
                frame_rate: WALK_FRAME_RATE,
                repeat: None,
            });
        }
        anims
    }
}

/// Player animation keys
pub mod keys {
    pub const LEFT_WALK: &str = "misa-left-walk";
    pub const RIGHT_WALK: &str = "misa-right-walk";
    pub const FRONT_WALK: &str = "misa-front-walk";
    pub const BACK_WALK: &str = "misa-back-walk";
    /// Standing frame before any animation has played
    pub const IDLE_FRAME: &str = "misa-front";
}

/// Playback state for one sprite
#[derive(Debug, Clone, Default)]
pub struct Animator {
    current: Option<String>,
    frame: usize,
    elapsed: f32,
    plays: u32,
    playing: bool,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `key`. With `ignore_if_playing`, an already running `key` keeps its frame.
    pub fn play(&mut self, key: &str, ignore_if_playing: bool) {
        if ignore_if_playing && self.playing && self.current.as_deref() == Some(key) {
            return;
        }
        self.current = Some(key.to_string());
        self.frame = 0;
        self.elapsed = 0.0;
        self.plays = 0;
        self.playing = true;
    }

    /// Halt on the current frame
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Atlas frame to draw
    pub fn current_frame<'a>(&self, anims: &'a Animations) -> &'a str {
        self.current
            .as_deref()
            .and_then(|key| anims.get(key))
            .and_then(|def| def.frames.get(self.frame))
            .map(String::as_str)
            .unwrap_or(keys::IDLE_FRAME)
    }

    pub fn update(&mut self, dt: f32, anims: &Animations) {
        if !self.playing {
            return;
        }
        let Some(def) = self.current.as_deref().and_then(|k| anims.get(k)) else {
            self.playing = false;
            return;
        };
        if def.frames.is_empty() || def.frame_rate <= 0.0 {
            return;
        }

        let frame_time = 1.0 / def.frame_rate;
        self.elapsed += dt;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            if self.frame + 1 < def.frames.len() {
                self.frame += 1;
                continue;
            }
            // End of cycle
            match def.repeat {
                Some(n) if self.plays >= n => {
                    self.playing = false;
                    return;
                }
                _ => {
                    self.plays += 1;
                    self.frame = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_frame_names() {
        let names = generate_frame_names("misa-left-walk.", 0, 3, 3);
        assert_eq!(
            names,
            vec![
                "misa-left-walk.000",
                "misa-left-walk.001",
                "misa-left-walk.002",
                "misa-left-walk.003"
            ]
        );
    }

    #[test]
    fn test_player_animations() {
        let anims = Animations::player();
        assert_eq!(anims.len(), 4);
        let back = anims.get(keys::BACK_WALK).unwrap();
        assert_eq!(back.frame_rate, 10.0);
        assert_eq!(back.repeat, None);
        assert_eq!(back.frames[3], "misa-back-walk.003");
    }

    #[test]
    fn test_walk_loops() {
        let anims = Animations::player();
        let mut animator = Animator::new();
        assert_eq!(animator.current_frame(&anims), keys::IDLE_FRAME);

        animator.play(keys::LEFT_WALK, true);
        assert_eq!(animator.current_frame(&anims), "misa-left-walk.000");
        // 0.25s at 10 fps = 2 frames
        animator.update(0.25, &anims);
        assert_eq!(animator.frame_index(), 2);
        // Wraps after the 4th frame
        animator.update(0.2, &anims);
        assert_eq!(animator.frame_index(), 0);
        assert!(animator.is_playing());
    }

    #[test]
    fn test_play_same_key_keeps_frame() {
        let anims = Animations::player();
        let mut animator = Animator::new();
        animator.play(keys::FRONT_WALK, true);
        animator.update(0.15, &anims);
        assert_eq!(animator.frame_index(), 1);
        animator.play(keys::FRONT_WALK, true);
        assert_eq!(animator.frame_index(), 1);
        // Switching restarts
        animator.play(keys::BACK_WALK, true);
        assert_eq!(animator.frame_index(), 0);
    }

    #[test]
    fn test_stop_freezes_frame() {
        let anims = Animations::player();
        let mut animator = Animator::new();
        animator.play(keys::RIGHT_WALK, true);
        animator.update(0.15, &anims);
        animator.stop();
        animator.update(1.0, &anims);
        assert_eq!(animator.current_frame(&anims), "misa-right-walk.001");
        assert!(!animator.is_playing());
        // Playing again after a stop restarts the cycle
        animator.play(keys::RIGHT_WALK, true);
        assert_eq!(animator.frame_index(), 0);
    }

    #[test]
    fn test_finite_repeat_ends() {
        let mut anims = Animations::new();
        anims.create(AnimationDef {
            key: "blink".into(),
            frames: generate_frame_names("blink.", 0, 1, 2),
            frame_rate: 10.0,
            repeat: Some(0),
        });
        let mut animator = Animator::new();
        animator.play("blink", false);
        animator.update(0.5, &anims);
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(&anims), "blink.01");
    }
}
