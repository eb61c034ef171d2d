//! Key bindings
//!
//! Persisted in LocalStorage under `customKeys`, e.g.
//! `{"up":"Z","down":"S","left":"Q","right":"D","debug":"P"}`.
//! An empty string (or a missing entry) keeps the default key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DEBUG_KEY, INTERACT_KEY};
use crate::persistence::{Storage, keys};

/// A normalized key name (`LEFT`, `E`, `SPACE`, `ONE`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCode(String);

const DIGIT_NAMES: [&str; 10] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

impl KeyCode {
    /// Parse a binding or a browser `KeyboardEvent.key` value.
    /// Returns `None` for an empty string.
    pub fn parse(name: &str) -> Option<Self> {
        if name == " " {
            return Some(Self("SPACE".into()));
        }
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(d) = c.to_digit(10) {
                return Some(Self(DIGIT_NAMES[d as usize].into()));
            }
            return Some(Self(c.to_uppercase().collect()));
        }

        let upper = name.to_uppercase();
        let canonical = match upper.as_str() {
            "ARROWLEFT" => "LEFT",
            "ARROWRIGHT" => "RIGHT",
            "ARROWUP" => "UP",
            "ARROWDOWN" => "DOWN",
            "SPACEBAR" => "SPACE",
            "ESCAPE" => "ESC",
            "CONTROL" => "CTRL",
            other => other,
        };
        Some(Self(canonical.to_string()))
    }

    /// Legacy numeric `keyCode` values
    pub fn from_legacy_code(code: u32) -> Option<Self> {
        let name = match code {
            8 => "BACKSPACE".to_string(),
            9 => "TAB".to_string(),
            13 => "ENTER".to_string(),
            16 => "SHIFT".to_string(),
            17 => "CTRL".to_string(),
            18 => "ALT".to_string(),
            27 => "ESC".to_string(),
            32 => "SPACE".to_string(),
            37 => "LEFT".to_string(),
            38 => "UP".to_string(),
            39 => "RIGHT".to_string(),
            40 => "DOWN".to_string(),
            48..=57 => DIGIT_NAMES[(code - 48) as usize].to_string(),
            65..=90 => char::from(code as u8).to_string(),
            _ => {
                log::warn!("Unsupported key code {} in bindings", code);
                return None;
            }
        };
        Some(Self(name))
    }

    /// Build from a name known to be valid
    pub fn named(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| Self(name.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn interact() -> Self {
        Self::named(INTERACT_KEY)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rebindable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Debug,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Debug,
    ];

    pub fn default_key(&self) -> KeyCode {
        match self {
            Action::Up => KeyCode::named("UP"),
            Action::Down => KeyCode::named("DOWN"),
            Action::Left => KeyCode::named("LEFT"),
            Action::Right => KeyCode::named("RIGHT"),
            Action::Debug => KeyCode::named(DEFAULT_DEBUG_KEY),
        }
    }
}

/// User key bindings; `None` means the default key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(with = "binding")]
    pub up: Option<KeyCode>,
    #[serde(with = "binding")]
    pub down: Option<KeyCode>,
    #[serde(with = "binding")]
    pub left: Option<KeyCode>,
    #[serde(with = "binding")]
    pub right: Option<KeyCode>,
    #[serde(with = "binding", skip_serializing_if = "Option::is_none")]
    pub debug: Option<KeyCode>,
}

impl KeyBindings {
    /// Effective key for an action
    pub fn key_for(&self, action: Action) -> KeyCode {
        let custom = match action {
            Action::Up => &self.up,
            Action::Down => &self.down,
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Debug => &self.debug,
        };
        custom.clone().unwrap_or_else(|| action.default_key())
    }

    pub fn set(&mut self, action: Action, key: Option<KeyCode>) {
        match action {
            Action::Up => self.up = key,
            Action::Down => self.down = key,
            Action::Left => self.left = key,
            Action::Right => self.right = key,
            Action::Debug => self.debug = key,
        }
    }

    /// Parse stored JSON, falling back to defaults on malformed data
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(bindings) => bindings,
            Err(e) => {
                log::warn!("Ignoring malformed key bindings: {}", e);
                Self::default()
            }
        }
    }

    /// Load bindings from storage
    pub fn load(store: &dyn Storage) -> Self {
        match store.get_item(keys::CUSTOM_KEYS) {
            Some(json) => {
                let bindings = Self::from_json(&json);
                log::info!("Loaded key bindings");
                bindings
            }
            None => {
                log::info!("Using default key bindings");
                Self::default()
            }
        }
    }

    /// Save bindings to storage
    pub fn save(&self, store: &dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set_item(keys::CUSTOM_KEYS, &json) {
                Ok(()) => log::info!("Key bindings saved"),
                Err(e) => log::warn!("Could not save key bindings: {}", e),
            },
            Err(e) => log::warn!("Could not encode key bindings: {}", e),
        }
    }
}

/// Serde adapter: `""`, `null` and unknown codes map to `None`
mod binding {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::KeyCode;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Code(u32),
    }

    pub fn serialize<S: Serializer>(key: &Option<KeyCode>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(key.as_ref().map(KeyCode::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<KeyCode>, D::Error> {
        Ok(match Option::<Raw>::deserialize(d)? {
            None => None,
            Some(Raw::Name(name)) => KeyCode::parse(&name),
            Some(Raw::Code(code)) => KeyCode::from_legacy_code(code),
        })
    }
}
