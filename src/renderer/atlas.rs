//! Sprite atlas frames (TexturePacker JSON, array or hash layout)

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::Rect;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("invalid atlas JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atlas has no frames")]
    Empty,
}

#[derive(Deserialize)]
struct RawAtlas {
    frames: RawFrames,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrames {
    Array(Vec<RawNamedFrame>),
    Hash(HashMap<String, RawFrame>),
}

#[derive(Deserialize)]
struct RawNamedFrame {
    filename: String,
    #[serde(flatten)]
    frame: RawFrame,
}

#[derive(Deserialize)]
struct RawFrame {
    frame: RawRect,
    #[serde(default, rename = "spriteSourceSize")]
    sprite_source_size: Option<RawRect>,
    #[serde(default, rename = "sourceSize")]
    source_size: Option<RawSize>,
}

#[derive(Deserialize, Clone, Copy)]
struct RawRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize, Clone, Copy)]
struct RawSize {
    w: f32,
    h: f32,
}

/// One named frame inside the atlas image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasFrame {
    /// Pixels to copy from the atlas image
    pub source: Rect,
    /// Untrimmed sprite size
    pub size: Vec2,
    /// Where the trimmed pixels sit inside the untrimmed sprite
    pub offset: Vec2,
}

impl AtlasFrame {
    /// Destination rectangle when the untrimmed sprite is centered on `center`
    pub fn placed_at(&self, center: Vec2) -> Rect {
        let origin = Rect::from_center(center, self.size).position() + self.offset;
        Rect::new(origin.x, origin.y, self.source.w, self.source.h)
    }
}

impl From<RawFrame> for AtlasFrame {
    fn from(raw: RawFrame) -> Self {
        let source = Rect::new(raw.frame.x, raw.frame.y, raw.frame.w, raw.frame.h);
        let size = raw
            .source_size
            .map(|s| Vec2::new(s.w, s.h))
            .unwrap_or(source.size());
        let offset = raw
            .sprite_source_size
            .map(|r| Vec2::new(r.x, r.y))
            .unwrap_or(Vec2::ZERO);
        Self {
            source,
            size,
            offset,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    frames: HashMap<String, AtlasFrame>,
}

impl SpriteAtlas {
    pub fn from_json(json: &str) -> Result<Self, AtlasError> {
        let raw: RawAtlas = serde_json::from_str(json)?;
        let frames: HashMap<String, AtlasFrame> = match raw.frames {
            RawFrames::Array(list) => list
                .into_iter()
                .map(|f| (f.filename, f.frame.into()))
                .collect(),
            RawFrames::Hash(map) => map.into_iter().map(|(k, f)| (k, f.into())).collect(),
        };
        if frames.is_empty() {
            return Err(AtlasError::Empty);
        }
        log::debug!("Parsed sprite atlas ({} frames)", frames.len());
        Ok(Self { frames })
    }

    pub fn frame(&self, name: &str) -> Option<&AtlasFrame> {
        self.frames.get(name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_layout() {
        let json = r#"{
            "frames": [
                {"filename": "misa-front", "frame": {"x": 0, "y": 0, "w": 32, "h": 64},
                 "rotated": false, "trimmed": false,
                 "spriteSourceSize": {"x": 0, "y": 0, "w": 32, "h": 64},
                 "sourceSize": {"w": 32, "h": 64}},
                {"filename": "misa-left-walk.000", "frame": {"x": 32, "y": 0, "w": 30, "h": 60},
                 "rotated": false, "trimmed": true,
                 "spriteSourceSize": {"x": 1, "y": 4, "w": 30, "h": 60},
                 "sourceSize": {"w": 32, "h": 64}}
            ],
            "meta": {"image": "atlas.png"}
        }"#;
        let atlas = SpriteAtlas::from_json(json).unwrap();
        assert_eq!(atlas.len(), 2);

        let front = atlas.frame("misa-front").unwrap();
        assert_eq!(front.source, Rect::new(0.0, 0.0, 32.0, 64.0));
        assert_eq!(front.offset, Vec2::ZERO);

        let walk = atlas.frame("misa-left-walk.000").unwrap();
        assert_eq!(walk.size, Vec2::new(32.0, 64.0));
        assert_eq!(
            walk.placed_at(Vec2::new(100.0, 100.0)),
            Rect::new(85.0, 72.0, 30.0, 60.0)
        );
    }

    #[test]
    fn test_hash_layout_without_sizes() {
        let json = r#"{"frames": {"misa-back": {"frame": {"x": 64, "y": 0, "w": 32, "h": 64}}}}"#;
        let atlas = SpriteAtlas::from_json(json).unwrap();
        let back = atlas.frame("misa-back").unwrap();
        assert_eq!(back.size, Vec2::new(32.0, 64.0));
        assert_eq!(
            back.placed_at(Vec2::new(16.0, 32.0)),
            Rect::new(0.0, 0.0, 32.0, 64.0)
        );
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert!(matches!(
            SpriteAtlas::from_json(r#"{"frames": []}"#),
            Err(AtlasError::Empty)
        ));
        assert!(matches!(
            SpriteAtlas::from_json("{"),
            Err(AtlasError::Json(_))
        ));
    }
}
