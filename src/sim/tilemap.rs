//! Tiled JSON tilemaps
//!
//! Supports orthogonal, finite maps exported as JSON with uncompressed
//! layer data. Tile properties are read from both the `tiles[].properties`
//! array format and the older `tileproperties` map.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::rect::Rect;

/// Tiled stores flip/rotation flags in the top bits of each gid
const GID_FLAGS_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid map JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported map orientation '{0}'")]
    UnsupportedOrientation(String),
    #[error("infinite maps are not supported")]
    Infinite,
    #[error("map has no tile layer named '{0}'")]
    MissingLayer(String),
    #[error("map has no object named '{name}' in layer '{layer}'")]
    MissingObject { layer: String, name: String },
    #[error("map has no tileset named '{0}'")]
    MissingTileset(String),
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

// ============================================================================
// RAW TILED FORMAT
// ============================================================================

#[derive(Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    infinite: bool,
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawLayer {
    #[serde(rename = "tilelayer")]
    Tiles {
        name: String,
        width: u32,
        height: u32,
        data: Vec<u32>,
        #[serde(default = "default_visible")]
        visible: bool,
    },
    #[serde(rename = "objectgroup")]
    Objects {
        name: String,
        #[serde(default)]
        objects: Vec<MapObject>,
    },
    #[serde(other)]
    Other,
}

fn default_visible() -> bool {
    true
}

#[derive(Deserialize)]
struct RawTileset {
    #[serde(default)]
    name: String,
    firstgid: u32,
    #[serde(default)]
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    image: String,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
    #[serde(default)]
    tiles: Vec<RawTile>,
    #[serde(default)]
    tileproperties: HashMap<String, HashMap<String, Value>>,
}

#[derive(Deserialize)]
struct RawTile {
    id: u32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    value: Value,
}

// ============================================================================
// PARSED MAP
// ============================================================================

/// A grid of tile gids (0 = empty cell)
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
    pub visible: bool,
}

impl TileLayer {
    /// Gid at tile coordinates (0 when empty or out of range)
    pub fn gid_at(&self, tx: i32, ty: i32) -> u32 {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            return 0;
        }
        self.data[(ty as u32 * self.width + tx as u32) as usize]
    }
}

/// A named object from an object layer (spawn points, markers)
#[derive(Debug, Clone, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub tile_count: u32,
    pub columns: u32,
    /// Tile size inside the image
    pub tile_width: u32,
    pub tile_height: u32,
    /// Border around the image and gap between tiles (extruded tilesets)
    pub margin: u32,
    pub spacing: u32,
    /// Image path as written in the map
    pub image: String,
    pub image_width: u32,
    pub image_height: u32,
    /// Properties keyed by local tile id
    properties: HashMap<u32, HashMap<String, Value>>,
}

impl Tileset {
    pub fn property(&self, local_id: u32, name: &str) -> Option<&Value> {
        self.properties.get(&local_id)?.get(name)
    }

    /// Pixel rectangle of a local tile id inside the tileset image
    pub fn source_rect(&self, local_id: u32) -> Option<Rect> {
        if self.columns == 0 || local_id >= self.tile_count {
            return None;
        }
        let col = local_id % self.columns;
        let row = local_id / self.columns;
        Some(Rect::new(
            (self.margin + col * (self.tile_width + self.spacing)) as f32,
            (self.margin + row * (self.tile_height + self.spacing)) as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        ))
    }
}

/// Columns that fit in the image when the map does not say
fn columns_in_image(image_width: u32, tile_width: u32, margin: u32, spacing: u32) -> u32 {
    if tile_width == 0 || image_width < 2 * margin + tile_width {
        return 0;
    }
    (image_width - 2 * margin + spacing) / (tile_width + spacing)
}

/// Loaded tilemap
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Size in tiles
    pub width: u32,
    pub height: u32,
    /// Tile size in pixels
    pub tile_width: f32,
    pub tile_height: f32,
    pub layers: Vec<TileLayer>,
    pub object_groups: Vec<ObjectGroup>,
    pub tilesets: Vec<Tileset>,
}

impl TileMap {
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let raw: RawMap = serde_json::from_str(json)?;

        if let Some(orientation) = raw.orientation.as_deref() {
            if orientation != "orthogonal" {
                return Err(MapError::UnsupportedOrientation(orientation.to_string()));
            }
        }
        if raw.infinite {
            return Err(MapError::Infinite);
        }

        let mut layers = Vec::new();
        let mut object_groups = Vec::new();
        for layer in raw.layers {
            match layer {
                RawLayer::Tiles {
                    name,
                    width,
                    height,
                    data,
                    visible,
                } => {
                    let expected = (width * height) as usize;
                    if data.len() != expected {
                        return Err(MapError::LayerSize {
                            layer: name,
                            expected,
                            actual: data.len(),
                        });
                    }
                    let data = data.into_iter().map(|gid| gid & GID_FLAGS_MASK).collect();
                    layers.push(TileLayer {
                        name,
                        width,
                        height,
                        data,
                        visible,
                    });
                }
                RawLayer::Objects { name, objects } => {
                    object_groups.push(ObjectGroup { name, objects });
                }
                RawLayer::Other => {}
            }
        }

        let mut tilesets: Vec<Tileset> = raw
            .tilesets
            .into_iter()
            .map(|ts| {
                let mut properties: HashMap<u32, HashMap<String, Value>> = HashMap::new();
                for tile in ts.tiles {
                    let props = properties.entry(tile.id).or_default();
                    for p in tile.properties {
                        props.insert(p.name, p.value);
                    }
                }
                for (id, props) in ts.tileproperties {
                    if let Ok(id) = id.parse::<u32>() {
                        properties.entry(id).or_default().extend(props);
                    }
                }
                let tile_width = if ts.tilewidth > 0 { ts.tilewidth } else { raw.tilewidth };
                let tile_height = if ts.tileheight > 0 {
                    ts.tileheight
                } else {
                    raw.tileheight
                };
                let columns = if ts.columns > 0 {
                    ts.columns
                } else {
                    columns_in_image(ts.imagewidth, tile_width, ts.margin, ts.spacing)
                };
                Tileset {
                    name: ts.name,
                    first_gid: ts.firstgid,
                    tile_count: ts.tilecount,
                    columns,
                    tile_width,
                    tile_height,
                    margin: ts.margin,
                    spacing: ts.spacing,
                    image: ts.image,
                    image_width: ts.imagewidth,
                    image_height: ts.imageheight,
                    properties,
                }
            })
            .collect();
        tilesets.sort_by_key(|ts| ts.first_gid);

        log::debug!(
            "Parsed tilemap {}x{} ({} tile layers, {} object layers, {} tilesets)",
            raw.width,
            raw.height,
            layers.len(),
            object_groups.len(),
            tilesets.len()
        );

        Ok(Self {
            width: raw.width,
            height: raw.height,
            tile_width: raw.tilewidth as f32,
            tile_height: raw.tileheight as f32,
            layers,
            object_groups,
            tilesets,
        })
    }

    pub fn width_in_pixels(&self) -> f32 {
        self.width as f32 * self.tile_width
    }

    pub fn height_in_pixels(&self) -> f32 {
        self.height as f32 * self.tile_height
    }

    /// Whole map as a rectangle (used as world bounds)
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_in_pixels(), self.height_in_pixels())
    }

    /// Look up a tileset by name
    pub fn add_tileset(&self, name: &str) -> Result<&Tileset, MapError> {
        self.tilesets
            .iter()
            .find(|ts| ts.name == name)
            .ok_or_else(|| MapError::MissingTileset(name.to_string()))
    }

    pub fn layer(&self, name: &str) -> Result<&TileLayer, MapError> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| MapError::MissingLayer(name.to_string()))
    }

    pub fn find_object(&self, layer: &str, name: &str) -> Result<&MapObject, MapError> {
        let missing = || MapError::MissingObject {
            layer: layer.to_string(),
            name: name.to_string(),
        };
        self.object_groups
            .iter()
            .find(|g| g.name == layer)
            .ok_or_else(missing)?
            .objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(missing)
    }

    /// Tileset owning a gid (the one with the highest first gid not above it)
    pub fn tileset_for(&self, gid: u32) -> Option<&Tileset> {
        if gid == 0 {
            return None;
        }
        self.tilesets.iter().rev().find(|ts| ts.first_gid <= gid)
    }

    /// Property of the tile behind a gid
    pub fn tile_property(&self, gid: u32, name: &str) -> Option<&Value> {
        let ts = self.tileset_for(gid)?;
        ts.property(gid - ts.first_gid, name)
    }

    /// Pixel rectangle of a tile cell
    pub fn tile_rect(&self, tx: i32, ty: i32) -> Rect {
        Rect::new(
            tx as f32 * self.tile_width,
            ty as f32 * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Collision grid for `layer`: every tile whose `property` is `true` is solid
    pub fn collision_by_property(
        &self,
        layer: &str,
        property: &str,
    ) -> Result<CollisionLayer, MapError> {
        let tiles = self.layer(layer)?;
        let solid: Vec<bool> = tiles
            .data
            .iter()
            .map(|&gid| matches!(self.tile_property(gid, property), Some(Value::Bool(true))))
            .collect();
        log::debug!(
            "Layer '{}': {} colliding tiles",
            layer,
            solid.iter().filter(|s| **s).count()
        );
        Ok(CollisionLayer {
            width: tiles.width,
            height: tiles.height,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            solid,
        })
    }
}

/// Solid-tile grid derived from a tile layer
#[derive(Debug, Clone)]
pub struct CollisionLayer {
    pub width: u32,
    pub height: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    solid: Vec<bool>,
}

impl CollisionLayer {
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            return false;
        }
        self.solid[(ty as u32 * self.width + tx as u32) as usize]
    }

    pub fn tile_rect(&self, tx: i32, ty: i32) -> Rect {
        Rect::new(
            tx as f32 * self.tile_width,
            ty as f32 * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Inclusive tile coordinate range covered by a pixel rectangle
    pub fn tile_span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let x0 = (rect.left() / self.tile_width).floor() as i32;
        let y0 = (rect.top() / self.tile_height).floor() as i32;
        let x1 = (rect.right() / self.tile_width).floor() as i32;
        let y1 = (rect.bottom() / self.tile_height).floor() as i32;
        (x0, y0, x1, y1)
    }

    /// Solid tiles sharing area with `rect`
    pub fn solid_tiles_in(&self, rect: &Rect) -> Vec<Rect> {
        let (x0, y0, x1, y1) = self.tile_span(rect);
        let mut tiles = Vec::new();
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                if self.is_solid(tx, ty) {
                    let tile = self.tile_rect(tx, ty);
                    if tile.overlaps(rect) {
                        tiles.push(tile);
                    }
                }
            }
        }
        tiles
    }

    /// All solid cells (for the debug overlay)
    pub fn solid_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.solid.iter().enumerate().filter(|(_, s)| **s).map(|(i, _)| {
            let i = i as u32;
            ((i % self.width) as i32, (i / self.width) as i32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    #[test]
    fn test_parse_fixture_map() {
        let map = fixtures::town_map();
        assert_eq!(map.width, 40);
        assert_eq!(map.height, 20);
        assert_eq!(map.width_in_pixels(), 1280.0);
        assert_eq!(map.height_in_pixels(), 640.0);
        assert!(map.layer("World").is_ok());
        assert!(map.add_tileset("tuxmon-sample-32px-extruded").is_ok());
    }

    #[test]
    fn test_extruded_source_rects() {
        let map = fixtures::town_map();
        let ts = map.add_tileset("tuxmon-sample-32px-extruded").unwrap();
        assert_eq!(ts.source_rect(0), Some(Rect::new(1.0, 1.0, 32.0, 32.0)));
        assert_eq!(ts.source_rect(1), Some(Rect::new(35.0, 1.0, 32.0, 32.0)));
        assert_eq!(ts.source_rect(3), Some(Rect::new(35.0, 35.0, 32.0, 32.0)));
        assert_eq!(ts.source_rect(4), None);
    }

    #[test]
    fn test_columns_from_image_width() {
        let json = serde_json::json!({
            "width": 1, "height": 1, "tilewidth": 32, "tileheight": 32,
            "layers": [{ "type": "tilelayer", "name": "Ground", "width": 1, "height": 1, "data": [1] }],
            "tilesets": [{
                "name": "sheet", "firstgid": 1, "tilecount": 6,
                "margin": 1, "spacing": 2, "imagewidth": 102, "imageheight": 68
            }]
        });
        let map = TileMap::from_json(&json.to_string()).unwrap();
        let ts = map.add_tileset("sheet").unwrap();
        assert_eq!(ts.columns, 3);
        assert_eq!((ts.tile_width, ts.tile_height), (32, 32));
        assert_eq!(ts.source_rect(5), Some(Rect::new(69.0, 35.0, 32.0, 32.0)));
    }

    #[test]
    fn test_find_spawn_point() {
        let map = fixtures::town_map();
        let spawn = map.find_object("Objects", "Spawn Point").unwrap();
        assert_eq!((spawn.x, spawn.y), (600.0, 346.0));
    }

    #[test]
    fn test_missing_layer_and_object() {
        let map = fixtures::town_map();
        assert!(matches!(map.layer("Sky"), Err(MapError::MissingLayer(_))));
        assert!(matches!(
            map.find_object("Objects", "Exit"),
            Err(MapError::MissingObject { .. })
        ));
        assert!(matches!(
            map.find_object("Markers", "Spawn Point"),
            Err(MapError::MissingObject { .. })
        ));
        assert!(matches!(
            map.add_tileset("other"),
            Err(MapError::MissingTileset(_))
        ));
    }

    #[test]
    fn test_collision_by_property() {
        let map = fixtures::town_map();
        let collision = map.collision_by_property("World", "collides").unwrap();
        // Wall column at tx = 5
        assert!(collision.is_solid(5, 0));
        assert!(collision.is_solid(5, 19));
        assert!(!collision.is_solid(6, 10));
        // Decorative tile without the property
        assert!(!collision.is_solid(20, 2));
        // Out of range is open
        assert!(!collision.is_solid(-1, 0));
        assert!(!collision.is_solid(40, 0));
        assert_eq!(collision.solid_cells().count(), 20);
    }

    #[test]
    fn test_legacy_tileproperties() {
        let json = serde_json::json!({
            "width": 2, "height": 1, "tilewidth": 16, "tileheight": 16,
            "orientation": "orthogonal",
            "layers": [
                { "type": "tilelayer", "name": "World", "width": 2, "height": 1, "data": [1, 2] }
            ],
            "tilesets": [{
                "name": "old", "firstgid": 1, "tilecount": 2, "columns": 2,
                "tileproperties": { "1": { "collides": true } }
            }]
        })
        .to_string();
        let map = TileMap::from_json(&json).unwrap();
        let collision = map.collision_by_property("World", "collides").unwrap();
        assert!(!collision.is_solid(0, 0));
        assert!(collision.is_solid(1, 0));
    }

    #[test]
    fn test_flip_flags_are_masked() {
        let json = serde_json::json!({
            "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "type": "tilelayer", "name": "World", "width": 1, "height": 1,
                  "data": [0x8000_0001u32] }
            ],
            "tilesets": [{
                "name": "t", "firstgid": 1,
                "tiles": [{ "id": 0, "properties": [
                    { "name": "collides", "type": "bool", "value": true }
                ]}]
            }]
        })
        .to_string();
        let map = TileMap::from_json(&json).unwrap();
        assert_eq!(map.layer("World").unwrap().gid_at(0, 0), 1);
        let collision = map.collision_by_property("World", "collides").unwrap();
        assert!(collision.is_solid(0, 0));
    }

    #[test]
    fn test_layer_size_mismatch() {
        let json = serde_json::json!({
            "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "type": "tilelayer", "name": "World", "width": 2, "height": 2, "data": [1, 2, 3] }
            ]
        })
        .to_string();
        assert!(matches!(
            TileMap::from_json(&json),
            Err(MapError::LayerSize { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_isometric_and_garbage() {
        let json = serde_json::json!({
            "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
            "orientation": "isometric", "layers": []
        })
        .to_string();
        assert!(matches!(
            TileMap::from_json(&json),
            Err(MapError::UnsupportedOrientation(_))
        ));
        assert!(matches!(TileMap::from_json("{"), Err(MapError::Json(_))));
    }

    #[test]
    fn test_solid_tiles_in_rect() {
        let map = fixtures::town_map();
        let collision = map.collision_by_property("World", "collides").unwrap();
        // Straddles the wall column (160..192) across two rows
        let hits = collision.solid_tiles_in(&Rect::new(150.0, 20.0, 20.0, 30.0));
        assert_eq!(hits.len(), 2);
        // Touching the wall face is not an overlap
        let hits = collision.solid_tiles_in(&Rect::new(192.0, 40.0, 20.0, 20.0));
        assert!(hits.is_empty());
    }
}
