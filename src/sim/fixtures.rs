//! Small in-memory town used by the simulation tests
//!
//! 40x20 tiles of 32px. A solid wall fills column 5, the spawn point sits
//! left of the tree zone at (600, 346). The tileset is a 2x2 extruded
//! sheet (1px margin, 2px spacing).

use serde_json::json;

use super::tilemap::TileMap;
use crate::SceneConfig;

pub const WIDTH: u32 = 40;
pub const HEIGHT: u32 = 20;
pub const WALL_COLUMN: u32 = 5;

pub fn town_json() -> String {
    let cells = (WIDTH * HEIGHT) as usize;
    let below = vec![1u32; cells];

    let mut world = vec![0u32; cells];
    for ty in 0..HEIGHT {
        world[(ty * WIDTH + WALL_COLUMN) as usize] = 2;
    }
    // Decorative tile whose property is false
    world[(2 * WIDTH + 20) as usize] = 3;

    let mut above = vec![0u32; cells];
    above[(3 * WIDTH + 12) as usize] = 4;

    json!({
        "width": WIDTH,
        "height": HEIGHT,
        "tilewidth": 32,
        "tileheight": 32,
        "orientation": "orthogonal",
        "infinite": false,
        "layers": [
            { "type": "tilelayer", "name": "Below Player", "width": WIDTH, "height": HEIGHT, "data": below },
            { "type": "tilelayer", "name": "World", "width": WIDTH, "height": HEIGHT, "data": world },
            { "type": "tilelayer", "name": "Above Player", "width": WIDTH, "height": HEIGHT, "data": above },
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "id": 1, "name": "Spawn Point", "x": 600.0, "y": 346.0, "point": true }
            ]}
        ],
        "tilesets": [{
            "name": "tuxmon-sample-32px-extruded",
            "firstgid": 1,
            "tilecount": 4,
            "columns": 2,
            "tilewidth": 32,
            "tileheight": 32,
            "margin": 1,
            "spacing": 2,
            "image": "../tilesets/tuxmon-sample-32px-extruded.png",
            "imagewidth": 68,
            "imageheight": 68,
            "tiles": [
                { "id": 1, "properties": [{ "name": "collides", "type": "bool", "value": true }] },
                { "id": 2, "properties": [{ "name": "collides", "type": "bool", "value": false }] }
            ]
        }]
    })
    .to_string()
}

pub fn town_map() -> TileMap {
    TileMap::from_json(&town_json()).expect("fixture map parses")
}

pub fn config() -> SceneConfig {
    SceneConfig::default()
}
