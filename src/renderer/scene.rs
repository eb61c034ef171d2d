//! Per-frame draw list for the scene
//!
//! Draw order: `Below Player`, `World`, the player, `Above Player`, then
//! the debug overlay. Only tiles inside the camera view are emitted.

use super::atlas::SpriteAtlas;
use super::draw::{DrawList, TextureSlot};
use super::shapes::{Side, edge, fill_rect, image_rect, stroke_rect};
use super::vertex::{Vertex, colors};
use crate::consts::{ABOVE_LAYER, BELOW_LAYER, WORLD_LAYER};
use crate::sim::anim::keys;
use crate::sim::{CollisionLayer, Rect, SceneState};

/// Build everything drawn this frame, in world coordinates
pub fn scene_draw_list(state: &SceneState, atlas: &SpriteAtlas) -> DrawList {
    let view = state.camera.view();
    let mut list = DrawList::new();

    for name in [BELOW_LAYER, WORLD_LAYER] {
        push_layer(&mut list, state, name, &view);
    }
    push_player(&mut list, state, atlas);
    push_layer(&mut list, state, ABOVE_LAYER, &view);

    if state.debug_mode {
        let out = list.batch(TextureSlot::Solid);
        push_collision_debug(out, &state.collision, &view);
        stroke_rect(out, &state.player.body(), 1.0, colors::DEBUG_BODY);
        stroke_rect(out, &state.tree_zone.rect, 1.0, colors::DEBUG_ZONE);
    }

    list
}

/// Tiles of a layer that intersect the view. Tiles from other tilesets
/// than the scene's are skipped: only that image is loaded.
fn push_layer(list: &mut DrawList, state: &SceneState, name: &str, view: &Rect) {
    let map = &state.map;
    let Ok(layer) = map.layer(name) else {
        return;
    };
    if !layer.visible {
        return;
    }
    let (x0, y0, x1, y1) = tile_range(map.tile_width, map.tile_height, view);
    for ty in y0.max(0)..=y1.min(layer.height as i32 - 1) {
        for tx in x0.max(0)..=x1.min(layer.width as i32 - 1) {
            let gid = layer.gid_at(tx, ty);
            let Some(tileset) = map.tileset_for(gid) else {
                continue;
            };
            if tileset.name != state.config.tileset {
                continue;
            }
            if let Some(source) = tileset.source_rect(gid - tileset.first_gid) {
                let out = list.batch(TextureSlot::Tiles);
                image_rect(out, &map.tile_rect(tx, ty), &source, colors::WHITE);
            }
        }
    }
}

fn tile_range(tile_w: f32, tile_h: f32, view: &Rect) -> (i32, i32, i32, i32) {
    (
        (view.left() / tile_w).floor() as i32,
        (view.top() / tile_h).floor() as i32,
        (view.right() / tile_w).floor() as i32,
        (view.bottom() / tile_h).floor() as i32,
    )
}

/// Current animation frame, or the standing frame when the atlas lacks it
fn push_player(list: &mut DrawList, state: &SceneState, atlas: &SpriteAtlas) {
    let player = &state.player;
    let name = player.anim.current_frame(&state.animations);
    let Some(frame) = atlas.frame(name).or_else(|| atlas.frame(keys::IDLE_FRAME)) else {
        return;
    };
    let dest = frame.placed_at(player.pos);
    image_rect(
        list.batch(TextureSlot::Sprites),
        &dest,
        &frame.source,
        colors::WHITE,
    );
}

/// Colliding tiles plus the faces that border open space
fn push_collision_debug(out: &mut Vec<Vertex>, collision: &CollisionLayer, view: &Rect) {
    let (x0, y0, x1, y1) = tile_range(collision.tile_width, collision.tile_height, view);
    for ty in y0..=y1 {
        for tx in x0..=x1 {
            if !collision.is_solid(tx, ty) {
                continue;
            }
            let tile = collision.tile_rect(tx, ty);
            fill_rect(out, &tile, colors::DEBUG_COLLIDING);
            for (dx, dy, side) in [
                (-1, 0, Side::Left),
                (1, 0, Side::Right),
                (0, -1, Side::Top),
                (0, 1, Side::Bottom),
            ] {
                if !collision.is_solid(tx + dx, ty + dy) {
                    edge(out, &tile, side, 2.0, colors::DEBUG_FACE);
                }
            }
        }
    }
}
