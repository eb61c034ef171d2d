//! WebGPU rendering module
//!
//! Tile layers sample the map's tileset image, the player samples the
//! sprite atlas, and the debug overlay is drawn in flat colors. The frame
//! is assembled on the CPU as a [`DrawList`] and drawn one batch per texture.

pub mod atlas;
pub mod draw;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex;

pub use atlas::{AtlasError, AtlasFrame, SpriteAtlas};
pub use draw::{DrawList, TextureSlot};
pub use pipeline::{RenderError, RenderState, SceneImages, prepare_vertices, world_to_ndc};
pub use scene::scene_draw_list;
pub use texture::{DecodedImage, decode_png};
pub use vertex::Vertex;
