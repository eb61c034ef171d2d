//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinates and a tint.
/// `uv` is in texel units until the renderer normalizes it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv,
            color,
        }
    }

    /// Flat color: samples the middle of the 1x1 white texture
    pub const fn solid(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new(x, y, [0.5, 0.5], color)
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    /// Clear color behind the map
    pub const BACKGROUND: [f32; 4] = [0.05, 0.06, 0.05, 1.0];

    /// No tint
    pub const WHITE: [f32; 4] = [1.0; 4];

    /// Debug overlay (colliding tiles, their open faces, bodies)
    pub const DEBUG_COLLIDING: [f32; 4] = rgba8(243, 134, 48, 0.75);
    pub const DEBUG_FACE: [f32; 4] = rgba8(40, 39, 37, 0.75);
    pub const DEBUG_BODY: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const DEBUG_ZONE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
    }
}
