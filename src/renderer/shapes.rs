//! Shape generation for 2D primitives (world coordinates)

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect` in a flat color
pub fn fill_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    out.extend_from_slice(&[
        Vertex::solid(l, t, color),
        Vertex::solid(r, t, color),
        Vertex::solid(l, b, color),
        Vertex::solid(l, b, color),
        Vertex::solid(r, t, color),
        Vertex::solid(r, b, color),
    ]);
}

/// Copy the `source` texels of an image onto `dest`
pub fn image_rect(out: &mut Vec<Vertex>, dest: &Rect, source: &Rect, tint: [f32; 4]) {
    let (l, t, r, b) = (dest.left(), dest.top(), dest.right(), dest.bottom());
    let (u0, v0, u1, v1) = (source.left(), source.top(), source.right(), source.bottom());
    out.extend_from_slice(&[
        Vertex::new(l, t, [u0, v0], tint),
        Vertex::new(r, t, [u1, v0], tint),
        Vertex::new(l, b, [u0, v1], tint),
        Vertex::new(l, b, [u0, v1], tint),
        Vertex::new(r, t, [u1, v0], tint),
        Vertex::new(r, b, [u1, v1], tint),
    ]);
}

/// Rectangle border `thickness` wide, drawn inside `rect`
pub fn stroke_rect(out: &mut Vec<Vertex>, rect: &Rect, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(rect.w / 2.0).min(rect.h / 2.0);
    let inner_h = rect.h - 2.0 * t;
    fill_rect(out, &Rect::new(rect.x, rect.y, rect.w, t), color);
    fill_rect(out, &Rect::new(rect.x, rect.bottom() - t, rect.w, t), color);
    fill_rect(out, &Rect::new(rect.x, rect.y + t, t, inner_h), color);
    fill_rect(out, &Rect::new(rect.right() - t, rect.y + t, t, inner_h), color);
}

/// Which side of a rectangle an edge lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Single edge of `rect`, `thickness` wide, inside the rectangle
pub fn edge(out: &mut Vec<Vertex>, rect: &Rect, side: Side, thickness: f32, color: [f32; 4]) {
    let band = match side {
        Side::Left => Rect::new(rect.x, rect.y, thickness, rect.h),
        Side::Right => Rect::new(rect.right() - thickness, rect.y, thickness, rect.h),
        Side::Top => Rect::new(rect.x, rect.y, rect.w, thickness),
        Side::Bottom => Rect::new(rect.x, rect.bottom() - thickness, rect.w, thickness),
    };
    fill_rect(out, &band, color);
}
