//! Lyon-based 2D painter.
//!
//! Widgets issue drawing commands in CSS pixels. The painter applies the
//! surface's pixel ratio once (set per layout) and tessellates everything
//! into a flat triangle list the host uploads as-is.
//!
//! ```ignore
//! ctx.painter.fill_rect(DVec2::ZERO, 300.0, 200.0, palette.get(Token::Felt));
//! ctx.painter.fill_circle(body.pos, body.radius, palette.get(Token::Body));
//! ctx.painter.stroke_polyline(&[a, b], 2.0, palette.get(Token::Cue));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::bridge::protocol::VERTEX_FLOATS;
use crate::theme::Color;

/// Per-vertex data: backing-store pixel position plus RGBA.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PaintVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl PaintVertex {
    pub const FLOATS: usize = VERTEX_FLOATS;

    fn at(x: f32, y: f32, scale: f32, color: Color) -> Self {
        Self {
            x: x * scale,
            y: y * scale,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

struct FillCtor {
    color: Color,
    scale: f32,
}

impl FillVertexConstructor<PaintVertex> for FillCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> PaintVertex {
        let p = vertex.position();
        PaintVertex::at(p.x, p.y, self.scale, self.color)
    }
}

struct StrokeCtor {
    color: Color,
    scale: f32,
}

impl StrokeVertexConstructor<PaintVertex> for StrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> PaintVertex {
        let p = vertex.position();
        PaintVertex::at(p.x, p.y, self.scale, self.color)
    }
}

fn to_point(p: DVec2) -> lyon::math::Point {
    point(p.x as f32, p.y as f32)
}

fn all_finite(points: &[DVec2]) -> bool {
    points.iter().all(|p| p.is_finite())
}

/// Tessellators plus the output vertex buffer for one surface.
/// Cleared at the start of every render pass.
pub struct Painter {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<PaintVertex, u32>,
    buffer: Vec<f32>,
    scale: f32,
}

impl Painter {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(8192 * PaintVertex::FLOATS),
            scale: 1.0,
        }
    }

    /// Uniform CSS-pixel to backing-pixel scale. Set once per layout.
    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.scale = if ratio.is_finite() && ratio > 0.0 {
            ratio as f32
        } else {
            1.0
        };
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / PaintVertex::FLOATS
    }

    /// Flat `[x, y, r, g, b, a]` triangle list.
    pub fn vertices(&self) -> &[f32] {
        &self.buffer
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer
                .extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(v)));
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn polyline_path(points: &[DVec2], closed: bool) -> Path {
        let mut builder = Path::builder();
        builder.begin(to_point(points[0]));
        for p in &points[1..] {
            builder.line_to(to_point(*p));
        }
        if closed {
            builder.close();
        } else {
            builder.end(false);
        }
        builder.build()
    }

    /// Fill a closed polygon (convex or concave).
    pub fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        if points.len() < 3 || !all_finite(points) {
            return;
        }
        let path = Self::polyline_path(points, true);
        self.fill_path(&path, color);
    }

    pub fn fill_rect(&mut self, pos: DVec2, width: f64, height: f64, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let points = [
            pos,
            DVec2::new(pos.x + width, pos.y),
            DVec2::new(pos.x + width, pos.y + height),
            DVec2::new(pos.x, pos.y + height),
        ];
        self.fill_polygon(&points, color);
    }

    pub fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(to_point(center), radius as f32, lyon::path::Winding::Positive);
        let path = builder.build();
        self.fill_path(&path, color);
    }

    pub fn fill_path(&mut self, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.25),
            &mut BuffersBuilder::new(&mut self.geometry, FillCtor { color, scale: self.scale }),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("paint: fill tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Stroke an open path through `points`.
    pub fn stroke_polyline(&mut self, points: &[DVec2], width: f64, color: Color) {
        if points.len() < 2 || !all_finite(points) {
            return;
        }
        let path = Self::polyline_path(points, false);
        self.stroke_path(&path, width, color);
    }

    pub fn stroke_circle(&mut self, center: DVec2, radius: f64, width: f64, color: Color) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(to_point(center), radius as f32, lyon::path::Winding::Positive);
        let path = builder.build();
        self.stroke_path(&path, width, color);
    }

    pub fn stroke_path(&mut self, path: &Path, width: f64, color: Color) {
        if !(width > 0.0) {
            return;
        }
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.25).with_line_width(width as f32),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeCtor { color, scale: self.scale }),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("paint: stroke tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn paint_vertex_matches_frame_layout() {
        assert_eq!(size_of::<PaintVertex>(), 24);
        assert_eq!(size_of::<PaintVertex>(), VERTEX_FLOATS * size_of::<f32>());
    }

    #[test]
    fn triangle_is_three_vertices() {
        let mut painter = Painter::new();
        painter.fill_polygon(
            &[DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0), DVec2::new(50.0, 100.0)],
            Color::WHITE,
        );
        assert_eq!(painter.vertex_count(), 3);
    }

    #[test]
    fn rect_is_two_triangles() {
        let mut painter = Painter::new();
        painter.fill_rect(DVec2::ZERO, 100.0, 50.0, Color::BLACK);
        assert_eq!(painter.vertex_count(), 6);
    }

    #[test]
    fn pixel_ratio_scales_output() {
        let mut painter = Painter::new();
        painter.set_pixel_ratio(2.0);
        painter.fill_rect(DVec2::ZERO, 10.0, 10.0, Color::BLACK);
        let max_x = painter
            .vertices()
            .chunks(PaintVertex::FLOATS)
            .map(|v| v[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 20.0);
    }

    #[test]
    fn circle_and_stroke_produce_vertices() {
        let mut painter = Painter::new();
        painter.fill_circle(DVec2::new(50.0, 50.0), 10.0, Color::WHITE);
        let after_fill = painter.vertex_count();
        assert!(after_fill > 0);
        painter.stroke_polyline(&[DVec2::ZERO, DVec2::new(10.0, 10.0)], 2.0, Color::WHITE);
        assert!(painter.vertex_count() > after_fill);
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut painter = Painter::new();
        painter.fill_polygon(&[DVec2::ZERO, DVec2::ONE], Color::WHITE);
        painter.fill_circle(DVec2::ZERO, 0.0, Color::WHITE);
        painter.fill_circle(DVec2::ZERO, f64::NAN, Color::WHITE);
        painter.fill_rect(DVec2::ZERO, -1.0, 5.0, Color::WHITE);
        painter.stroke_polyline(&[DVec2::ZERO, DVec2::new(f64::NAN, 0.0)], 1.0, Color::WHITE);
        painter.stroke_polyline(&[DVec2::ZERO, DVec2::ONE], 0.0, Color::WHITE);
        assert_eq!(painter.vertex_count(), 0);
    }

    #[test]
    fn clear_resets_buffer() {
        let mut painter = Painter::new();
        painter.fill_rect(DVec2::ZERO, 10.0, 10.0, Color::WHITE);
        painter.clear();
        assert_eq!(painter.vertex_count(), 0);
    }
}
