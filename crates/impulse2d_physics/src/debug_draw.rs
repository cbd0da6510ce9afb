//! Debug drawing of bodies and contacts
//!
//! The world only knows how to emit primitives; anything able to draw a
//! line segment can render it by implementing [`DebugRenderer`].

use impulse2d_math::{Mat2, Vec2};

/// Half-size of the marker drawn for a point
pub const POINT_MARKER_HALF_SIZE: f32 = 0.05;

/// Segments used to approximate a circle outline
pub const CIRCLE_SEGMENTS: usize = 32;

/// Sink for debug geometry
///
/// Only [`DebugRenderer::draw_line`] is required; the other primitives are
/// built from lines unless a renderer has something better.
pub trait DebugRenderer {
    /// Draw a segment between two world-space points
    fn draw_line(&mut self, from: Vec2, to: Vec2);

    /// Draw a small hollow square centered on `point`
    fn draw_point(&mut self, point: Vec2) {
        let h = POINT_MARKER_HALF_SIZE;
        let corners = [
            point + Vec2::new(-h, -h),
            point + Vec2::new(h, -h),
            point + Vec2::new(h, h),
            point + Vec2::new(-h, h),
        ];
        draw_loop(self, &corners);
    }

    /// Draw the outline of a box of full `size` rotated by `rotation` radians
    fn draw_box(&mut self, center: Vec2, size: Vec2, rotation: f32) {
        let h = size * 0.5;
        let rot = Mat2::from_angle(rotation);
        let corners = [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|local| center + rot * local);
        draw_loop(self, &corners);
    }

    /// Draw a circle outline plus a radius line showing its rotation
    fn draw_circle(&mut self, center: Vec2, radius: f32, rotation: f32) {
        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        let mut previous = center + Vec2::new(radius, 0.0);
        for i in 1..=CIRCLE_SEGMENTS {
            let angle = step * i as f32;
            let next = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            self.draw_line(previous, next);
            previous = next;
        }

        let spoke = Mat2::from_angle(rotation) * Vec2::new(radius, 0.0);
        self.draw_line(center, center + spoke);
    }
}

fn draw_loop<R: DebugRenderer + ?Sized>(renderer: &mut R, points: &[Vec2]) {
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        renderer.draw_line(from, to);
    }
}

/// Collects debug lines as a flat line list (two vertices per segment)
///
/// The vertex buffer can be handed to a GPU as-is through [`LineBatch::as_bytes`].
#[derive(Clone, Debug, Default)]
pub struct LineBatch {
    vertices: Vec<Vec2>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments collected
    pub fn line_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Segment endpoints, two per line
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Iterate over the collected segments
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.vertices.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Raw vertex data (tightly packed `[f32; 2]` pairs)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Discard all collected lines, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

impl DebugRenderer for LineBatch {
    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.vertices.push(from);
        self.vertices.push(to);
    }
}
