//! Collision shapes for 2D physics
//!
//! Shapes are described in the local frame of the body that owns them.
//! The body supplies position and rotation when a query needs world space.

use crate::error::PhysicsError;
use impulse2d_math::{Mat2, Vec2};

/// Vertices closer than this to the deepest one along a direction are
/// treated as a single flat feature by [`BoxShape::support_feature`].
pub const FEATURE_TOLERANCE: f32 = 1.0e-3;

/// A circle defined by its radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    /// Moment of inertia for the given mass
    pub fn compute_inertia(&self, mass: f32) -> f32 {
        mass * (self.radius * self.radius) / 4.0
    }
}

/// A box defined by its full width and height, axis-aligned in local space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub size: Vec2,
}

impl BoxShape {
    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Moment of inertia for the given mass
    pub fn compute_inertia(&self, mass: f32) -> f32 {
        mass * (self.size.x * self.size.x + self.size.y * self.size.y) / 12.0
    }

    /// Corners in world space, counter-clockwise starting at local (-x, -y)
    pub fn vertices(&self, position: Vec2, rotation: Mat2) -> [Vec2; 4] {
        let h = self.half_extents();
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|local| position + rotation * local)
    }

    /// The vertex furthest along `direction` (support mapping)
    ///
    /// When `direction` is perpendicular to a face, the vertex on the
    /// positive side of each local axis is returned.
    pub fn support(&self, position: Vec2, rotation: Mat2, direction: Vec2) -> Vec2 {
        let h = self.half_extents();
        let local_dir = rotation.transform_transposed(direction);
        let local = Vec2::new(
            if local_dir.x >= 0.0 { h.x } else { -h.x },
            if local_dir.y >= 0.0 { h.y } else { -h.y },
        );
        position + rotation * local
    }

    /// Representative point of the feature furthest along `direction`
    ///
    /// Returns the supporting vertex, or the midpoint of the supporting
    /// edge when both of its vertices are within [`FEATURE_TOLERANCE`] of
    /// each other along `direction`.
    pub fn support_feature(&self, position: Vec2, rotation: Mat2, direction: Vec2) -> Vec2 {
        let vertices = self.vertices(position, rotation);
        let deepest = vertices
            .iter()
            .map(|v| v.dot(direction))
            .fold(f32::NEG_INFINITY, f32::max);

        let mut sum = Vec2::ZERO;
        let mut count = 0.0;
        for v in vertices {
            if v.dot(direction) >= deepest - FEATURE_TOLERANCE {
                sum += v;
                count += 1.0;
            }
        }

        if count > 0.0 {
            sum / count
        } else {
            // Only reachable with non-finite input
            self.support(position, rotation, direction)
        }
    }
}

/// An infinite half-space bounded by a line
///
/// The plane equation is: normal · point = offset.
/// Points with normal · point > offset are outside (on the normal side).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing out of the solid half-space
    pub normal: Vec2,
    /// Signed distance from origin along the normal
    pub offset: f32,
}

impl Plane {
    /// Create a new plane from a normal and offset
    ///
    /// The normal is normalized; a zero or non-finite normal is rejected.
    pub fn new(normal: Vec2, offset: f32) -> Result<Self, PhysicsError> {
        if !offset.is_finite() {
            return Err(PhysicsError::InvalidNormal);
        }
        let normal = normal.try_normalized().ok_or(PhysicsError::InvalidNormal)?;
        Ok(Self { normal, offset })
    }

    /// Express this plane in world space for a body at `position`/`rotation`
    pub fn to_world(&self, position: Vec2, rotation: Mat2) -> Self {
        let normal = rotation * self.normal;
        Self {
            normal,
            offset: self.offset + normal.dot(position),
        }
    }

    /// Calculate the signed distance from a point to the plane
    ///
    /// Positive = outside (on normal side), negative = inside the half-space
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        self.normal.dot(point) - self.offset
    }

    /// Project a point onto the plane
    pub fn project_point(&self, point: Vec2) -> Vec2 {
        point - self.normal * self.signed_distance(point)
    }
}

/// Discriminant of a [`Shape`], for callers that only need the variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Circle,
    Box,
    Plane,
}

/// Geometric description of a rigid body
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Box(BoxShape),
    Plane(Plane),
}

impl Shape {
    /// Create a circle shape
    pub fn circle(radius: f32) -> Result<Self, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        Ok(Shape::Circle(Circle { radius }))
    }

    /// Create a box shape from its full width and height
    pub fn rect(width: f32, height: f32) -> Result<Self, PhysicsError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            return Err(PhysicsError::InvalidSize { width, height });
        }
        Ok(Shape::Box(BoxShape {
            size: Vec2::new(width, height),
        }))
    }

    /// Create a plane shape; see [`Plane::new`]
    pub fn plane(normal: Vec2, offset: f32) -> Result<Self, PhysicsError> {
        Plane::new(normal, offset).map(Shape::Plane)
    }

    /// Get the variant of this shape
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Box(_) => ShapeType::Box,
            Shape::Plane(_) => ShapeType::Plane,
        }
    }

    /// Compute the moment of inertia for the shape, given mass
    ///
    /// Planes have no finite inertia and always report `f32::INFINITY`.
    pub fn compute_inertia(&self, mass: f32) -> f32 {
        match self {
            Shape::Circle(c) => c.compute_inertia(mass),
            Shape::Box(b) => b.compute_inertia(mass),
            Shape::Plane(_) => f32::INFINITY,
        }
    }

    /// Whether this shape may only be attached to static bodies
    pub fn requires_infinite_mass(&self) -> bool {
        matches!(self, Shape::Plane(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_circle_inertia() {
        let shape = Shape::circle(2.0).unwrap();
        // m * r^2 / 4 = 3 * 4 / 4
        assert!((shape.compute_inertia(3.0) - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_box_inertia() {
        let shape = Shape::rect(2.0, 4.0).unwrap();
        // m * (w^2 + h^2) / 12 = 6 * 20 / 12
        assert!((shape.compute_inertia(6.0) - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_plane_inertia_is_infinite() {
        let shape = Shape::plane(Vec2::Y, 0.0).unwrap();
        assert!(shape.compute_inertia(1.0).is_infinite());
        assert!(shape.requires_infinite_mass());
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert_eq!(Shape::circle(0.0), Err(PhysicsError::InvalidRadius(0.0)));
        assert!(Shape::circle(-1.0).is_err());
        assert!(Shape::circle(f32::NAN).is_err());
        assert!(Shape::rect(1.0, 0.0).is_err());
        assert!(Shape::rect(f32::INFINITY, 1.0).is_err());
        assert_eq!(Shape::plane(Vec2::ZERO, 1.0), Err(PhysicsError::InvalidNormal));
    }

    #[test]
    fn test_plane_normal_is_normalized() {
        let plane = Plane::new(Vec2::new(0.0, 5.0), 2.0).unwrap();
        assert_eq!(plane.normal, Vec2::Y);
        assert_eq!(plane.offset, 2.0);
    }

    #[test]
    fn test_plane_signed_distance() {
        let floor = Plane::new(Vec2::Y, 1.0).unwrap();
        assert!((floor.signed_distance(Vec2::new(3.0, 4.0)) - 3.0).abs() < EPSILON);
        assert!((floor.signed_distance(Vec2::new(0.0, 0.0)) + 1.0).abs() < EPSILON);
        assert_eq!(floor.project_point(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 1.0));
    }

    #[test]
    fn test_plane_to_world() {
        let plane = Plane::new(Vec2::Y, 0.0).unwrap();
        let world = plane.to_world(Vec2::new(5.0, 2.0), Mat2::IDENTITY);
        assert_eq!(world.normal, Vec2::Y);
        assert!((world.offset - 2.0).abs() < EPSILON);

        // Rotating a quarter turn makes the floor a wall facing -X
        let wall = plane.to_world(Vec2::ZERO, Mat2::from_angle(std::f32::consts::FRAC_PI_2));
        assert!((wall.normal - (-Vec2::X)).length() < EPSILON);
    }

    #[test]
    fn test_box_vertices_and_support() {
        let b = BoxShape { size: Vec2::new(2.0, 1.0) };
        let verts = b.vertices(Vec2::new(1.0, 1.0), Mat2::IDENTITY);
        assert_eq!(verts[0], Vec2::new(0.0, 0.5));
        assert_eq!(verts[2], Vec2::new(2.0, 1.5));

        let s = b.support(Vec2::ZERO, Mat2::IDENTITY, Vec2::new(-1.0, -0.2));
        assert_eq!(s, Vec2::new(-1.0, -0.5));
    }

    #[test]
    fn test_support_feature_flat_face_uses_midpoint() {
        let b = BoxShape { size: Vec2::new(2.0, 2.0) };
        let p = b.support_feature(Vec2::ZERO, Mat2::IDENTITY, -Vec2::Y);
        assert!((p - Vec2::new(0.0, -1.0)).length() < EPSILON);

        // Tilted enough that a single corner is deepest
        let rot = Mat2::from_angle(0.3);
        let p = b.support_feature(Vec2::ZERO, rot, -Vec2::Y);
        assert_eq!(p, b.support(Vec2::ZERO, rot, -Vec2::Y));
    }
}
