//! Narrow-phase collision detection for 2D shapes
//!
//! Every test reports at most one contact point. The contact convention is
//! the same for all of them:
//! - `normal` points away from the second shape toward the first
//! - `position` lies on the surface of the first shape
//! - `distance` is negative when the shapes overlap
//!
//! Only one argument order is implemented per shape pairing; [`collide`]
//! swaps the bodies and mirrors the result for the other order.

use crate::body::RigidBody;
use crate::shapes::{BoxShape, Circle, Plane, Shape};
use impulse2d_math::{Mat2, Vec2};

/// Normal used when two circle centers coincide
const FALLBACK_NORMAL: Vec2 = Vec2::Y;

/// A single contact between two bodies, plus solver scratch data
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactInfo {
    /// World position of the contact point
    pub position: Vec2,
    /// Unit normal pointing away from the second body
    pub normal: Vec2,
    /// Lever arm from the first body's center to the contact point
    pub r1: Vec2,
    /// Lever arm from the second body's center to the contact point
    pub r2: Vec2,
    /// Signed separation at the contact (negative for overlap)
    pub distance: f32,
    /// Accumulated impulse along the normal
    pub impulse_normal: f32,
    /// Effective combined mass along the normal
    pub mass_normal: f32,
    /// Target velocity to push out penetration beyond the slop
    pub position_bias: f32,
}

impl ContactInfo {
    /// Create a new contact with empty solver data
    pub fn new(position: Vec2, normal: Vec2, distance: f32) -> Self {
        Self {
            position,
            normal,
            distance,
            ..Default::default()
        }
    }

    /// Overlap depth (zero when the shapes only touch)
    pub fn penetration(&self) -> f32 {
        (-self.distance).max(0.0)
    }

    /// Describe the same contact from the other body's point of view
    ///
    /// The point moves across the overlap onto the other surface and the
    /// normal flips.
    pub fn mirrored(self) -> Self {
        Self {
            position: self.position + self.normal * -self.distance,
            normal: -self.normal,
            ..self
        }
    }
}

/// Test two bodies for contact
///
/// Returns `None` when the shapes are separated. `collide(a, b)` and
/// `collide(b, a)` describe the same contact with opposite normals.
pub fn collide(body1: &RigidBody, body2: &RigidBody) -> Option<ContactInfo> {
    match (body1.shape(), body2.shape()) {
        (Shape::Circle(a), Shape::Circle(b)) => {
            circle_vs_circle(a, body1.position, b, body2.position)
        }
        (Shape::Circle(circle), Shape::Box(rect)) => {
            circle_vs_box(circle, body1.position, rect, body2.position, body2.rotation_matrix())
        }
        (Shape::Box(a), Shape::Box(b)) => box_vs_box(
            a,
            body1.position,
            body1.rotation_matrix(),
            b,
            body2.position,
            body2.rotation_matrix(),
        ),
        (Shape::Circle(circle), Shape::Plane(plane)) => {
            let plane = plane.to_world(body2.position, body2.rotation_matrix());
            circle_vs_plane(circle, body1.position, &plane)
        }
        (Shape::Box(rect), Shape::Plane(plane)) => {
            let plane = plane.to_world(body2.position, body2.rotation_matrix());
            box_vs_plane(rect, body1.position, body1.rotation_matrix(), &plane)
        }
        // Two half-spaces never produce a usable contact
        (Shape::Plane(_), Shape::Plane(_)) => None,
        (Shape::Box(_), Shape::Circle(_))
        | (Shape::Plane(_), Shape::Circle(_))
        | (Shape::Plane(_), Shape::Box(_)) => collide(body2, body1).map(ContactInfo::mirrored),
    }
}

/// Test circle vs circle collision
///
/// Reports contact only while the center distance is below the radius sum.
pub fn circle_vs_circle(a: &Circle, center_a: Vec2, b: &Circle, center_b: Vec2) -> Option<ContactInfo> {
    let r = a.radius + b.radius;
    let to_a = center_a - center_b;
    let d2 = to_a.length_squared();

    if d2 >= r * r {
        return None;
    }

    let normal = to_a.normalized_or(FALLBACK_NORMAL);
    let point = center_a - normal * a.radius;

    Some(ContactInfo::new(point, normal, d2.sqrt() - r))
}

/// Test circle vs (possibly rotated) box collision
///
/// The circle is moved into the box's local frame, where the box is an
/// axis-aligned rectangle centered at the origin.
pub fn circle_vs_box(
    circle: &Circle,
    center: Vec2,
    rect: &BoxShape,
    box_position: Vec2,
    box_rotation: Mat2,
) -> Option<ContactInfo> {
    let local = box_rotation.transform_transposed(center - box_position);
    let h = rect.half_extents();

    let outside = local.x < -h.x || local.x > h.x || local.y < -h.y || local.y > h.y;

    let (local_normal, distance) = if outside {
        let closest = local.clamp_components(-h, h);
        let to_center = local - closest;
        let d2 = to_center.length_squared();

        if d2 >= circle.radius * circle.radius {
            return None;
        }

        // Strictly outside on at least one axis, so `to_center` is non-zero
        (to_center.normalized_or(FALLBACK_NORMAL), d2.sqrt() - circle.radius)
    } else {
        // Center is inside the box: escape through the nearest face.
        // Order: -X, +X, -Y, +Y; the first minimum wins.
        let faces = [
            (local.x + h.x, -Vec2::X),
            (h.x - local.x, Vec2::X),
            (local.y + h.y, -Vec2::Y),
            (h.y - local.y, Vec2::Y),
        ];

        let mut nearest = faces[0];
        for face in &faces[1..] {
            if face.0 < nearest.0 {
                nearest = *face;
            }
        }

        (nearest.1, -(nearest.0 + circle.radius))
    };

    let normal = (box_rotation * local_normal).normalized_or(local_normal);
    let point = center - normal * circle.radius;

    Some(ContactInfo::new(point, normal, distance))
}

/// Test box vs box collision with the separating axis theorem
///
/// Candidate axes are the face normals of both boxes, each in both
/// directions. For every face, the other box's deepest vertex past that
/// face gives the penetration along the face normal; the contact point is
/// that box's supporting feature (a face midpoint when it lies flat). A negative
/// penetration on any axis separates the boxes; otherwise the face with the
/// least penetration becomes the contact. Ties keep the earliest axis:
/// first box before second, local X before Y, positive before negative.
pub fn box_vs_box(
    a: &BoxShape,
    position_a: Vec2,
    rotation_a: Mat2,
    b: &BoxShape,
    position_b: Vec2,
    rotation_b: Mat2,
) -> Option<ContactInfo> {
    let box_a = OrientedBox::new(a, position_a, rotation_a);
    let box_b = OrientedBox::new(b, position_b, rotation_b);

    let mut best: Option<FaceQuery> = None;

    for (reference, incident, reference_is_a) in [(&box_a, &box_b, true), (&box_b, &box_a, false)] {
        for (axis, half) in [
            (reference.rotation.col1, reference.half.x),
            (reference.rotation.col2, reference.half.y),
        ] {
            for sign in [1.0, -1.0] {
                let face_normal = axis * sign;
                let face_offset = face_normal.dot(reference.position) + half;
                let deepest = incident.support(-face_normal);
                let penetration = face_offset - face_normal.dot(deepest);

                if penetration < 0.0 {
                    return None;
                }

                if best.map_or(true, |q| penetration < q.penetration) {
                    best = Some(FaceQuery {
                        face_normal,
                        penetration,
                        vertex: incident.support_feature(-face_normal),
                        reference_is_a,
                    });
                }
            }
        }
    }

    let query = best?;
    let contact = if query.reference_is_a {
        // Vertex of B inside A: lift it onto A's face so the point is on A
        let point = query.vertex + query.face_normal * query.penetration;
        ContactInfo::new(point, -query.face_normal, -query.penetration)
    } else {
        // Vertex of A inside B: already on A's surface
        ContactInfo::new(query.vertex, query.face_normal, -query.penetration)
    };

    Some(contact)
}

/// Test circle vs plane collision
///
/// `plane` must already be in world space.
pub fn circle_vs_plane(circle: &Circle, center: Vec2, plane: &Plane) -> Option<ContactInfo> {
    let signed_dist = plane.signed_distance(center);

    if signed_dist >= circle.radius {
        return None;
    }

    let normal = plane.normal;
    let point = center - normal * circle.radius;

    Some(ContactInfo::new(point, normal, signed_dist - circle.radius))
}

/// Test box vs plane collision
///
/// The deepest vertex (or the midpoint of a face lying flat against the
/// plane) becomes the contact point. `plane` must already be in world space.
pub fn box_vs_plane(rect: &BoxShape, position: Vec2, rotation: Mat2, plane: &Plane) -> Option<ContactInfo> {
    let point = rect.support_feature(position, rotation, -plane.normal);
    let deepest = rect.support(position, rotation, -plane.normal);
    let signed_dist = plane.signed_distance(deepest);

    if signed_dist >= 0.0 {
        return None;
    }

    Some(ContactInfo::new(point, plane.normal, signed_dist))
}

/// A box placed in world space
struct OrientedBox<'a> {
    shape: &'a BoxShape,
    position: Vec2,
    rotation: Mat2,
    half: Vec2,
}

impl<'a> OrientedBox<'a> {
    fn new(shape: &'a BoxShape, position: Vec2, rotation: Mat2) -> Self {
        Self {
            shape,
            position,
            rotation,
            half: shape.half_extents(),
        }
    }

    fn support(&self, direction: Vec2) -> Vec2 {
        self.shape.support(self.position, self.rotation, direction)
    }

    fn support_feature(&self, direction: Vec2) -> Vec2 {
        self.shape.support_feature(self.position, self.rotation, direction)
    }
}

/// Best candidate axis found so far during SAT
#[derive(Clone, Copy)]
struct FaceQuery {
    face_normal: Vec2,
    penetration: f32,
    vertex: Vec2,
    reference_is_a: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::INFINITE_MASS;

    const EPSILON: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_vec(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPSILON
    }

    fn circle_body(radius: f32, position: Vec2) -> RigidBody {
        RigidBody::new(Shape::circle(radius).unwrap(), 1.0)
            .unwrap()
            .with_position(position)
    }

    fn box_body(width: f32, height: f32, position: Vec2, rotation: f32) -> RigidBody {
        RigidBody::new(Shape::rect(width, height).unwrap(), 1.0)
            .unwrap()
            .with_position(position)
            .with_rotation(rotation)
    }

    fn floor_body(y: f32) -> RigidBody {
        RigidBody::new(Shape::plane(Vec2::Y, y).unwrap(), INFINITE_MASS).unwrap()
    }

    // ===== Circle vs Circle =====

    #[test]
    fn test_circle_circle_exact() {
        let a = circle_body(1.0, Vec2::new(0.0, 0.0));
        let b = circle_body(1.0, Vec2::new(1.5, 0.0));

        let contact = collide(&a, &b).expect("Should collide");
        assert!(approx(contact.distance, -0.5));
        assert!(approx_vec(contact.normal, Vec2::new(-1.0, 0.0)));
        // On body1's surface, facing body2
        assert!(approx_vec(contact.position, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_circle_circle_separated() {
        let a = circle_body(1.0, Vec2::ZERO);
        let b = circle_body(1.0, Vec2::new(2.5, 0.0));
        assert!(collide(&a, &b).is_none());

        // Exactly touching counts as separated
        let c = circle_body(1.0, Vec2::new(2.0, 0.0));
        assert!(collide(&a, &c).is_none());
    }

    #[test]
    fn test_circle_circle_coincident_centers() {
        let a = circle_body(1.0, Vec2::new(3.0, 3.0));
        let b = circle_body(0.5, Vec2::new(3.0, 3.0));

        let contact = collide(&a, &b).expect("Should collide");
        assert!(contact.normal.is_finite());
        assert!(approx(contact.normal.length(), 1.0));
        assert!(approx(contact.distance, -1.5));
    }

    // ===== Circle vs Box =====

    #[test]
    fn test_circle_box_outside_no_contact() {
        let circle = circle_body(1.0, Vec2::new(3.0, 0.0));
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);
        assert!(collide(&circle, &rect).is_none());
    }

    #[test]
    fn test_circle_box_outside_contact() {
        let circle = circle_body(1.0, Vec2::new(1.5, 0.0));
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);

        let contact = collide(&circle, &rect).expect("Should collide");
        assert!(approx(contact.distance, -0.5));
        assert!(approx_vec(contact.normal, Vec2::X));
        assert!(approx_vec(contact.position, Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_circle_box_corner_region() {
        let circle = circle_body(1.0, Vec2::new(1.5, 1.5));
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);

        let contact = collide(&circle, &rect).expect("Should collide");
        let diag = Vec2::new(1.0, 1.0).normalized();
        assert!(approx_vec(contact.normal, diag));
        assert!(approx(contact.distance, 0.5f32.hypot(0.5) - 1.0));
    }

    #[test]
    fn test_circle_box_exactly_touching() {
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);

        // Closest point on the face is exactly one radius away
        let face = circle_body(1.0, Vec2::new(2.0, 0.0));
        assert!(collide(&face, &rect).is_none());
        assert!(collide(&rect, &face).is_none());

        // 3-4-5 triangle from the corner at (1, 1)
        let corner = circle_body(0.625, Vec2::new(1.375, 1.5));
        assert!(collide(&corner, &rect).is_none());

        let barely = circle_body(1.0, Vec2::new(1.999, 0.0));
        assert!(collide(&barely, &rect).is_some());
    }

    #[test]
    fn test_circle_box_inside_center() {
        let circle = circle_body(0.5, Vec2::ZERO);
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);

        let contact = collide(&circle, &rect).expect("Should collide");
        assert!(approx(contact.distance, -1.5));
        // All faces tie, so the first one (-X) is chosen
        assert!(approx_vec(contact.normal, -Vec2::X));
    }

    #[test]
    fn test_circle_box_inside_nearest_face() {
        let circle = circle_body(0.25, Vec2::new(0.0, 0.8));
        let rect = box_body(2.0, 2.0, Vec2::ZERO, 0.0);

        let contact = collide(&circle, &rect).expect("Should collide");
        assert!(approx_vec(contact.normal, Vec2::Y));
        assert!(approx(contact.distance, -(0.2 + 0.25)));
    }

    #[test]
    fn test_circle_box_rotated() {
        // Box rotated 45 degrees: its corner points along +X at distance sqrt(2)
        let rect = box_body(2.0, 2.0, Vec2::ZERO, std::f32::consts::FRAC_PI_4);
        let near = circle_body(0.5, Vec2::new(1.8, 0.0));
        let far = circle_body(0.3, Vec2::new(1.8, 0.0));

        let contact = collide(&near, &rect).expect("Should collide");
        assert!(approx_vec(contact.normal, Vec2::X));
        assert!(approx(contact.distance, 1.8 - std::f32::consts::SQRT_2 - 0.5));

        assert!(collide(&far, &rect).is_none());
    }

    // ===== Box vs Box =====

    #[test]
    fn test_box_box_axis_aligned_overlap() {
        let a = box_body(1.0, 1.0, Vec2::ZERO, 0.0);
        let b = box_body(1.0, 1.0, Vec2::new(0.9, 0.0), 0.0);

        let contact = collide(&a, &b).expect("Should collide");
        assert!(approx(contact.penetration(), 0.1));
        assert!(approx(contact.normal.x.abs(), 1.0));
        assert!(approx(contact.normal.y, 0.0));
        // Normal points from b toward a
        assert!(contact.normal.x < 0.0);
        // Point on a's right face
        assert!(approx(contact.position.x, 0.5));
    }

    #[test]
    fn test_box_box_separated() {
        let a = box_body(1.0, 1.0, Vec2::ZERO, 0.0);
        let b = box_body(1.0, 1.0, Vec2::new(1.2, 0.0), 0.0);
        assert!(collide(&a, &b).is_none());

        let c = box_body(1.0, 1.0, Vec2::new(0.0, -1.01), 0.0);
        assert!(collide(&a, &c).is_none());
    }

    #[test]
    fn test_box_box_rotated_corner_into_face() {
        // Diamond whose bottom corner dips 0.1 into the top face of a wide box
        let ground = box_body(4.0, 1.0, Vec2::ZERO, 0.0);
        let corner_depth = std::f32::consts::SQRT_2 * 0.5;
        let diamond = box_body(
            1.0,
            1.0,
            Vec2::new(0.0, 0.5 + corner_depth - 0.1),
            std::f32::consts::FRAC_PI_4,
        );

        let contact = collide(&diamond, &ground).expect("Should collide");
        assert!(approx_vec(contact.normal, Vec2::Y));
        assert!(approx(contact.distance, -0.1));
        assert!(approx_vec(contact.position, Vec2::new(0.0, 0.4)));
    }

    #[test]
    fn test_box_box_stacked_uses_face_midpoint() {
        let lower = box_body(1.0, 1.0, Vec2::ZERO, 0.0);
        let upper = box_body(1.0, 1.0, Vec2::new(0.0, 0.98), 0.0);

        let contact = collide(&upper, &lower).expect("Should collide");
        assert!(approx_vec(contact.normal, Vec2::Y));
        assert!(approx(contact.distance, -0.02));
        // Centered under the upper box, so no spurious torque
        assert!(approx(contact.position.x, 0.0));
    }

    #[test]
    fn test_box_box_nearly_flat_tilt_still_overlaps() {
        // Tilt small enough that both bottom corners count as one flat
        // feature, but only one of them dips below the lower box's top face
        let lower = box_body(4.0, 1.0, Vec2::ZERO, 0.0);
        let upper = box_body(1.0, 1.0, Vec2::new(0.0, 1.0003), 0.0008);

        let rot = upper.rotation_matrix();
        let deepest = match upper.shape() {
            Shape::Box(b) => b.support(upper.position, rot, -Vec2::Y),
            _ => unreachable!(),
        };
        assert!(deepest.y < 0.5);

        let contact = collide(&upper, &lower).expect("Deepest corner is inside the lower box");
        assert!(approx_vec(contact.normal, Vec2::Y));
        assert!(contact.distance < 0.0);
        assert!(approx(contact.distance, deepest.y - 0.5));

        let reversed = collide(&lower, &upper).expect("Overlap must not depend on argument order");
        assert!(approx(reversed.distance, contact.distance));
    }

    #[test]
    fn test_box_box_nearly_flat_tilt_separated() {
        let lower = box_body(4.0, 1.0, Vec2::ZERO, 0.0);
        let upper = box_body(1.0, 1.0, Vec2::new(0.0, 1.0006), 0.0008);

        assert!(collide(&upper, &lower).is_none());
        assert!(collide(&lower, &upper).is_none());
    }

    // ===== Planes =====

    #[test]
    fn test_circle_plane() {
        let floor = floor_body(0.0);
        let above = circle_body(1.0, Vec2::new(0.0, 2.0));
        assert!(collide(&above, &floor).is_none());

        let sinking = circle_body(1.0, Vec2::new(2.0, 0.75));
        let contact = collide(&sinking, &floor).expect("Should collide");
        assert!(approx(contact.distance, -0.25));
        assert!(approx_vec(contact.normal, Vec2::Y));
        assert!(approx_vec(contact.position, Vec2::new(2.0, -0.25)));
    }

    #[test]
    fn test_box_plane_flat_and_tilted() {
        let floor = floor_body(0.0);

        let flat = box_body(2.0, 1.0, Vec2::new(1.0, 0.4), 0.0);
        let contact = collide(&flat, &floor).expect("Should collide");
        assert!(approx(contact.distance, -0.1));
        assert!(approx_vec(contact.position, Vec2::new(1.0, -0.1)));

        let tilted = box_body(1.0, 1.0, Vec2::new(0.0, 0.6), std::f32::consts::FRAC_PI_4);
        let contact = collide(&tilted, &floor).expect("Should collide");
        assert!(approx(contact.distance, 0.6 - std::f32::consts::SQRT_2 * 0.5));
        assert!(approx(contact.position.x, 0.0));

        let floating = box_body(1.0, 1.0, Vec2::new(0.0, 0.6), 0.0);
        assert!(collide(&floating, &floor).is_none());
    }

    #[test]
    fn test_offset_plane_body() {
        // Plane shape at local offset 0 on a body positioned at y = 2
        let ceiling = RigidBody::new_static(Shape::plane(-Vec2::Y, 0.0).unwrap())
            .with_position(Vec2::new(0.0, 2.0));
        let circle = circle_body(0.5, Vec2::new(0.0, 1.8));

        let contact = collide(&circle, &ceiling).expect("Should collide");
        assert!(approx_vec(contact.normal, -Vec2::Y));
        assert!(approx(contact.distance, -0.3));
    }

    #[test]
    fn test_plane_plane_never_collides() {
        let a = floor_body(0.0);
        let b = floor_body(1.0);
        assert!(collide(&a, &b).is_none());
    }

    // ===== Symmetry =====

    fn assert_symmetric(a: &RigidBody, b: &RigidBody) {
        let ab = collide(a, b);
        let ba = collide(b, a);
        assert_eq!(ab.is_some(), ba.is_some(), "Outcome must not depend on argument order");

        if let (Some(ab), Some(ba)) = (ab, ba) {
            assert!(approx_vec(ab.normal, -ba.normal), "{:?} vs {:?}", ab.normal, ba.normal);
            assert!(approx(ab.distance, ba.distance));
            // Both describe the same contact, each on its own body's surface
            assert!(approx_vec(ab.position + ab.normal * -ab.distance, ba.position));
        }
    }

    #[test]
    fn test_symmetry_all_pairings() {
        // The two boxes never end up parallel, so no two faces tie
        for angle in [0.0, 0.45, -0.7, 1.2] {
            for offset in [Vec2::ZERO, Vec2::new(0.25, -0.15), Vec2::new(-0.4, 0.3)] {
                let circle = circle_body(0.6, Vec2::new(0.3, 0.9) + offset);
                let other_circle = circle_body(0.5, Vec2::new(0.8, 1.2) - offset);
                let rect = box_body(1.0, 1.4, Vec2::new(0.1, 0.2), 0.3 + angle);
                let other_rect = box_body(0.8, 0.6, Vec2::new(0.7, 0.8) + offset, -0.2 + angle * 0.5);
                let floor = floor_body(offset.y);
                let far_circle = circle_body(0.5, Vec2::new(10.0, 10.0));

                let bodies = [&circle, &other_circle, &rect, &other_rect, &floor, &far_circle];
                for a in bodies {
                    for b in bodies {
                        if !std::ptr::eq(a, b) {
                            assert_symmetric(a, b);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_mirrored_contact() {
        let contact = ContactInfo::new(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), -0.5);
        let mirrored = contact.mirrored();
        assert_eq!(mirrored.normal, Vec2::X);
        assert_eq!(mirrored.distance, -0.5);
        assert!(approx_vec(mirrored.position, Vec2::new(0.5, 0.0)));
    }
}
