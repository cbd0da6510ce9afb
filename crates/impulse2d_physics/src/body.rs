//! Rigid body types for 2D physics simulation

use crate::error::PhysicsError;
use crate::shapes::Shape;
use impulse2d_math::{Mat2, Vec2};
use slotmap::new_key_type;

/// Mass value marking a body as immovable
///
/// Any mass at or above this value produces a static body with zero
/// inverse mass and zero inverse inertia.
pub const INFINITE_MASS: f32 = f32::MAX;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing so a key to a removed body never
    /// resolves to a body that later reuses its slot.
    pub struct BodyKey;
}

/// Registration order of a body within its world
///
/// Assigned monotonically when the body is added, and used to give every
/// pair of bodies a canonical (lower id first) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u64);

impl BodyId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric id
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A 2D rigid body: one shape plus its linear and angular state
#[derive(Clone, Debug)]
pub struct RigidBody {
    shape: Shape,

    /// Position of the center of mass in world coordinates
    pub position: Vec2,
    /// Rotation in radians (counter-clockwise, not wrapped)
    pub rotation: f32,
    /// Linear velocity (units per second)
    pub linear_velocity: Vec2,
    /// Angular velocity (radians per second)
    pub angular_velocity: f32,
    /// Force accumulated for the current step
    pub force: Vec2,
    /// Torque accumulated for the current step
    pub torque: f32,

    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
}

impl RigidBody {
    /// Create a new rigid body owning `shape`
    ///
    /// Pass [`INFINITE_MASS`] (or use [`RigidBody::new_static`]) for an
    /// immovable body. Plane shapes are only accepted with infinite mass.
    /// A finite mass whose inverse mass or inverse inertia would overflow
    /// is rejected as [`PhysicsError::InvalidMass`].
    pub fn new(shape: Shape, mass: f32) -> Result<Self, PhysicsError> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        if mass >= INFINITE_MASS {
            return Ok(Self::new_static(shape));
        }

        if shape.requires_infinite_mass() {
            return Err(PhysicsError::PlaneRequiresInfiniteMass);
        }

        // Both inverses must be finite and non-zero, or integration produces NaN
        let inertia = shape.compute_inertia(mass);
        let (inv_mass, inv_inertia) = (1.0 / mass, 1.0 / inertia);
        let usable = |inv: f32| inv.is_finite() && inv > 0.0;
        if !(usable(inv_mass) && usable(inv_inertia)) {
            return Err(PhysicsError::InvalidMass(mass));
        }

        Ok(Self::with_mass_properties(shape, mass, inv_mass, inertia, inv_inertia))
    }

    /// Create an immovable body
    pub fn new_static(shape: Shape) -> Self {
        Self::with_mass_properties(shape, INFINITE_MASS, 0.0, INFINITE_MASS, 0.0)
    }

    fn with_mass_properties(shape: Shape, mass: f32, inv_mass: f32, inertia: f32, inv_inertia: f32) -> Self {
        Self {
            shape,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            inv_mass,
            inertia,
            inv_inertia,
        }
    }

    /// Set the position of this body
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation of this body (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the linear velocity of this body
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity of this body
    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Moment of inertia
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Whether this body has infinite mass and is never integrated
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Rotation matrix for the current orientation
    pub fn rotation_matrix(&self) -> Mat2 {
        Mat2::from_angle(self.rotation)
    }

    /// Add a force to this step's accumulator
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Add a torque to this step's accumulator
    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Reset the force and torque accumulators
    pub fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Velocity of the point at `lever_arm` from the center of mass
    pub fn velocity_at(&self, lever_arm: Vec2) -> Vec2 {
        self.linear_velocity + Vec2::scalar_cross(self.angular_velocity, lever_arm)
    }

    /// Apply an instantaneous impulse at `lever_arm` from the center of mass
    ///
    /// Static bodies are unaffected since both inverses are zero.
    pub fn apply_impulse(&mut self, impulse: Vec2, lever_arm: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * lever_arm.cross(impulse);
    }
}
