//! Contact pairs and the sequential impulse solver step
//!
//! Every pair of bodies that is currently touching gets a [`RigidBodyPair`]
//! in the world. The pair caches the contact produced by collision
//! detection together with the quantities the solver needs each iteration.

use crate::body::{BodyId, BodyKey, RigidBody};
use crate::collision::{collide, ContactInfo};
use crate::world::PhysicsConfig;
use impulse2d_math::Vec2;

/// Order-independent key for a pair of bodies
///
/// The body with the lower id is always stored first, so `(a, b)` and
/// `(b, a)` produce equal keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    body1: BodyId,
    body2: BodyId,
}

impl PairKey {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Self { body1: a, body2: b }
        } else {
            Self { body1: b, body2: a }
        }
    }

    pub fn body1(&self) -> BodyId {
        self.body1
    }

    pub fn body2(&self) -> BodyId {
        self.body2
    }

    /// Check if either side of the pair is `id`
    pub fn contains(&self, id: BodyId) -> bool {
        self.body1 == id || self.body2 == id
    }
}

/// Two bodies plus the contact between them
///
/// A pair is rebuilt from scratch each step it stays in contact; the
/// accumulated impulse only survives that rebuild when the world has warm
/// starting enabled.
#[derive(Clone, Debug)]
pub struct RigidBodyPair {
    body1: BodyKey,
    body2: BodyKey,
    contact: Option<ContactInfo>,
}

impl RigidBodyPair {
    /// Test two bodies and record the result
    ///
    /// The bodies must already be in canonical order (lower id first).
    pub fn new(key1: BodyKey, body1: &RigidBody, key2: BodyKey, body2: &RigidBody) -> Self {
        Self {
            body1: key1,
            body2: key2,
            contact: collide(body1, body2),
        }
    }

    pub fn body1(&self) -> BodyKey {
        self.body1
    }

    pub fn body2(&self) -> BodyKey {
        self.body2
    }

    pub fn has_contact(&self) -> bool {
        self.contact.is_some()
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }

    /// Accumulated normal impulse (zero without contact)
    pub fn accumulated_impulse(&self) -> f32 {
        self.contact.map_or(0.0, |c| c.impulse_normal)
    }

    /// Carry the accumulated impulse of the pair this one replaces
    pub fn warm_start_from(&mut self, previous: &RigidBodyPair) {
        if let (Some(contact), Some(prev)) = (self.contact.as_mut(), previous.contact.as_ref()) {
            contact.impulse_normal = prev.impulse_normal;
        }
    }

    /// Prepare the contact for solver iterations
    ///
    /// Computes the lever arms, the effective mass along the normal and the
    /// position bias. With warm starting enabled the carried impulse is
    /// applied to both bodies here; otherwise it is reset.
    pub fn pre_solve(&mut self, body1: &mut RigidBody, body2: &mut RigidBody, inv_dt: f32, config: &PhysicsConfig) {
        let Some(contact) = self.contact.as_mut() else {
            return;
        };

        contact.r1 = contact.position - body1.position;
        contact.r2 = contact.position - body2.position;

        // Part of each lever arm along the normal
        let rn1 = contact.r1.dot(contact.normal);
        let rn2 = contact.r2.dot(contact.normal);

        // Linear part, then the rotational part from the component of each
        // lever arm perpendicular to the normal (|r|^2 - (r.n)^2)
        let mut k_normal = body1.inv_mass() + body2.inv_mass();
        k_normal += body1.inv_inertia() * (contact.r1.length_squared() - rn1 * rn1)
            + body2.inv_inertia() * (contact.r2.length_squared() - rn2 * rn2);

        contact.mass_normal = if k_normal > 0.0 { 1.0 / k_normal } else { 0.0 };

        contact.position_bias = -config.bias_factor * inv_dt * (contact.distance + config.slop).min(0.0);

        if config.warm_starting {
            let impulse = contact.normal * contact.impulse_normal;
            body1.apply_impulse(impulse, contact.r1);
            body2.apply_impulse(-impulse, contact.r2);
        } else {
            contact.impulse_normal = 0.0;
        }
    }

    /// Run one solver iteration for this contact
    ///
    /// Drives the relative normal velocity toward the position bias while
    /// keeping the accumulated impulse non-negative: contacts push, never pull.
    pub fn solve(&mut self, body1: &mut RigidBody, body2: &mut RigidBody) {
        let Some(contact) = self.contact.as_mut() else {
            return;
        };

        let relative_velocity = body1.velocity_at(contact.r1) - body2.velocity_at(contact.r2);
        let vel_normal = relative_velocity.dot(contact.normal);

        let mut delta_impulse = contact.mass_normal * (-vel_normal + contact.position_bias);

        // Clamp the accumulated impulse, not the increment
        let accumulated = contact.impulse_normal;
        contact.impulse_normal = (accumulated + delta_impulse).max(0.0);
        delta_impulse = contact.impulse_normal - accumulated;

        let impulse: Vec2 = contact.normal * delta_impulse;
        body1.apply_impulse(impulse, contact.r1);
        body2.apply_impulse(-impulse, contact.r2);
    }
}
