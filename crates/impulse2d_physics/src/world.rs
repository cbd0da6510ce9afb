//! Physics world and simulation

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::body::{BodyId, BodyKey, RigidBody};
use crate::collision::ContactInfo;
use crate::debug_draw::DebugRenderer;
use crate::pair::{PairKey, RigidBodyPair};
use crate::shapes::Shape;
use impulse2d_math::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

/// Half-length of the line drawn for plane shapes
const PLANE_DRAW_EXTENT: f32 = 1000.0;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration applied to every finite-mass body
    pub gravity: Vec2,
    /// Solver iterations per step
    pub iterations: usize,
    /// Penetration allowed before position correction kicks in
    pub slop: f32,
    /// Fraction of the excess penetration corrected per second of inverse dt, in (0, 1]
    pub bias_factor: f32,
    /// Keep accumulated contact impulses between steps
    pub warm_starting: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            iterations: 10,
            slop: 0.01,
            bias_factor: 0.2,
            warm_starting: false,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity and solver iterations
    pub fn new(gravity: Vec2, iterations: usize) -> Self {
        Self {
            gravity,
            iterations,
            ..Default::default()
        }
    }

    /// Set the allowed penetration
    pub fn with_slop(mut self, slop: f32) -> Self {
        self.slop = slop.max(0.0);
        self
    }

    /// Set the position correction factor, clamped to (0, 1]
    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = bias_factor.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Enable or disable carrying contact impulses between steps
    pub fn with_warm_starting(mut self, warm_starting: bool) -> Self {
        self.warm_starting = warm_starting;
        self
    }
}

/// The physics world containing all rigid bodies and live contact pairs
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Registration id of each body, for canonical pair order
    ids: SecondaryMap<BodyKey, BodyId>,
    /// Bodies in insertion order
    order: Vec<BodyKey>,
    /// Pairs currently in contact
    pairs: BTreeMap<PairKey, RigidBodyPair>,
    next_id: u64,
    step_count: u64,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            ids: SecondaryMap::new(),
            order: Vec::new(),
            pairs: BTreeMap::new(),
            next_id: 0,
            step_count: 0,
            config,
        }
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        let key = self.bodies.insert(body);
        let id = BodyId::new(self.next_id);
        self.next_id += 1;

        self.ids.insert(key, id);
        self.order.push(key);

        log::debug!("Added body {} ({:?})", id.raw(), self.bodies[key].shape().shape_type());
        key
    }

    /// Remove a body from the world and return it
    ///
    /// Any pair involving the body is dropped with it.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let body = self.bodies.remove(key)?;
        self.order.retain(|k| *k != key);

        if let Some(id) = self.ids.remove(key) {
            let before = self.pairs.len();
            self.pairs.retain(|pair_key, _| !pair_key.contains(id));
            log::debug!("Removed body {} and {} pair(s)", id.raw(), before - self.pairs.len());
        }

        Some(body)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the registration id of a body
    pub fn body_id(&self, key: BodyKey) -> Option<BodyId> {
        self.ids.get(key).copied()
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys in insertion order
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.order.iter().copied()
    }

    /// Iterate over all bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> + '_ {
        self.order.iter().map(move |&key| (key, &self.bodies[key]))
    }

    /// Add a force to a body's accumulator for the next step
    ///
    /// Returns false if the key is stale or the force is not finite.
    pub fn apply_force(&mut self, key: BodyKey, force: Vec2) -> bool {
        if !force.is_finite() {
            log::warn!("Ignoring non-finite force {:?}", force);
            return false;
        }
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.apply_force(force);
                true
            }
            None => false,
        }
    }

    /// Add a torque to a body's accumulator for the next step
    ///
    /// Returns false if the key is stale or the torque is not finite.
    pub fn apply_torque(&mut self, key: BodyKey, torque: f32) -> bool {
        if !torque.is_finite() {
            log::warn!("Ignoring non-finite torque {}", torque);
            return false;
        }
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.apply_torque(torque);
                true
            }
            None => false,
        }
    }

    /// Get the number of pairs currently in contact
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Iterate over the live pairs in solver order
    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, &RigidBodyPair)> + '_ {
        self.pairs.iter()
    }

    /// Look up the contact between two bodies, if they are touching
    pub fn contact_between(&self, a: BodyKey, b: BodyKey) -> Option<&ContactInfo> {
        let key = PairKey::new(self.body_id(a)?, self.body_id(b)?);
        self.pairs.get(&key).and_then(RigidBodyPair::contact)
    }

    /// Number of completed calls to [`PhysicsWorld::update`]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Contact pair refresh (all pairs, at least one body movable)
    /// 2. Force and gravity integration into velocity
    /// 3. Solver setup for every contact
    /// 4. A fixed number of sequential impulse iterations
    /// 5. Velocity integration into position for movable bodies, then
    ///    force and torque reset for every body, static ones included
    pub fn update(&mut self, dt: f32) {
        let inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };

        // Phase 1: Determine overlapping bodies and update contact points
        self.update_pairs();

        // Phase 2: Integrate forces to obtain updated velocities
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            if body.is_static() {
                continue;
            }

            body.linear_velocity += (gravity + body.force * body.inv_mass()) * dt;
            body.angular_velocity += dt * body.inv_inertia() * body.torque;
        }

        // Phase 3: One-time setup for each pair
        for pair in self.pairs.values_mut() {
            if let Some([body1, body2]) = self.bodies.get_disjoint_mut([pair.body1(), pair.body2()]) {
                pair.pre_solve(body1, body2, inv_dt, &self.config);
            }
        }

        // Phase 4: Sequential impulse iterations
        for _ in 0..self.config.iterations {
            for pair in self.pairs.values_mut() {
                if let Some([body1, body2]) = self.bodies.get_disjoint_mut([pair.body1(), pair.body2()]) {
                    pair.solve(body1, body2);
                }
            }
        }

        // Phase 5: Integrate velocities into position and clear forces
        for body in self.bodies.values_mut() {
            if !body.is_static() {
                body.position += body.linear_velocity * dt;
                body.rotation += dt * body.angular_velocity;
            }
            body.clear_forces();
        }

        self.step_count += 1;
        log::trace!(
            "Step {}: {} bodies, {} contacts",
            self.step_count,
            self.bodies.len(),
            self.pairs.len()
        );
    }

    /// Rebuild the contact pair set
    ///
    /// Brute force over every unordered pair; pairs of two immovable bodies
    /// are skipped.
    fn update_pairs(&mut self) {
        let body_count = self.order.len();

        for i in 0..body_count {
            for j in (i + 1)..body_count {
                let (key_a, key_b) = (self.order[i], self.order[j]);
                let (body_a, body_b) = (&self.bodies[key_a], &self.bodies[key_b]);

                // If both are completely immovable, nothing to do
                if body_a.is_static() && body_b.is_static() {
                    continue;
                }

                let (id_a, id_b) = (self.ids[key_a], self.ids[key_b]);
                let pair_key = PairKey::new(id_a, id_b);

                let mut pair = if pair_key.body1() == id_a {
                    RigidBodyPair::new(key_a, body_a, key_b, body_b)
                } else {
                    RigidBodyPair::new(key_b, body_b, key_a, body_a)
                };

                if pair.has_contact() {
                    match self.pairs.entry(pair_key) {
                        Entry::Occupied(mut existing) => {
                            if self.config.warm_starting {
                                pair.warm_start_from(existing.get());
                            }
                            existing.insert(pair);
                        }
                        Entry::Vacant(slot) => {
                            log::debug!("Contact began: {} / {}", id_a.raw(), id_b.raw());
                            slot.insert(pair);
                        }
                    }
                } else if self.pairs.remove(&pair_key).is_some() {
                    log::debug!("Contact ended: {} / {}", id_a.raw(), id_b.raw());
                }
            }
        }
    }

    /// Emit outlines for every body and a point for every contact
    pub fn draw<R: DebugRenderer + ?Sized>(&self, renderer: &mut R) {
        for (_key, body) in self.bodies() {
            match body.shape() {
                Shape::Circle(circle) => {
                    renderer.draw_circle(body.position, circle.radius, body.rotation);
                }
                Shape::Box(rect) => {
                    renderer.draw_box(body.position, rect.size, body.rotation);
                }
                Shape::Plane(plane) => {
                    // Centered on the body so the visible segment stays near the scene
                    let plane = plane.to_world(body.position, body.rotation_matrix());
                    let center = plane.project_point(body.position);
                    let tangent = plane.normal.perp() * PLANE_DRAW_EXTENT;
                    renderer.draw_line(center - tangent, center + tangent);
                }
            }
        }

        for pair in self.pairs.values() {
            if let Some(contact) = pair.contact() {
                renderer.draw_point(contact.position);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
