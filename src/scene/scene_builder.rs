//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for populating a physics world.

use impulse2d_math::Vec2;
use impulse2d_physics::{
    BodyKey, PhysicsConfig, PhysicsError, PhysicsWorld, RigidBody, Shape, INFINITE_MASS,
};

use crate::config::SceneConfig;

/// Gap left between stacked bodies so they settle instead of starting in contact
const STACK_GAP: f32 = 0.01;

/// Builder for constructing 2D physics scenes
///
/// # Example
/// ```
/// use impulse2d::scene::SceneBuilder;
/// use impulse2d_math::Vec2;
/// use impulse2d_physics::PhysicsConfig;
///
/// let world = SceneBuilder::new(PhysicsConfig::default())
///     .add_ground(0.0)?
///     .add_box(Vec2::new(0.0, 0.5), Vec2::new(1.0, 1.0), 1.0)?
///     .add_circle(Vec2::new(2.0, 3.0), 0.5, 1.0)?
///     .build();
/// assert_eq!(world.body_count(), 3);
/// # Ok::<(), impulse2d_physics::PhysicsError>(())
/// ```
pub struct SceneBuilder {
    world: PhysicsWorld,
    keys: Vec<BodyKey>,
}

impl SceneBuilder {
    /// Create a new scene builder with an empty world
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            world: PhysicsWorld::with_config(config),
            keys: Vec::new(),
        }
    }

    /// Build the demo scene described by a [`SceneConfig`]
    ///
    /// A ground plane, a stack of boxes at the origin and a column of
    /// circles dropped to its right.
    pub fn from_config(physics: PhysicsConfig, scene: &SceneConfig) -> Result<Self, PhysicsError> {
        let stack_base = Vec2::new(0.0, scene.ground_height);
        let circle_base = Vec2::new(scene.box_size * 2.0, scene.ground_height + scene.box_size);

        Self::new(physics)
            .add_ground(scene.ground_height)?
            .add_box_stack(stack_base, scene.box_stack_height, scene.box_size, scene.box_mass)?
            .add_circle_column(circle_base, scene.circle_count, scene.circle_radius, scene.circle_mass)
    }

    /// Add an immovable horizontal ground plane at the given Y position
    pub fn add_ground(self, y: f32) -> Result<Self, PhysicsError> {
        let ground = RigidBody::new(Shape::plane(Vec2::Y, 0.0)?, INFINITE_MASS)?
            .with_position(Vec2::new(0.0, y));
        Ok(self.add_body(ground))
    }

    /// Add an immovable plane with the given normal and offset
    pub fn add_wall(self, normal: Vec2, offset: f32) -> Result<Self, PhysicsError> {
        let wall = RigidBody::new(Shape::plane(normal, offset)?, INFINITE_MASS)?;
        Ok(self.add_body(wall))
    }

    /// Add a box of full `size` centered at `position`
    pub fn add_box(self, position: Vec2, size: Vec2, mass: f32) -> Result<Self, PhysicsError> {
        let body = RigidBody::new(Shape::rect(size.x, size.y)?, mass)?.with_position(position);
        Ok(self.add_body(body))
    }

    /// Add a circle centered at `position`
    pub fn add_circle(self, position: Vec2, radius: f32, mass: f32) -> Result<Self, PhysicsError> {
        let body = RigidBody::new(Shape::circle(radius)?, mass)?.with_position(position);
        Ok(self.add_body(body))
    }

    /// Stack `count` square boxes upward from `base` (the bottom center)
    pub fn add_box_stack(mut self, base: Vec2, count: usize, size: f32, mass: f32) -> Result<Self, PhysicsError> {
        let mut center = base + Vec2::new(0.0, size * 0.5 + STACK_GAP);
        for _ in 0..count {
            self = self.add_box(center, Vec2::new(size, size), mass)?;
            center.y += size + STACK_GAP;
        }
        Ok(self)
    }

    /// Stack `count` circles upward from `base` (the bottom of the column)
    pub fn add_circle_column(mut self, base: Vec2, count: usize, radius: f32, mass: f32) -> Result<Self, PhysicsError> {
        let mut center = base + Vec2::new(0.0, radius);
        for _ in 0..count {
            self = self.add_circle(center, radius, mass)?;
            center.y += radius * 2.0 + STACK_GAP;
        }
        Ok(self)
    }

    /// Add a prepared body
    pub fn add_body(mut self, body: RigidBody) -> Self {
        let key = self.world.add_body(body);
        self.keys.push(key);
        self
    }

    /// Keys of the bodies added so far, in order
    pub fn keys(&self) -> &[BodyKey] {
        &self.keys
    }

    /// Finish building and return the world
    pub fn build(self) -> PhysicsWorld {
        log::debug!("Built scene with {} bodies", self.world.body_count());
        self.world
    }
}
