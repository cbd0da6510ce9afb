//! 2D rigid body physics for impulse2d
//!
//! This crate provides a small impulse-based physics kernel, including:
//! - Collision shapes (circles, boxes, planes)
//! - Narrow-phase collision detection producing a single contact per pair
//! - A sequential impulse contact solver with position bias
//! - A world that owns bodies and steps them at a caller-supplied dt
//! - Debug drawing through a line-based renderer trait

pub mod body;
pub mod collision;
pub mod debug_draw;
pub mod error;
pub mod pair;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyId, BodyKey, RigidBody, INFINITE_MASS};
pub use collision::{box_vs_box, box_vs_plane, circle_vs_box, circle_vs_circle, circle_vs_plane, collide, ContactInfo};
pub use debug_draw::{DebugRenderer, LineBatch};
pub use error::PhysicsError;
pub use pair::{PairKey, RigidBodyPair};
pub use shapes::{BoxShape, Circle, Plane, Shape, ShapeType};
pub use world::{PhysicsConfig, PhysicsWorld};
