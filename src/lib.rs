//! impulse2d - 2D rigid body simulation
//!
//! Application layer on top of `impulse2d_physics`: layered configuration,
//! a scene builder and the fixed-step simulation system used by the
//! headless runner.

pub mod config;
pub mod scene;
pub mod systems;
