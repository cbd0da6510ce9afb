//! 2D Mathematics Library
//!
//! This crate provides the small set of value types the impulse2d physics
//! kernel is built on.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Mat2`] - 2x2 column-major matrix, mostly used as a rotation

mod vec2;
pub mod mat2;

pub use vec2::Vec2;
pub use mat2::Mat2;
