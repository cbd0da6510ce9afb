//! 2x2 Matrix for planar rotations
//!
//! Stored column-major, matching how rotations are usually written:
//! the first column is where the local X axis ends up, the second column
//! is where the local Y axis ends up.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::Vec2;

/// 2x2 matrix (column-major)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat2 {
    pub col1: Vec2,
    pub col2: Vec2,
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat2 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        col1: Vec2::X,
        col2: Vec2::Y,
    };

    /// Create a counter-clockwise rotation matrix for `angle` radians
    ///
    /// The result is always orthonormal, so its transpose is its inverse.
    ///
    /// # Example
    /// ```
    /// use impulse2d_math::{Mat2, Vec2};
    /// let quarter = Mat2::from_angle(std::f32::consts::FRAC_PI_2);
    /// let v = quarter * Vec2::X;
    /// assert!((v - Vec2::Y).length() < 1e-6);
    /// ```
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            col1: Vec2::new(c, s),
            col2: Vec2::new(-s, c),
        }
    }

    /// Swap rows and columns
    #[inline]
    pub fn transposed(self) -> Self {
        Self {
            col1: Vec2::new(self.col1.x, self.col2.x),
            col2: Vec2::new(self.col1.y, self.col2.y),
        }
    }

    /// Transform a vector by this matrix
    #[inline]
    pub fn transform(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.col1.x * v.x + self.col2.x * v.y,
            self.col1.y * v.x + self.col2.y * v.y,
        )
    }

    /// Transform a vector by the transpose of this matrix
    ///
    /// For rotations this undoes [`Mat2::transform`] without building the
    /// transposed matrix.
    #[inline]
    pub fn transform_transposed(self, v: Vec2) -> Vec2 {
        Vec2::new(self.col1.dot(v), self.col2.dot(v))
    }
}

impl std::ops::Mul<Vec2> for Mat2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        self.transform(v)
    }
}

impl std::ops::Mul for Mat2 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Self {
            col1: self.transform(other.col1),
            col2: self.transform(other.col2),
        }
    }
}
