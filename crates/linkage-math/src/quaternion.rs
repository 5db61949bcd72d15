//! Quaternion utilities for 3D rotations.
//!
//! Convention: q = [w; x; y; z] where w is scalar, (x,y,z) is vector part.
//! Configuration vectors store quaternions as `[x, y, z, w]`.

use crate::{Mat3, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unit quaternion representing a 3D rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quat {
    /// Scalar part (w).
    pub w: f64,
    /// Vector part (x, y, z).
    pub v: Vec3,
}

impl Quat {
    /// Create a new quaternion from scalar and vector parts.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            w,
            v: Vec3::new(x, y, z),
        }
    }

    /// Identity quaternion (no rotation).
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            v: Vec3::zeros(),
        }
    }

    /// Read a quaternion stored as `[x, y, z, w]` in a configuration slice.
    ///
    /// `coeffs` must hold at least four values.
    pub fn from_xyzw(coeffs: &[f64]) -> Self {
        Self::new(coeffs[3], coeffs[0], coeffs[1], coeffs[2])
    }

    /// Coefficients in configuration order `[x, y, z, w]`.
    pub fn to_xyzw(&self) -> [f64; 4] {
        [self.v.x, self.v.y, self.v.z, self.w]
    }

    /// Create quaternion from axis-angle representation.
    /// axis should be a unit vector, angle in radians.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let half_angle = angle * 0.5;
        let (s, c) = half_angle.sin_cos();
        Self { w: c, v: *axis * s }
    }

    /// Map three uniform samples in `[0, 1)` to a uniformly distributed
    /// rotation (Shoemake's method).
    pub fn from_uniform(u1: f64, u2: f64, u3: f64) -> Self {
        let r1 = (1.0 - u1).sqrt();
        let r2 = u1.sqrt();
        let (s1, c1) = (std::f64::consts::TAU * u2).sin_cos();
        let (s2, c2) = (std::f64::consts::TAU * u3).sin_cos();
        Self::new(r2 * c2, r1 * s1, r1 * c1, r2 * s2)
    }

    /// Euclidean norm of the four coefficients.
    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.v.norm_squared()).sqrt()
    }

    /// Normalize this quaternion to unit length.
    pub fn normalize(&self) -> Self {
        let norm = self.norm();
        if norm < 1e-12 {
            return Self::identity();
        }
        Self {
            w: self.w / norm,
            v: self.v / norm,
        }
    }

    /// Convert quaternion to 3x3 rotation matrix.
    pub fn to_matrix(&self) -> Mat3 {
        let w = self.w;
        let x = self.v.x;
        let y = self.v.y;
        let z = self.v.z;

        let x2 = x * x;
        let y2 = y * y;
        let z2 = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat3::new(
            1.0 - 2.0 * (y2 + z2),
            2.0 * (xy - wz),
            2.0 * (xz + wy),
            2.0 * (xy + wz),
            1.0 - 2.0 * (x2 + z2),
            2.0 * (yz - wx),
            2.0 * (xz - wy),
            2.0 * (yz + wx),
            1.0 - 2.0 * (x2 + y2),
        )
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}
