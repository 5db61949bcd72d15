//! Joint types and definitions.
//!
//! Every supported joint has a motion subspace that is constant in the joint
//! frame and a zero bias term, so the velocity it contributes is `S v_j` and
//! its time derivative is `S a_j`.

use linkage_math::{DVec, Mat3, Matrix6xX, Placement, Quat, SpatialVec, Vec3, skew};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joint type enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Single rotational DOF about an axis of the joint frame.
    Revolute {
        /// Unit rotation axis.
        axis: Vec3,
    },
    /// Single translational DOF along an axis of the joint frame.
    Prismatic {
        /// Unit translation axis.
        axis: Vec3,
    },
    /// 3 DOF spherical joint (ball joint); configuration is a unit quaternion `[x, y, z, w]`.
    Spherical,
    /// 6 DOF free joint; configuration is `[px, py, pz, x, y, z, w]`,
    /// velocity is `[ω; v]` in the joint frame.
    Free,
    /// 0 DOF fixed joint (rigid attachment).
    Fixed,
}

impl JointKind {
    /// Revolute joint about `axis`.
    pub fn revolute(axis: Vec3) -> Self {
        Self::Revolute { axis }
    }

    /// Revolute joint about the local X axis.
    pub fn revolute_x() -> Self {
        Self::revolute(Vec3::x())
    }

    /// Revolute joint about the local Y axis.
    pub fn revolute_y() -> Self {
        Self::revolute(Vec3::y())
    }

    /// Revolute joint about the local Z axis.
    pub fn revolute_z() -> Self {
        Self::revolute(Vec3::z())
    }

    /// Prismatic joint along `axis`.
    pub fn prismatic(axis: Vec3) -> Self {
        Self::Prismatic { axis }
    }

    /// Short lowercase name, used in log output.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Revolute { .. } => "revolute",
            Self::Prismatic { .. } => "prismatic",
            Self::Spherical => "spherical",
            Self::Free => "free",
            Self::Fixed => "fixed",
        }
    }

    /// Number of configuration coordinates.
    pub fn nq(&self) -> usize {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::Spherical => 4,
            Self::Free => 7,
            Self::Fixed => 0,
        }
    }

    /// Number of velocity coordinates (degrees of freedom).
    pub fn nv(&self) -> usize {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::Spherical => 3,
            Self::Free => 6,
            Self::Fixed => 0,
        }
    }

    /// Placement of the joint's child frame relative to the joint frame for
    /// the configuration slice `q` (length `nq()`).
    ///
    /// Quaternions are normalized before use.
    pub fn calc(&self, q: &[f64]) -> Placement {
        match self {
            Self::Revolute { axis } => {
                let (s, c) = q[0].sin_cos();
                let k = skew(axis);
                Placement::from_rotation(Mat3::identity() + k * s + k * k * (1.0 - c))
            }
            Self::Prismatic { axis } => Placement::from_translation(axis * q[0]),
            Self::Spherical => Placement::from_quat(&Quat::from_xyzw(&q[0..4]).normalize()),
            Self::Free => Placement::new(
                Quat::from_xyzw(&q[3..7]).normalize().to_matrix(),
                Vec3::new(q[0], q[1], q[2]),
            ),
            Self::Fixed => Placement::identity(),
        }
    }

    /// Column `k` of the motion subspace, in the joint's child frame.
    pub fn motion_subspace_column(&self, k: usize) -> SpatialVec {
        match self {
            Self::Revolute { axis } => SpatialVec::new(*axis, Vec3::zeros()),
            Self::Prismatic { axis } => SpatialVec::new(Vec3::zeros(), *axis),
            Self::Spherical => {
                let mut w = Vec3::zeros();
                w[k] = 1.0;
                SpatialVec::new(w, Vec3::zeros())
            }
            Self::Free => {
                let mut s = SpatialVec::zero();
                s.data[k] = 1.0;
                s
            }
            Self::Fixed => SpatialVec::zero(),
        }
    }

    /// Motion subspace matrix S (6 × nv).
    pub fn motion_subspace(&self) -> Matrix6xX {
        let nv = self.nv();
        let mut s = Matrix6xX::zeros(nv);
        for k in 0..nv {
            s.set_column(k, &self.motion_subspace_column(k).data);
        }
        s
    }

    /// Spatial velocity contributed by the joint, `S v` (`v` of length `nv()`).
    pub fn motion(&self, v: &[f64]) -> SpatialVec {
        match self {
            Self::Revolute { axis } => SpatialVec::new(axis * v[0], Vec3::zeros()),
            Self::Prismatic { axis } => SpatialVec::new(Vec3::zeros(), axis * v[0]),
            Self::Spherical => SpatialVec::new(Vec3::new(v[0], v[1], v[2]), Vec3::zeros()),
            Self::Free => SpatialVec::new(Vec3::new(v[0], v[1], v[2]), Vec3::new(v[3], v[4], v[5])),
            Self::Fixed => SpatialVec::zero(),
        }
    }

    /// Write the neutral configuration (zero angles, identity quaternions) into `q`.
    pub fn neutral(&self, q: &mut [f64]) {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => q[0] = 0.0,
            Self::Spherical => q[0..4].copy_from_slice(&Quat::identity().to_xyzw()),
            Self::Free => {
                q[0..3].fill(0.0);
                q[3..7].copy_from_slice(&Quat::identity().to_xyzw());
            }
            Self::Fixed => {}
        }
    }

    /// Write a random valid configuration into `q`.
    ///
    /// Angles are drawn in `[-π, π)`, translations in `[-1, 1)` and
    /// quaternions uniformly over SO(3).
    pub fn random_configuration<R: Rng + ?Sized>(&self, rng: &mut R, q: &mut [f64]) {
        use std::f64::consts::PI;
        let uniform_quat = |rng: &mut R| {
            Quat::from_uniform(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            )
            .to_xyzw()
        };
        match self {
            Self::Revolute { .. } => q[0] = rng.gen_range(-PI..PI),
            Self::Prismatic { .. } => q[0] = rng.gen_range(-1.0..1.0),
            Self::Spherical => q[0..4].copy_from_slice(&uniform_quat(rng)),
            Self::Free => {
                for x in q[0..3].iter_mut() {
                    *x = rng.gen_range(-1.0..1.0);
                }
                q[3..7].copy_from_slice(&uniform_quat(rng));
            }
            Self::Fixed => {}
        }
    }

    /// Rotation or translation axis, for the single-DOF kinds.
    pub fn axis(&self) -> Option<Vec3> {
        match self {
            Self::Revolute { axis } | Self::Prismatic { axis } => Some(*axis),
            _ => None,
        }
    }

    pub(crate) fn axis_mut(&mut self) -> Option<&mut Vec3> {
        match self {
            Self::Revolute { axis } | Self::Prismatic { axis } => Some(axis),
            _ => None,
        }
    }
}

/// A joint kind placed in the model's configuration and velocity vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointModel {
    /// Joint kind.
    pub kind: JointKind,
    /// Offset of the joint's coordinates in `q`.
    pub idx_q: usize,
    /// Offset of the joint's coordinates in `v` (and of its Jacobian columns).
    pub idx_v: usize,
}

impl JointModel {
    pub fn new(kind: JointKind, idx_q: usize, idx_v: usize) -> Self {
        Self { kind, idx_q, idx_v }
    }

    #[inline]
    pub fn nq(&self) -> usize {
        self.kind.nq()
    }

    #[inline]
    pub fn nv(&self) -> usize {
        self.kind.nv()
    }

    /// This joint's slice of a full configuration vector.
    #[inline]
    pub fn q_slice<'a>(&self, q: &'a DVec) -> &'a [f64] {
        &q.as_slice()[self.idx_q..self.idx_q + self.nq()]
    }

    /// This joint's slice of a full velocity (or acceleration) vector.
    #[inline]
    pub fn v_slice<'a>(&self, v: &'a DVec) -> &'a [f64] {
        &v.as_slice()[self.idx_v..self.idx_v + self.nv()]
    }

    /// Joint placement for the full configuration vector `q`.
    pub fn calc(&self, q: &DVec) -> Placement {
        self.kind.calc(self.q_slice(q))
    }

    /// Joint velocity `S v_j` for the full velocity vector `v`.
    pub fn motion(&self, v: &DVec) -> SpatialVec {
        self.kind.motion(self.v_slice(v))
    }
}
