//! 6D spatial algebra following Featherstone's "Rigid Body Dynamics Algorithms".
//!
//! Convention: spatial vectors are [angular; linear] (Featherstone order).
//! A spatial motion vector (twist): [ω; v]
//! A spatial force vector (wrench): [τ; f]
//!
//! A [`Placement`] `aMb` is the pose of frame B expressed in frame A. Its
//! action `act_*` maps quantities expressed in B into A; `act_inv_*` maps
//! quantities expressed in A into B.

use crate::{Mat3, Quat, Vec3, Vec6, skew};
use nalgebra as na;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 6D spatial vector, either a motion vector (twist) or force vector (wrench).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialVec {
    /// The underlying 6D vector [angular(3); linear(3)].
    pub data: Vec6,
}

impl SpatialVec {
    /// Create from angular and linear parts.
    #[inline]
    pub fn new(angular: Vec3, linear: Vec3) -> Self {
        Self {
            data: Vec6::new(
                angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
            ),
        }
    }

    /// Wrap a raw 6D vector laid out as [angular; linear].
    #[inline]
    pub fn from_vec6(data: Vec6) -> Self {
        Self { data }
    }

    /// Zero spatial vector.
    #[inline]
    pub fn zero() -> Self {
        Self {
            data: Vec6::zeros(),
        }
    }

    /// Angular (top 3) component.
    #[inline]
    pub fn angular(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[1], self.data[2])
    }

    /// Linear (bottom 3) component.
    #[inline]
    pub fn linear(&self) -> Vec3 {
        Vec3::new(self.data[3], self.data[4], self.data[5])
    }

    /// Spatial cross product for motion vectors: v ×ₘ w
    /// Used in velocity propagation.
    pub fn cross_motion(&self, other: &SpatialVec) -> SpatialVec {
        let w = self.angular();
        let v = self.linear();
        let w2 = other.angular();
        let v2 = other.linear();
        SpatialVec::new(w.cross(&w2), w.cross(&v2) + v.cross(&w2))
    }

    /// Spatial cross product for force vectors: v ×f f
    /// Used in bias force computation.
    pub fn cross_force(&self, other: &SpatialVec) -> SpatialVec {
        let w = self.angular();
        let v = self.linear();
        let t = other.angular();
        let f = other.linear();
        SpatialVec::new(w.cross(&t) + v.cross(&f), w.cross(&f))
    }

    /// Dot product of two spatial vectors (power when pairing a motion with a force).
    #[inline]
    pub fn dot(&self, other: &SpatialVec) -> f64 {
        self.data.dot(&other.data)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn is_approx(&self, other: &SpatialVec, eps: f64) -> bool {
        (self.data - other.data).amax() <= eps
    }
}

impl Default for SpatialVec {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::Add for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn add(self, rhs: SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data + rhs.data,
        }
    }
}

impl std::ops::AddAssign for SpatialVec {
    #[inline]
    fn add_assign(&mut self, rhs: SpatialVec) {
        self.data += rhs.data;
    }
}

impl std::ops::Sub for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn sub(self, rhs: SpatialVec) -> SpatialVec {
        SpatialVec {
            data: self.data - rhs.data,
        }
    }
}

impl std::ops::SubAssign for SpatialVec {
    #[inline]
    fn sub_assign(&mut self, rhs: SpatialVec) {
        self.data -= rhs.data;
    }
}

impl std::ops::Mul<f64> for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn mul(self, rhs: f64) -> SpatialVec {
        SpatialVec {
            data: self.data * rhs,
        }
    }
}

impl std::ops::Neg for SpatialVec {
    type Output = SpatialVec;
    #[inline]
    fn neg(self) -> SpatialVec {
        SpatialVec { data: -self.data }
    }
}

/// Rigid placement (element of SE(3)): rotation R and translation p.
///
/// As `aMb` it maps a point expressed in B to A: `x_a = R x_b + p`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Orientation of the child frame axes expressed in the parent frame.
    pub rotation: Mat3,
    /// Position of the child frame origin expressed in the parent frame.
    pub translation: Vec3,
}

impl Placement {
    /// Create from rotation matrix and translation.
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Identity placement.
    pub fn identity() -> Self {
        Self {
            rotation: Mat3::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Mat3::identity(),
            translation,
        }
    }

    /// Pure rotation.
    pub fn from_rotation(rotation: Mat3) -> Self {
        Self {
            rotation,
            translation: Vec3::zeros(),
        }
    }

    /// Pure rotation given by a unit quaternion.
    pub fn from_quat(q: &Quat) -> Self {
        Self::from_rotation(q.to_matrix())
    }

    /// Pure rotation about the X axis.
    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rotation(Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c))
    }

    /// Pure rotation about the Y axis.
    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rotation(Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c))
    }

    /// Pure rotation about the Z axis.
    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rotation(Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0))
    }

    /// Rotation about an arbitrary axis (Rodrigues' formula).
    pub fn rot_axis(axis: &na::Unit<Vec3>, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let k = skew(axis);
        Self::from_rotation(Mat3::identity() + k * s + k * k * (1.0 - c))
    }

    /// Map a point expressed in the child frame into the parent frame.
    #[inline]
    pub fn act_point(&self, p: &Vec3) -> Vec3 {
        self.rotation * p + self.translation
    }

    /// Map a point expressed in the parent frame into the child frame.
    #[inline]
    pub fn act_inv_point(&self, p: &Vec3) -> Vec3 {
        self.rotation.transpose() * (p - self.translation)
    }

    /// Transport a motion vector from the child frame into the parent frame.
    pub fn act_motion(&self, m: &SpatialVec) -> SpatialVec {
        let w = self.rotation * m.angular();
        let v = self.rotation * m.linear() + self.translation.cross(&w);
        SpatialVec::new(w, v)
    }

    /// Transport a motion vector from the parent frame into the child frame.
    pub fn act_inv_motion(&self, m: &SpatialVec) -> SpatialVec {
        let rt = self.rotation.transpose();
        let w = m.angular();
        let v = m.linear() - self.translation.cross(&w);
        SpatialVec::new(rt * w, rt * v)
    }

    /// Transport a force vector from the child frame into the parent frame.
    pub fn act_force(&self, f: &SpatialVec) -> SpatialVec {
        let force = self.rotation * f.linear();
        let tau = self.rotation * f.angular() + self.translation.cross(&force);
        SpatialVec::new(tau, force)
    }

    /// Transport a force vector from the parent frame into the child frame.
    pub fn act_inv_force(&self, f: &SpatialVec) -> SpatialVec {
        let rt = self.rotation.transpose();
        let force = f.linear();
        let tau = f.angular() - self.translation.cross(&force);
        SpatialVec::new(rt * tau, rt * force)
    }

    /// Express an inertia given in the child frame in the parent frame.
    pub fn act_inertia(&self, inertia: &SpatialInertia) -> SpatialInertia {
        SpatialInertia {
            mass: inertia.mass,
            com: self.act_point(&inertia.com),
            inertia: self.rotation * inertia.inertia * self.rotation.transpose(),
        }
    }

    /// Express an inertia given in the parent frame in the child frame.
    pub fn act_inv_inertia(&self, inertia: &SpatialInertia) -> SpatialInertia {
        let rt = self.rotation.transpose();
        SpatialInertia {
            mass: inertia.mass,
            com: self.act_inv_point(&inertia.com),
            inertia: rt * inertia.inertia * self.rotation,
        }
    }

    /// Compose two placements: `aMc = aMb * bMc`.
    pub fn compose(&self, other: &Placement) -> Placement {
        Placement {
            rotation: self.rotation * other.rotation,
            translation: self.translation + self.rotation * other.translation,
        }
    }

    /// Inverse of this placement.
    pub fn inverse(&self) -> Placement {
        let rt = self.rotation.transpose();
        Placement {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn is_approx(&self, other: &Placement, eps: f64) -> bool {
        (self.rotation - other.rotation).amax() <= eps
            && (self.translation - other.translation).amax() <= eps
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Placement {
    type Output = Placement;
    #[inline]
    fn mul(self, rhs: Placement) -> Placement {
        self.compose(&rhs)
    }
}

impl std::ops::Mul<&Placement> for &Placement {
    type Output = Placement;
    #[inline]
    fn mul(self, rhs: &Placement) -> Placement {
        self.compose(rhs)
    }
}

/// Spatial inertia of a rigid body.
///
/// Stored as mass, center of mass position in the body frame, and rotational
/// inertia about the center of mass (axes of the body frame).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialInertia {
    /// Mass of the body.
    pub mass: f64,
    /// Center of mass position in body frame.
    pub com: Vec3,
    /// Rotational inertia about the center of mass (3x3 symmetric).
    pub inertia: Mat3,
}

impl SpatialInertia {
    /// Create a spatial inertia with the given mass, CoM offset, and inertia matrix.
    pub fn new(mass: f64, com: Vec3, inertia: Mat3) -> Self {
        Self { mass, com, inertia }
    }

    /// Massless inertia, the neutral element of inertia addition.
    pub fn zero() -> Self {
        Self {
            mass: 0.0,
            com: Vec3::zeros(),
            inertia: Mat3::zeros(),
        }
    }

    /// Create spatial inertia for a point mass at a given position.
    pub fn point_mass(mass: f64, pos: Vec3) -> Self {
        Self {
            mass,
            com: pos,
            inertia: Mat3::zeros(),
        }
    }

    /// Uniform rod of given mass and length lying along the local X axis,
    /// starting at the origin.
    pub fn rod(mass: f64, length: f64) -> Self {
        let i = mass * length * length / 12.0;
        Self {
            mass,
            com: Vec3::new(length / 2.0, 0.0, 0.0),
            inertia: Mat3::new(0.0, 0.0, 0.0, 0.0, i, 0.0, 0.0, 0.0, i),
        }
    }

    /// Create spatial inertia for a uniform sphere.
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 2.0 / 5.0 * mass * radius * radius;
        Self {
            mass,
            com: Vec3::zeros(),
            inertia: Mat3::from_diagonal(&Vec3::new(i, i, i)),
        }
    }

    /// Momentum of the body moving with spatial velocity `v`: `I v`.
    pub fn mul_motion(&self, v: &SpatialVec) -> SpatialVec {
        let w = v.angular();
        let linear = (v.linear() - self.com.cross(&w)) * self.mass;
        let angular = self.inertia * w + self.com.cross(&linear);
        SpatialVec::new(angular, linear)
    }

    /// Gyroscopic bias force `v ×f (I v)`.
    pub fn vxiv(&self, v: &SpatialVec) -> SpatialVec {
        v.cross_force(&self.mul_motion(v))
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn is_approx(&self, other: &SpatialInertia, eps: f64) -> bool {
        (self.mass - other.mass).abs() <= eps
            && (self.com - other.com).amax() <= eps
            && (self.inertia - other.inertia).amax() <= eps
    }
}

impl Default for SpatialInertia {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::Add for SpatialInertia {
    type Output = SpatialInertia;

    /// Inertia of the rigid union of two bodies expressed in the same frame.
    fn add(self, rhs: SpatialInertia) -> SpatialInertia {
        let mass = self.mass + rhs.mass;
        if mass.abs() < 1e-12 {
            return SpatialInertia {
                mass,
                com: Vec3::zeros(),
                inertia: self.inertia + rhs.inertia,
            };
        }
        let com = (self.com * self.mass + rhs.com * rhs.mass) / mass;
        // Parallel axis: shift each rotational inertia to the combined CoM.
        let shift = |m: f64, d: Vec3| {
            let dx = skew(&d);
            -(dx * dx) * m
        };
        let inertia = self.inertia
            + rhs.inertia
            + shift(self.mass, self.com - com)
            + shift(rhs.mass, rhs.com - com);
        SpatialInertia { mass, com, inertia }
    }
}

impl std::ops::AddAssign for SpatialInertia {
    fn add_assign(&mut self, rhs: SpatialInertia) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod matrix_forms {
    //! 6x6 matrix forms of the placement and inertia actions.

    use super::*;
    use crate::Mat6;

    /// X = | R 0 ; [p]× R  R |, the matrix of `act_motion`.
    pub(super) fn motion_matrix(m: &Placement) -> Mat6 {
        let r = m.rotation;
        let mut x = Mat6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        x.fixed_view_mut::<3, 3>(3, 0).copy_from(&(skew(&m.translation) * r));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
        x
    }

    /// X* = | R  [p]× R ; 0 R |, the matrix of `act_force`.
    pub(super) fn force_matrix(m: &Placement) -> Mat6 {
        let r = m.rotation;
        let mut x = Mat6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        x.fixed_view_mut::<3, 3>(0, 3).copy_from(&(skew(&m.translation) * r));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
        x
    }

    /// | I + m[c]×[c]×ᵀ  m[c]× ; m[c]×ᵀ  mE |, about the frame origin.
    pub(super) fn inertia_matrix(i: &SpatialInertia) -> Mat6 {
        let cx = skew(&i.com);
        let mcx = cx * i.mass;
        let mut mat = Mat6::zeros();
        mat.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(i.inertia + cx * cx.transpose() * i.mass));
        mat.fixed_view_mut::<3, 3>(0, 3).copy_from(&mcx);
        mat.fixed_view_mut::<3, 3>(3, 0).copy_from(&mcx.transpose());
        mat.fixed_view_mut::<3, 3>(3, 3).copy_from(&(Mat3::identity() * i.mass));
        mat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::matrix_forms::inertia_matrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_spatial_vec_cross_motion() {
        let v1 = SpatialVec::new(Vec3::new(0.0, 0.0, 1.0), Vec3::zeros());
        let v2 = SpatialVec::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        let result = v1.cross_motion(&v2);
        // [0,0,1] × [1,0,0] = [0,1,0]
        assert_relative_eq!(result.angular().y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_placement_identity() {
        let m = Placement::identity();
        let v = SpatialVec::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_relative_eq!(m.act_motion(&v).data, v.data, epsilon = 1e-10);
        assert_relative_eq!(m.act_inv_force(&v).data, v.data, epsilon = 1e-10);
    }

    #[test]
    fn test_act_motion_lever_arm() {
        // Frame B sits one meter along X of A; B spins about Z.
        let m = Placement::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let spin = SpatialVec::new(Vec3::z(), Vec3::zeros());
        let in_a = m.act_motion(&spin);
        // Velocity of the point at A's origin: ω × (0 - p) = z × (-x) = -y.
        assert_relative_eq!(in_a.linear(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(m.act_inv_motion(&in_a).data, spin.data, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_placements() {
        let a = Placement::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let b = Placement::from_translation(Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!((a * b).translation, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-10);

        let r = Placement::rot_z(std::f64::consts::FRAC_PI_2);
        let t = Placement::from_translation(Vec3::new(1.0, 0.0, 0.0));
        // Rotating first turns the subsequent X offset into Y.
        assert_relative_eq!((r * t).translation, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn test_rot_axis_matches_rot_z() {
        let a = Placement::rot_axis(&Vec3::z_axis(), 0.4);
        let b = Placement::rot_z(0.4);
        assert!(a.is_approx(&b, 1e-12));
    }

    #[test]
    fn test_spatial_inertia_point_mass() {
        let si = SpatialInertia::point_mass(2.0, Vec3::new(0.0, 1.0, 0.0));
        let mat = inertia_matrix(&si);
        assert_relative_eq!(mat[(3, 3)], 2.0, epsilon = 1e-10);
        assert_relative_eq!(mat[(4, 4)], 2.0, epsilon = 1e-10);
        assert_relative_eq!(mat[(5, 5)], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_spatial_inertia_sphere() {
        let si = SpatialInertia::sphere(5.0, 0.1);
        let expected_i = 2.0 / 5.0 * 5.0 * 0.01;
        assert_relative_eq!(si.inertia[(0, 0)], expected_i, epsilon = 1e-10);
        assert_relative_eq!(si.inertia[(1, 1)], expected_i, epsilon = 1e-10);
        assert_relative_eq!(si.inertia[(2, 2)], expected_i, epsilon = 1e-10);
    }

    #[test]
    fn test_inertia_sum_of_point_masses() {
        let a = SpatialInertia::point_mass(1.0, Vec3::new(1.0, 0.0, 0.0));
        let b = SpatialInertia::point_mass(1.0, Vec3::new(-1.0, 0.0, 0.0));
        let sum = a + b;
        assert_relative_eq!(sum.mass, 2.0);
        assert_relative_eq!(sum.com, Vec3::zeros(), epsilon = 1e-12);
        // Dumbbell along X: no inertia about X, 2 m r² about Y and Z.
        assert_relative_eq!(sum.inertia, Mat3::from_diagonal(&Vec3::new(0.0, 2.0, 2.0)), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_inertia_is_neutral() {
        let rod = SpatialInertia::rod(2.0, 0.5);
        assert!((rod + SpatialInertia::zero()).is_approx(&rod, 1e-12));
    }

    #[test]
    fn test_mul_motion_matches_matrix() {
        let si = SpatialInertia::new(
            1.5,
            Vec3::new(0.1, -0.2, 0.3),
            Mat3::from_diagonal(&Vec3::new(0.2, 0.3, 0.4)),
        );
        let v = SpatialVec::new(Vec3::new(0.3, -1.0, 2.0), Vec3::new(1.0, 0.5, -0.5));
        assert_relative_eq!(
            si.mul_motion(&v).data,
            inertia_matrix(&si) * v.data,
            epsilon = 1e-12
        );
    }
}
