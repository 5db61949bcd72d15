//! Per-evaluation scratch storage filled by the kinematic passes.

use crate::Model;
use linkage_math::{DVec, Matrix6xX, Placement, SpatialVec};

/// Mutable results of the kinematic passes, sized once from a [`Model`].
///
/// Nothing tracks which pass last wrote which field: reading velocities after
/// a configuration-only pass returns whatever was there before.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    /// Joint placements relative to their parent joint.
    pub li_mi: Vec<Placement>,
    /// Joint placements in the world.
    pub o_mi: Vec<Placement>,
    /// Joint spatial velocities, in the joint frame.
    pub v: Vec<SpatialVec>,
    /// Joint spatial accelerations, in the joint frame.
    pub a: Vec<SpatialVec>,
    /// Joint spatial accelerations including gravity, in the joint frame.
    pub a_gf: Vec<SpatialVec>,
    /// Joint spatial velocities, in world axes about the world origin.
    pub ov: Vec<SpatialVec>,
    /// Joint spatial forces (subtree included), in the joint frame.
    pub f: Vec<SpatialVec>,
    /// Frame placements in the world.
    pub o_mf: Vec<Placement>,
    /// Joint Jacobian columns in the world frame (6 × nv).
    pub j: Matrix6xX,
    /// Time derivative of `j` (6 × nv).
    pub dj: Matrix6xX,
    /// Joint torques from the last force pass.
    pub tau: DVec,
}

impl Data {
    pub fn new(model: &Model) -> Self {
        let root = model.joint_placements[0];
        let mut li_mi = vec![Placement::identity(); model.njoints];
        let mut o_mi = vec![Placement::identity(); model.njoints];
        li_mi[0] = root;
        o_mi[0] = root;
        let o_mf = model
            .frames
            .iter()
            .map(|frame| o_mi[frame.parent_joint] * frame.placement)
            .collect();

        Self {
            li_mi,
            o_mi,
            v: vec![SpatialVec::zero(); model.njoints],
            a: vec![SpatialVec::zero(); model.njoints],
            a_gf: vec![SpatialVec::zero(); model.njoints],
            ov: vec![SpatialVec::zero(); model.njoints],
            f: vec![SpatialVec::zero(); model.njoints],
            o_mf,
            j: Matrix6xX::zeros(model.nv),
            dj: Matrix6xX::zeros(model.nv),
            tau: DVec::zeros(model.nv),
        }
    }
}

impl Model {
    /// Allocate a [`Data`] for this model.
    pub fn create_data(&self) -> Data {
        Data::new(self)
    }
}
