//! linkage: kinematics of articulated rigid-body trees.
//!
//! This is the umbrella crate that re-exports the model types and the
//! kinematic algorithms from the sub-crates.
//!
//! ```
//! use linkage::{Model, ReferenceFrame, linkage_math::{DVec, Matrix6xX, Vec3}};
//!
//! let model = Model::serial_chain(2, 1.0, Vec3::z()).unwrap();
//! let mut data = model.create_data();
//! let q = DVec::from_vec(vec![0.3, -0.2]);
//! let tip = model.frame_id("tip").unwrap();
//!
//! let mut jac = Matrix6xX::zeros(model.nv);
//! linkage::compute_frame_jacobian(&model, &mut data, &q, tip, ReferenceFrame::Local, &mut jac).unwrap();
//! assert_eq!(jac.ncols(), 2);
//! ```

pub use linkage_math::{self, Placement, Quat, SpatialInertia, SpatialVec};
pub use linkage_model::{
    self, Convention, Data, Error, Frame, FrameKind, JointKind, JointModel, Model, ModelBuilder,
    ReferenceFrame, Result,
};
pub use linkage_rigid::{
    self, compute_frame_jacobian, compute_joint_jacobian, compute_joint_jacobians,
    compute_joint_jacobians_time_variation, forward_kinematics,
    forward_kinematics_with_acceleration, forward_kinematics_with_velocity, frame_acceleration,
    frame_acceleration_at, frame_classical_acceleration, frame_classical_acceleration_at,
    frame_jacobian, frame_jacobian_at, frame_jacobian_at_owned, frame_jacobian_owned,
    frame_jacobian_time_variation, frame_velocity, frame_velocity_at, frames_forward_kinematics,
    joint_acceleration, joint_classical_acceleration, joint_jacobian, joint_jacobian_owned,
    joint_jacobian_time_variation, joint_velocity, relative_placement, rnea,
    rnea_with_external_forces, supported_force_by_frame, supported_inertia_by_frame,
    update_frame_placement, update_frame_placements, update_global_placements,
};
