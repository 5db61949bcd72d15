//! Kinematic algorithms over a [`linkage_model::Model`].
//!
//! Implements:
//! - Forward kinematics (placements, velocities, accelerations)
//! - Frame placements and frame motion queries
//! - Joint and frame Jacobians, and their time variation
//! - Recursive Newton-Euler Algorithm (RNEA) for inverse dynamics
//! - Inertia and force supported by a frame
//!
//! Every routine takes the model by shared reference and writes into a
//! caller-owned [`linkage_model::Data`]. Index and dimension errors are
//! reported before any buffer is touched.

pub mod frames;
pub mod jacobian;
pub mod kinematics;
pub mod rnea;
pub mod supported;

pub use frames::{
    frame_acceleration, frame_acceleration_at, frame_classical_acceleration,
    frame_classical_acceleration_at, frame_velocity, frame_velocity_at, frames_forward_kinematics,
    update_frame_placement, update_frame_placements,
};
pub use jacobian::{
    compute_frame_jacobian, compute_joint_jacobian, compute_joint_jacobians,
    compute_joint_jacobians_time_variation, frame_jacobian, frame_jacobian_at,
    frame_jacobian_at_owned, frame_jacobian_owned, frame_jacobian_time_variation, joint_jacobian,
    joint_jacobian_owned, joint_jacobian_time_variation,
};
pub use kinematics::{
    forward_kinematics, forward_kinematics_with_acceleration, forward_kinematics_with_velocity,
    joint_acceleration, joint_classical_acceleration, joint_velocity, relative_placement,
    update_global_placements,
};
pub use rnea::{rnea, rnea_with_external_forces};
pub use supported::{supported_force_by_frame, supported_inertia_by_frame};
