//! Frame placements, velocities and accelerations.
//!
//! A frame is rigidly attached to its parent joint, so every frame quantity
//! is the parent joint's quantity moved to the frame origin.

use crate::kinematics::{classical_acceleration, express_motion, forward_kinematics};
use linkage_math::{DVec, Placement, SpatialVec};
use linkage_model::{Data, Model, ReferenceFrame, Result};

/// Compute `o_mf[frame]` from the current joint placements and return it.
pub fn update_frame_placement<'a>(
    model: &Model,
    data: &'a mut Data,
    frame: usize,
) -> Result<&'a Placement> {
    model.check_frame(frame)?;
    let f = &model.frames[frame];
    data.o_mf[frame] = data.o_mi[f.parent_joint] * f.placement;
    Ok(&data.o_mf[frame])
}

/// Compute `o_mf` for every frame from the current joint placements.
pub fn update_frame_placements(model: &Model, data: &mut Data) {
    for (o_mf, f) in data.o_mf.iter_mut().zip(&model.frames) {
        *o_mf = data.o_mi[f.parent_joint] * f.placement;
    }
}

/// Configuration-only forward kinematics followed by [`update_frame_placements`].
pub fn frames_forward_kinematics(model: &Model, data: &mut Data, q: &DVec) -> Result<()> {
    forward_kinematics(model, data, q)?;
    update_frame_placements(model, data);
    Ok(())
}

/// Spatial velocity of a point rigidly attached to `joint` at `placement`.
///
/// Requires a prior velocity-aware forward kinematics pass.
pub fn frame_velocity_at(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_joint(joint)?;
    Ok(express_motion(&data.o_mi[joint], placement, &data.v[joint], rf))
}

/// Spatial velocity of frame `frame`.
pub fn frame_velocity(
    model: &Model,
    data: &Data,
    frame: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_frame(frame)?;
    let f = &model.frames[frame];
    frame_velocity_at(model, data, f.parent_joint, &f.placement, rf)
}

/// Spatial acceleration of a point rigidly attached to `joint` at `placement`.
///
/// Requires a prior acceleration-aware forward kinematics pass.
pub fn frame_acceleration_at(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_joint(joint)?;
    Ok(express_motion(&data.o_mi[joint], placement, &data.a[joint], rf))
}

/// Spatial acceleration of frame `frame`.
pub fn frame_acceleration(
    model: &Model,
    data: &Data,
    frame: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_frame(frame)?;
    let f = &model.frames[frame];
    frame_acceleration_at(model, data, f.parent_joint, &f.placement, rf)
}

/// Classical acceleration of a point rigidly attached to `joint` at `placement`.
///
/// Equal to the spatial acceleration with `ω × v` added to the linear part,
/// where ω and v are the point's velocity in the same convention.
pub fn frame_classical_acceleration_at(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    let velocity = frame_velocity_at(model, data, joint, placement, rf)?;
    let acceleration = frame_acceleration_at(model, data, joint, placement, rf)?;
    Ok(classical_acceleration(&velocity, &acceleration))
}

/// Classical acceleration of frame `frame`.
pub fn frame_classical_acceleration(
    model: &Model,
    data: &Data,
    frame: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_frame(frame)?;
    let f = &model.frames[frame];
    frame_classical_acceleration_at(model, data, f.parent_joint, &f.placement, rf)
}
