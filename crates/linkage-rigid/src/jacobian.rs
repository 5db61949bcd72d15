//! Joint and frame Jacobians and their time derivatives.
//!
//! `data.j` holds, for every degree of freedom, the motion-subspace column of
//! its joint expressed in the world frame: `o_mi[j].act(S_j)`. A Jacobian at
//! a point only depends on the joints supporting that point, so every other
//! column of the output is zero.
//!
//! Output matrices are caller-provided, must be 6 × nv, and are zeroed before
//! being filled.

use crate::kinematics::{run_velocity_pass, support_placements};
use linkage_math::{DVec, Matrix6xX, Placement, SpatialVec, Vec3};
use linkage_model::{Data, Model, ReferenceFrame, Result};

/// Fill `li_mi`, `o_mi` and the world-frame joint Jacobian columns `data.j`.
pub fn compute_joint_jacobians(model: &Model, data: &mut Data, q: &DVec) -> Result<()> {
    crate::kinematics::forward_kinematics(model, data, q)?;
    for i in 1..model.njoints {
        write_world_columns(model, data, i);
    }
    Ok(())
}

fn write_world_columns(model: &Model, data: &mut Data, joint: usize) {
    let jm = &model.joints[joint];
    let o_mi = data.o_mi[joint];
    for k in 0..jm.nv() {
        let column = o_mi.act_motion(&jm.kind.motion_subspace_column(k));
        data.j.set_column(jm.idx_v + k, &column.data);
    }
}

#[inline]
fn column(matrix: &Matrix6xX, c: usize) -> SpatialVec {
    SpatialVec::from_vec6(matrix.column(c).into_owned())
}

/// Express a world-frame Jacobian column at the point whose world placement is `o_mf`.
fn express_column(world: &SpatialVec, o_mf: &Placement, rf: ReferenceFrame) -> SpatialVec {
    match rf {
        ReferenceFrame::World => *world,
        ReferenceFrame::Local => o_mf.act_inv_motion(world),
        ReferenceFrame::LocalWorldAligned => shift_origin(world, &o_mf.translation),
    }
}

/// Same axes, reference point moved from the world origin to `p`.
#[inline]
fn shift_origin(m: &SpatialVec, p: &Vec3) -> SpatialVec {
    let w = m.angular();
    SpatialVec::new(w, m.linear() - p.cross(&w))
}

fn fill_from_world_columns(
    model: &Model,
    data: &Data,
    joint: usize,
    o_mf: &Placement,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) {
    out.fill(0.0);
    for &k in &model.supports[joint][1..] {
        let jm = &model.joints[k];
        for c in jm.idx_v..jm.idx_v + jm.nv() {
            let col = express_column(&column(&data.j, c), o_mf, rf);
            out.set_column(c, &col.data);
        }
    }
}

/// Jacobian of joint `joint` in the convention `rf`, read from `data.j`.
///
/// Requires a prior [`compute_joint_jacobians`].
pub fn joint_jacobian(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_joint(joint)?;
    model.check_jacobian(out)?;
    fill_from_world_columns(model, data, joint, &data.o_mi[joint], rf, out);
    Ok(())
}

/// Like [`joint_jacobian`], returning a new matrix.
pub fn joint_jacobian_owned(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
) -> Result<Matrix6xX> {
    let mut out = Matrix6xX::zeros(model.nv);
    joint_jacobian(model, data, joint, rf, &mut out)?;
    Ok(out)
}

/// LOCAL Jacobian of joint `joint` for configuration `q`, recomputing only
/// the placements of the joints that support it. `data.j` is not used.
pub fn compute_joint_jacobian(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    joint: usize,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_configuration(q)?;
    model.check_joint(joint)?;
    model.check_jacobian(out)?;

    support_placements(model, data, q, joint);
    out.fill(0.0);
    let o_mj = data.o_mi[joint];
    for &k in &model.supports[joint][1..] {
        let jm = &model.joints[k];
        let o_mk = data.o_mi[k];
        for s in 0..jm.nv() {
            let world = o_mk.act_motion(&jm.kind.motion_subspace_column(s));
            out.set_column(jm.idx_v + s, &o_mj.act_inv_motion(&world).data);
        }
    }
    Ok(())
}

/// Jacobian of a point rigidly attached to `joint` at `placement`, read from `data.j`.
pub fn frame_jacobian_at(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_joint(joint)?;
    model.check_jacobian(out)?;
    let o_mf = data.o_mi[joint] * *placement;
    fill_from_world_columns(model, data, joint, &o_mf, rf, out);
    Ok(())
}

/// Like [`frame_jacobian_at`], returning a new matrix.
pub fn frame_jacobian_at_owned(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
) -> Result<Matrix6xX> {
    let mut out = Matrix6xX::zeros(model.nv);
    frame_jacobian_at(model, data, joint, placement, rf, &mut out)?;
    Ok(out)
}

/// Jacobian of frame `frame`, read from `data.j`. Also refreshes `o_mf[frame]`.
///
/// Requires a prior [`compute_joint_jacobians`].
pub fn frame_jacobian(
    model: &Model,
    data: &mut Data,
    frame: usize,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_frame(frame)?;
    model.check_jacobian(out)?;
    let f = &model.frames[frame];
    let o_mf = data.o_mi[f.parent_joint] * f.placement;
    data.o_mf[frame] = o_mf;
    fill_from_world_columns(model, data, f.parent_joint, &o_mf, rf, out);
    Ok(())
}

/// Like [`frame_jacobian`], returning a new matrix.
pub fn frame_jacobian_owned(
    model: &Model,
    data: &mut Data,
    frame: usize,
    rf: ReferenceFrame,
) -> Result<Matrix6xX> {
    let mut out = Matrix6xX::zeros(model.nv);
    frame_jacobian(model, data, frame, rf, &mut out)?;
    Ok(out)
}

/// Jacobian of frame `frame` for configuration `q`.
///
/// Only the joints supporting the frame are updated (placements and their
/// `data.j` columns), along with `o_mf[frame]`.
pub fn compute_frame_jacobian(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    frame: usize,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_configuration(q)?;
    model.check_frame(frame)?;
    model.check_jacobian(out)?;

    let joint = model.frames[frame].parent_joint;
    support_placements(model, data, q, joint);
    for &k in &model.supports[joint][1..] {
        write_world_columns(model, data, k);
    }
    frame_jacobian(model, data, frame, rf, out)
}

/// Fill placements, joint velocities, `ov`, `data.j` and its time derivative
/// `data.dj = ov_j × J_j` (world frame).
pub fn compute_joint_jacobians_time_variation(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    v: &DVec,
) -> Result<()> {
    model.check_configuration(q)?;
    model.check_velocity(v)?;
    run_velocity_pass(model, data, q, v);

    data.ov[0] = SpatialVec::zero();
    for i in 1..model.njoints {
        let jm = &model.joints[i];
        let o_mi = data.o_mi[i];
        let ov = o_mi.act_motion(&data.v[i]);
        data.ov[i] = ov;
        for k in 0..jm.nv() {
            let col = o_mi.act_motion(&jm.kind.motion_subspace_column(k));
            data.j.set_column(jm.idx_v + k, &col.data);
            data.dj.set_column(jm.idx_v + k, &ov.cross_motion(&col).data);
        }
    }
    Ok(())
}

fn fill_time_variation(
    model: &Model,
    data: &Data,
    joint: usize,
    placement: &Placement,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) {
    out.fill(0.0);
    let o_mf = data.o_mi[joint] * *placement;
    // Velocity of the point in its own frame.
    let v_f = placement.act_inv_motion(&data.v[joint]);
    // World velocity of the point's origin.
    let p_dot = o_mf.rotation * v_f.linear();

    for &k in &model.supports[joint][1..] {
        let jm = &model.joints[k];
        for c in jm.idx_v..jm.idx_v + jm.nv() {
            let j_world = column(&data.j, c);
            let dj_world = column(&data.dj, c);
            let col = match rf {
                ReferenceFrame::World => dj_world,
                ReferenceFrame::Local => {
                    let j_local = o_mf.act_inv_motion(&j_world);
                    o_mf.act_inv_motion(&dj_world) - v_f.cross_motion(&j_local)
                }
                ReferenceFrame::LocalWorldAligned => {
                    let shifted = shift_origin(&dj_world, &o_mf.translation);
                    SpatialVec::new(
                        shifted.angular(),
                        shifted.linear() - p_dot.cross(&j_world.angular()),
                    )
                }
            };
            out.set_column(c, &col.data);
        }
    }
}

/// Time derivative of the Jacobian of joint `joint`.
///
/// Requires a prior [`compute_joint_jacobians_time_variation`].
pub fn joint_jacobian_time_variation(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_joint(joint)?;
    model.check_jacobian(out)?;
    fill_time_variation(model, data, joint, &Placement::identity(), rf, out);
    Ok(())
}

/// Time derivative of the Jacobian of frame `frame`. Also refreshes `o_mf[frame]`.
///
/// Requires a prior [`compute_joint_jacobians_time_variation`]. With zero
/// joint accelerations, `dJ v` equals the frame's spatial acceleration
/// (LOCAL, WORLD) or its classical acceleration (LOCAL_WORLD_ALIGNED).
pub fn frame_jacobian_time_variation(
    model: &Model,
    data: &mut Data,
    frame: usize,
    rf: ReferenceFrame,
    out: &mut Matrix6xX,
) -> Result<()> {
    model.check_frame(frame)?;
    model.check_jacobian(out)?;
    let f = &model.frames[frame];
    data.o_mf[frame] = data.o_mi[f.parent_joint] * f.placement;
    fill_time_variation(model, data, f.parent_joint, &f.placement, rf, out);
    Ok(())
}
