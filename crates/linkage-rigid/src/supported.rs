//! Inertia and force carried by a frame.
//!
//! Cutting the mechanism at a frame splits its parent joint's body in two.
//! Everything after the cut (the frame's own inertia, frames hanging off it on
//! the same joint and, optionally, the child subtrees) is what the frame
//! supports. Both results are expressed in the frame.

use linkage_math::{SpatialInertia, SpatialVec};
use linkage_model::{Data, Model, Result};

/// True if `ancestor` is `frame` or lies on its `parent_frame` chain.
fn frame_descends_from(model: &Model, mut frame: usize, ancestor: usize) -> bool {
    while frame > ancestor {
        frame = model.frames[frame].parent_frame;
    }
    frame == ancestor
}

/// Inertia supported by frame `frame`, expressed in that frame.
///
/// With `with_subtree`, the bodies of all descendant joints are included;
/// this reads `o_mi` and requires a prior forward kinematics pass.
pub fn supported_inertia_by_frame(
    model: &Model,
    data: &Data,
    frame: usize,
    with_subtree: bool,
) -> Result<SpatialInertia> {
    model.check_frame(frame)?;
    let f = &model.frames[frame];
    let joint = f.parent_joint;

    let mut inertia = f.inertia;
    for (other, g) in model.frames.iter().enumerate().skip(frame + 1) {
        if g.parent_joint == joint && frame_descends_from(model, other, frame) {
            let in_joint = g.placement.act_inertia(&g.inertia);
            inertia += f.placement.act_inv_inertia(&in_joint);
        }
    }

    if with_subtree {
        let o_mf = data.o_mi[joint] * f.placement;
        for &k in &model.subtrees[joint][1..] {
            let in_world = data.o_mi[k].act_inertia(&model.inertias[k]);
            inertia += o_mf.act_inv_inertia(&in_world);
        }
    }
    Ok(inertia)
}

/// Spatial force transmitted through frame `frame`, expressed in that frame.
///
/// This is the inertial and gravity force of the supported inertia plus the
/// forces transmitted by every child joint of the frame's parent joint, i.e.
/// what a force-torque sensor placed at the frame would measure. External
/// forces on the parent joint itself are not included.
///
/// Requires a prior [`crate::rnea`] pass.
pub fn supported_force_by_frame(model: &Model, data: &Data, frame: usize) -> Result<SpatialVec> {
    let inertia = supported_inertia_by_frame(model, data, frame, false)?;
    let f = &model.frames[frame];
    let joint = f.parent_joint;

    let v = f.placement.act_inv_motion(&data.v[joint]);
    let a = f.placement.act_inv_motion(&data.a_gf[joint]);
    let mut force = inertia.mul_motion(&a) + inertia.vxiv(&v);

    for &child in &model.children[joint] {
        let in_joint = data.li_mi[child].act_force(&data.f[child]);
        force += f.placement.act_inv_force(&in_joint);
    }
    Ok(force)
}
