//! Forward kinematics: joint placements, velocities and accelerations.
//!
//! All passes walk the joints in increasing index order, which visits every
//! parent before its children. Inputs are validated before `Data` is touched.

use linkage_math::{DVec, Placement, SpatialVec};
use linkage_model::{Convention, Data, Model, ReferenceFrame, Result};

/// Compute `li_mi` and `o_mi` for every joint from the configuration `q`.
pub fn forward_kinematics(model: &Model, data: &mut Data, q: &DVec) -> Result<()> {
    model.check_configuration(q)?;
    run_pass(model, data, q, None, None);
    Ok(())
}

/// Placements plus joint spatial velocities `v` (each in its joint frame).
pub fn forward_kinematics_with_velocity(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    v: &DVec,
) -> Result<()> {
    model.check_configuration(q)?;
    model.check_velocity(v)?;
    run_pass(model, data, q, Some(v), None);
    Ok(())
}

/// Placements, velocities and joint spatial accelerations `a` (each in its
/// joint frame). Gravity is not included.
pub fn forward_kinematics_with_acceleration(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    v: &DVec,
    a: &DVec,
) -> Result<()> {
    model.check_configuration(q)?;
    model.check_velocity(v)?;
    model.check_acceleration(a)?;
    run_pass(model, data, q, Some(v), Some(a));
    Ok(())
}

fn run_pass(model: &Model, data: &mut Data, q: &DVec, v: Option<&DVec>, a: Option<&DVec>) {
    data.li_mi[0] = model.joint_placements[0];
    data.o_mi[0] = model.joint_placements[0];
    if v.is_some() {
        data.v[0] = SpatialVec::zero();
    }
    if a.is_some() {
        data.a[0] = SpatialVec::zero();
    }

    for i in 1..model.njoints {
        let jm = &model.joints[i];
        let parent = model.parents[i];

        let li_mi = model.joint_placements[i] * jm.calc(q);
        data.li_mi[i] = li_mi;
        data.o_mi[i] = data.o_mi[parent] * li_mi;

        if let Some(v) = v {
            let v_joint = jm.motion(v);
            data.v[i] = li_mi.act_inv_motion(&data.v[parent]) + v_joint;

            if let Some(a) = a {
                // Constant motion subspace: no c_J term, only the Coriolis part.
                data.a[i] = li_mi.act_inv_motion(&data.a[parent])
                    + jm.motion(a)
                    + data.v[i].cross_motion(&v_joint);
            }
        }
    }
}

pub(crate) fn run_velocity_pass(model: &Model, data: &mut Data, q: &DVec, v: &DVec) {
    run_pass(model, data, q, Some(v), None);
}

/// Recompute `li_mi`/`o_mi` only for the joints on the path from the root to `joint`.
pub(crate) fn support_placements(model: &Model, data: &mut Data, q: &DVec, joint: usize) {
    data.li_mi[0] = model.joint_placements[0];
    data.o_mi[0] = model.joint_placements[0];
    for &i in &model.supports[joint][1..] {
        let li_mi = model.joint_placements[i] * model.joints[i].calc(q);
        data.li_mi[i] = li_mi;
        data.o_mi[i] = data.o_mi[model.parents[i]] * li_mi;
    }
}

/// Recompute `o_mi` from the `li_mi` already stored in `data`.
pub fn update_global_placements(model: &Model, data: &mut Data) {
    data.o_mi[0] = data.li_mi[0];
    for i in 1..model.njoints {
        data.o_mi[i] = data.o_mi[model.parents[i]] * data.li_mi[i];
    }
}

/// Placement of joint `target` expressed in joint `reference`.
///
/// `Convention::World` composes the global placements; `Convention::Local`
/// walks the relative placements up to the common ancestor, which is more
/// accurate for joints far from the root.
pub fn relative_placement(
    model: &Model,
    data: &Data,
    reference: usize,
    target: usize,
    convention: Convention,
) -> Result<Placement> {
    model.check_joint(reference)?;
    model.check_joint(target)?;
    if reference == target {
        return Ok(Placement::identity());
    }

    match convention {
        Convention::World => Ok(data.o_mi[reference].inverse() * data.o_mi[target]),
        Convention::Local => {
            let mut ancestor_m_ref = Placement::identity();
            let mut ancestor_m_target = Placement::identity();
            let (mut i, mut j) = (reference, target);
            // The larger index can never be an ancestor of the smaller one.
            while i != j {
                if i > j {
                    ancestor_m_ref = data.li_mi[i] * ancestor_m_ref;
                    i = model.parents[i];
                } else {
                    ancestor_m_target = data.li_mi[j] * ancestor_m_target;
                    j = model.parents[j];
                }
            }
            Ok(ancestor_m_ref.inverse() * ancestor_m_target)
        }
    }
}

/// Express a motion given in joint coordinates at a point `placement` on the
/// joint, in the convention `rf`. `o_mi` is the joint's world placement.
pub(crate) fn express_motion(
    o_mi: &Placement,
    placement: &Placement,
    motion: &SpatialVec,
    rf: ReferenceFrame,
) -> SpatialVec {
    match rf {
        ReferenceFrame::Local => placement.act_inv_motion(motion),
        ReferenceFrame::World => o_mi.act_motion(motion),
        ReferenceFrame::LocalWorldAligned => {
            let local = placement.act_inv_motion(motion);
            let rotation = o_mi.rotation * placement.rotation;
            SpatialVec::new(rotation * local.angular(), rotation * local.linear())
        }
    }
}

/// Classical acceleration of a point from its spatial velocity and
/// acceleration expressed in the same convention.
pub(crate) fn classical_acceleration(velocity: &SpatialVec, acceleration: &SpatialVec) -> SpatialVec {
    let w = velocity.angular();
    SpatialVec::new(
        acceleration.angular(),
        acceleration.linear() + w.cross(&velocity.linear()),
    )
}

/// Spatial velocity of joint `joint` in the convention `rf`.
///
/// Reads the velocities of the last velocity-aware forward kinematics pass.
pub fn joint_velocity(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_joint(joint)?;
    Ok(express_motion(
        &data.o_mi[joint],
        &Placement::identity(),
        &data.v[joint],
        rf,
    ))
}

/// Spatial acceleration of joint `joint` in the convention `rf`.
pub fn joint_acceleration(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    model.check_joint(joint)?;
    Ok(express_motion(
        &data.o_mi[joint],
        &Placement::identity(),
        &data.a[joint],
        rf,
    ))
}

/// Classical acceleration of the joint origin in the convention `rf`.
pub fn joint_classical_acceleration(
    model: &Model,
    data: &Data,
    joint: usize,
    rf: ReferenceFrame,
) -> Result<SpatialVec> {
    let velocity = joint_velocity(model, data, joint, rf)?;
    let acceleration = joint_acceleration(model, data, joint, rf)?;
    Ok(classical_acceleration(&velocity, &acceleration))
}
