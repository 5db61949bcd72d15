//! Recursive Newton-Euler Algorithm (RNEA) for inverse dynamics.
//!
//! Given (q, v, a), compute the joint torques and the spatial force each
//! joint transmits to its subtree. Gravity enters as an upward acceleration
//! of the universe.

use linkage_math::{DVec, SpatialVec, Vec3};
use linkage_model::{Data, Error, Model, Result};

/// Run RNEA without external forces. See [`rnea_with_external_forces`].
pub fn rnea<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVec,
    v: &DVec,
    a: &DVec,
) -> Result<&'a DVec> {
    model.check_configuration(q)?;
    model.check_velocity(v)?;
    model.check_acceleration(a)?;
    run(model, data, q, v, a, None);
    Ok(&data.tau)
}

/// Run RNEA with external forces `fext` (one per joint, in the joint frame).
///
/// Fills `li_mi`, `o_mi`, `v`, `a`, `a_gf`, `f` and `tau`, and returns `tau`.
pub fn rnea_with_external_forces<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVec,
    v: &DVec,
    a: &DVec,
    fext: &[SpatialVec],
) -> Result<&'a DVec> {
    model.check_configuration(q)?;
    model.check_velocity(v)?;
    model.check_acceleration(a)?;
    if fext.len() != model.njoints {
        return Err(Error::dimension("fext", model.njoints, fext.len()));
    }
    run(model, data, q, v, a, Some(fext));
    Ok(&data.tau)
}

fn run(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    v: &DVec,
    a: &DVec,
    fext: Option<&[SpatialVec]>,
) {
    let root = model.joint_placements[0];
    data.li_mi[0] = root;
    data.o_mi[0] = root;
    data.v[0] = SpatialVec::zero();
    data.a[0] = SpatialVec::zero();
    data.a_gf[0] = root.act_inv_motion(&SpatialVec::new(Vec3::zeros(), -model.gravity));
    data.f[0] = SpatialVec::zero();

    // ── Forward pass: velocities, accelerations and body forces ──
    for i in 1..model.njoints {
        let jm = &model.joints[i];
        let parent = model.parents[i];

        let li_mi = model.joint_placements[i] * jm.calc(q);
        data.li_mi[i] = li_mi;
        data.o_mi[i] = data.o_mi[parent] * li_mi;

        let v_joint = jm.motion(v);
        let vel = li_mi.act_inv_motion(&data.v[parent]) + v_joint;
        let bias = jm.motion(a) + vel.cross_motion(&v_joint);
        data.v[i] = vel;
        data.a[i] = li_mi.act_inv_motion(&data.a[parent]) + bias;
        data.a_gf[i] = li_mi.act_inv_motion(&data.a_gf[parent]) + bias;

        let inertia = &model.inertias[i];
        let mut force = inertia.mul_motion(&data.a_gf[i]) + inertia.vxiv(&vel);
        if let Some(fext) = fext {
            force -= fext[i];
        }
        data.f[i] = force;
    }

    // ── Backward pass: torques and force accumulation ──
    for i in (1..model.njoints).rev() {
        let jm = &model.joints[i];
        let force = data.f[i];
        for k in 0..jm.nv() {
            data.tau[jm.idx_v + k] = jm.kind.motion_subspace_column(k).dot(&force);
        }
        let parent = model.parents[i];
        let transmitted = data.li_mi[i].act_force(&force);
        data.f[parent] += transmitted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use linkage_math::{GRAVITY, Mat3, Placement, SpatialInertia};
    use linkage_model::ModelBuilder;

    /// Single pendulum: revolute about Z, gravity along -Y, rod mass 1kg length 1m.
    fn make_pendulum() -> Model {
        let mass = 1.0;
        let length = 1.0;
        ModelBuilder::new()
            .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
            .add_revolute_body(
                "pendulum",
                0,
                Placement::identity(),
                Vec3::z(),
                SpatialInertia::new(
                    mass,
                    Vec3::new(0.0, -length / 2.0, 0.0),
                    Mat3::from_diagonal(&Vec3::new(
                        mass * length * length / 12.0,
                        0.0,
                        mass * length * length / 12.0,
                    )),
                ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_pendulum_static_torque() {
        // Horizontal pendulum: gravity torque m g L/2.
        let model = make_pendulum();
        let mut data = model.create_data();
        let q = DVec::from_vec(vec![std::f64::consts::FRAC_PI_2]);
        let tau = rnea(&model, &mut data, &q, &DVec::zeros(1), &DVec::zeros(1)).unwrap();
        assert_relative_eq!(tau[0], GRAVITY * 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_pendulum_inertial_torque() {
        // Hanging pendulum accelerated at 2 rad/s²: I_pivot α with I_pivot = m L² / 3.
        let model = make_pendulum();
        let mut data = model.create_data();
        let tau = rnea(
            &model,
            &mut data,
            &DVec::zeros(1),
            &DVec::zeros(1),
            &DVec::from_vec(vec![2.0]),
        )
        .unwrap();
        assert_relative_eq!(tau[0], 2.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_external_force_cancels_gravity() {
        let model = make_pendulum();
        let mut data = model.create_data();
        let q = DVec::from_vec(vec![0.4]);
        let zero = DVec::zeros(1);
        // Push up on the center of mass with m g, expressed in the joint frame.
        let com = model.inertias[1].com;
        let lift = Vec3::new(0.0, GRAVITY, 0.0);
        let joint = model.joint_id("pendulum").unwrap();
        crate::kinematics::forward_kinematics(&model, &mut data, &q).unwrap();
        let local_lift = data.o_mi[joint].rotation.transpose() * lift;
        let fext_joint = SpatialVec::new(com.cross(&local_lift), local_lift);
        let fext = vec![SpatialVec::zero(), fext_joint];
        let tau = rnea_with_external_forces(&model, &mut data, &q, &zero, &zero, &fext).unwrap();
        assert_relative_eq!(tau[0], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fext_length_checked() {
        let model = make_pendulum();
        let mut data = model.create_data();
        let before = data.clone();
        let zero = DVec::zeros(1);
        let err = rnea_with_external_forces(&model, &mut data, &zero, &zero, &zero, &[]).unwrap_err();
        assert_eq!(err, Error::dimension("fext", 2, 0));
        assert_eq!(data, before);
    }

    #[test]
    fn test_free_body_force_is_weight() {
        // A free-floating body held still needs a generalized force equal to its weight.
        let mass = 3.0;
        let model = ModelBuilder::new()
            .add_free_body("base", 0, Placement::identity(), SpatialInertia::sphere(mass, 0.2))
            .build()
            .unwrap();
        let mut data = model.create_data();
        let q = model.neutral();
        let zero = DVec::zeros(6);
        let tau = rnea(&model, &mut data, &q, &zero, &zero).unwrap().clone();
        assert_relative_eq!(tau[5], mass * GRAVITY, epsilon = 1e-10);
        assert_relative_eq!(data.f[0].linear(), Vec3::new(0.0, 0.0, mass * GRAVITY), epsilon = 1e-10);
    }
}
