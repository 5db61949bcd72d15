//! Criterion benchmarks for the kinematic passes and Jacobians.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linkage_math::{DVec, Matrix6xX, Vec3};
use linkage_model::{Model, ReferenceFrame};
use linkage_rigid::{
    compute_frame_jacobian, compute_joint_jacobians, compute_joint_jacobians_time_variation,
    forward_kinematics, forward_kinematics_with_acceleration, frame_jacobian, rnea,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

/// Deterministic (q, v, a) for a model.
fn sample_state(model: &Model) -> (DVec, DVec, DVec) {
    let mut rng = StdRng::seed_from_u64(42);
    let q = model.random_configuration(&mut rng);
    let v = DVec::from_fn(model.nv, |i, _| 0.1 - 0.05 * i as f64);
    let a = DVec::from_fn(model.nv, |i, _| 0.2 + 0.03 * i as f64);
    (q, v, a)
}

// ---------------------------------------------------------------------------
// Benchmark 1: Mixed tree (free, revolute, spherical, prismatic, fixed)
// ---------------------------------------------------------------------------

fn bench_mixed_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_tree");
    let model = Model::mixed_tree().expect("mixed tree is valid");
    let mut data = model.create_data();
    let (q, v, a) = sample_state(&model);
    let gripper = model.frame_id("gripper").expect("gripper frame");
    let mut jac = Matrix6xX::zeros(model.nv);

    group.bench_function("forward_kinematics", |b| {
        b.iter(|| forward_kinematics(&model, &mut data, black_box(&q)));
    });

    group.bench_function("forward_kinematics_with_acceleration", |b| {
        b.iter(|| forward_kinematics_with_acceleration(&model, &mut data, &q, &v, black_box(&a)));
    });

    group.bench_function("compute_joint_jacobians", |b| {
        b.iter(|| compute_joint_jacobians(&model, &mut data, black_box(&q)));
    });

    group.bench_function("compute_joint_jacobians_then_frame", |b| {
        b.iter(|| {
            let _ = compute_joint_jacobians(&model, &mut data, black_box(&q));
            frame_jacobian(&model, &mut data, gripper, ReferenceFrame::LocalWorldAligned, &mut jac)
        });
    });

    group.bench_function("compute_frame_jacobian", |b| {
        b.iter(|| {
            compute_frame_jacobian(
                &model,
                &mut data,
                black_box(&q),
                gripper,
                ReferenceFrame::LocalWorldAligned,
                &mut jac,
            )
        });
    });

    group.bench_function("jacobians_time_variation", |b| {
        b.iter(|| compute_joint_jacobians_time_variation(&model, &mut data, &q, black_box(&v)));
    });

    group.bench_function("rnea", |b| {
        b.iter(|| rnea(&model, &mut data, &q, &v, black_box(&a)).map(|tau| tau[0]));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 2: Serial chain scaling (n = 5, 20, 50)
// ---------------------------------------------------------------------------

fn bench_chain_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_scaling");

    for &n in &[5, 20, 50] {
        let model = Model::serial_chain(n, 0.5, Vec3::z()).expect("chain is valid");
        let mut data = model.create_data();
        let (q, _, _) = sample_state(&model);
        let tip = model.frame_id("tip").expect("tip frame");
        let mut jac = Matrix6xX::zeros(model.nv);

        group.bench_with_input(BenchmarkId::new("forward_kinematics", n), &n, |b, _| {
            b.iter(|| forward_kinematics(&model, &mut data, black_box(&q)));
        });

        group.bench_with_input(BenchmarkId::new("compute_joint_jacobians", n), &n, |b, _| {
            b.iter(|| compute_joint_jacobians(&model, &mut data, black_box(&q)));
        });

        group.bench_with_input(BenchmarkId::new("compute_frame_jacobian", n), &n, |b, _| {
            b.iter(|| {
                compute_frame_jacobian(&model, &mut data, black_box(&q), tip, ReferenceFrame::Local, &mut jac)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mixed_tree, bench_chain_scaling);
criterion_main!(benches);
