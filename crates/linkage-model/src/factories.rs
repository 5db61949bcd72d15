//! Factory methods for common kinematic trees.
//!
//! These constructors produce ready-made [`Model`] instances used by the
//! tests and benchmarks of the workspace.

use crate::{Frame, FrameKind, Model, ModelBuilder, Result};
use linkage_math::{Mat3, Placement, SpatialInertia, Vec3};

impl Model {
    /// Serial chain of `n` revolute joints about `axis`, with links of
    /// `link_length` along the local X axis.
    ///
    /// Joint `i + 1` sits at the end of link `i`; the first joint sits at the
    /// world origin. Each link is a uniform 1 kg rod. An `Operational` frame
    /// called `"tip"` marks the end of the last link.
    pub fn serial_chain(n: usize, link_length: f64, axis: Vec3) -> Result<Self> {
        let link = Placement::from_translation(Vec3::new(link_length, 0.0, 0.0));
        let mut builder = ModelBuilder::new();
        for i in 0..n {
            let placement = if i == 0 { Placement::identity() } else { link };
            builder = builder.add_revolute_body(
                &format!("joint{}", i + 1),
                i,
                placement,
                axis,
                SpatialInertia::rod(1.0, link_length),
            );
        }
        let previous = builder.body_frame(n).unwrap_or(0);
        builder
            .add_frame(Frame::new("tip", n, previous, link, FrameKind::Operational))
            .build()
    }

    /// Small branching tree that uses every joint kind.
    ///
    /// ```text
    /// universe
    ///  └─ base (free)
    ///      ├─ shoulder (revolute y) ─ elbow (revolute, skewed axis) ─ wrist (spherical)
    ///      ├─ slider (prismatic x) ─ bracket (fixed)
    ///      └─ neck (spherical)
    /// ```
    ///
    /// Operational frames: `"gripper"` on the wrist, `"tool"` on the bracket,
    /// `"camera"` on the neck.
    pub fn mixed_tree() -> Result<Self> {
        let box_inertia = |mass: f64, com: Vec3| {
            SpatialInertia::new(
                mass,
                com,
                Mat3::from_diagonal(&Vec3::new(0.02, 0.03, 0.04)) * mass,
            )
        };
        let builder = ModelBuilder::new()
            .gravity(Vec3::new(0.0, 0.0, -linkage_math::GRAVITY))
            .add_free_body("base", 0, Placement::identity(), box_inertia(5.0, Vec3::zeros()))
            .add_revolute_body(
                "shoulder",
                1,
                Placement::from_translation(Vec3::new(0.1, 0.2, 0.3)),
                Vec3::y(),
                box_inertia(1.5, Vec3::new(0.2, 0.0, 0.0)),
            )
            .add_revolute_body(
                "elbow",
                2,
                Placement::new(
                    Placement::rot_x(0.3).rotation,
                    Vec3::new(0.4, 0.0, 0.0),
                ),
                Vec3::new(0.0, 0.6, 0.8),
                box_inertia(1.0, Vec3::new(0.15, 0.05, 0.0)),
            )
            .add_spherical_body(
                "wrist",
                3,
                Placement::from_translation(Vec3::new(0.3, 0.0, 0.0)),
                box_inertia(0.5, Vec3::new(0.0, 0.0, 0.05)),
            )
            .add_prismatic_body(
                "slider",
                1,
                Placement::rot_z(0.5),
                Vec3::x(),
                box_inertia(0.8, Vec3::new(0.0, 0.1, 0.0)),
            )
            .add_fixed_body(
                "bracket",
                5,
                Placement::from_translation(Vec3::new(0.0, 0.0, -0.2)),
                box_inertia(0.3, Vec3::zeros()),
            )
            .add_spherical_body(
                "neck",
                1,
                Placement::from_translation(Vec3::new(0.0, 0.0, 0.5)),
                box_inertia(1.2, Vec3::new(0.0, 0.0, 0.1)),
            );

        let wrist_body = builder.body_frame(4).unwrap_or(0);
        let bracket_body = builder.body_frame(6).unwrap_or(0);
        let neck_body = builder.body_frame(7).unwrap_or(0);
        builder
            .add_frame(Frame::new(
                "gripper",
                4,
                wrist_body,
                Placement::new(Placement::rot_y(0.7).rotation, Vec3::new(0.1, 0.0, 0.05)),
                FrameKind::Operational,
            ))
            .add_frame(
                Frame::new(
                    "tool",
                    6,
                    bracket_body,
                    Placement::from_translation(Vec3::new(0.05, -0.1, 0.0)),
                    FrameKind::Operational,
                )
                .with_inertia(SpatialInertia::point_mass(0.2, Vec3::zeros())),
            )
            .add_frame(Frame::new(
                "camera",
                7,
                neck_body,
                Placement::new(Placement::rot_z(-0.4).rotation, Vec3::new(0.0, 0.05, 0.1)),
                FrameKind::Sensor,
            ))
            .build()
    }
}
