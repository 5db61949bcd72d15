//! Model definition: the static description of a kinematic tree.

use crate::{Error, Frame, FrameKind, JointKind, JointModel, Result};
use linkage_math::{DVec, GRAVITY, Matrix6xX, Placement, SpatialInertia, Vec3};
use rand::Rng;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Static model describing the topology and parameters of an articulated system.
///
/// Joint 0 is the universe: it has no degrees of freedom and its placement is
/// the root placement of the tree. Joints are ordered so that every parent
/// index is smaller than the index of its child. Frame 0 is the universe frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    /// Number of joints, universe included.
    pub njoints: usize,
    /// Number of frames, universe frame included.
    pub nframes: usize,
    /// Dimension of the configuration vector.
    pub nq: usize,
    /// Dimension of the velocity vector.
    pub nv: usize,
    /// Joint names.
    pub names: Vec<String>,
    /// Parent joint of each joint (`parents[0] == 0`).
    pub parents: Vec<usize>,
    /// Placement of each joint frame relative to its parent joint.
    pub joint_placements: Vec<Placement>,
    /// Joint kinds and their offsets in `q` and `v`.
    pub joints: Vec<JointModel>,
    /// Body inertia moving with each joint, expressed in the joint frame.
    pub inertias: Vec<SpatialInertia>,
    /// Direct children of each joint.
    pub children: Vec<Vec<usize>>,
    /// Path from the universe to each joint, both ends included.
    pub supports: Vec<Vec<usize>>,
    /// Each joint followed by all of its descendants, in increasing order.
    pub subtrees: Vec<Vec<usize>>,
    pub frames: Vec<Frame>,
    /// Gravity vector in world frame.
    pub gravity: Vec3,
}

impl Model {
    /// Index of the joint called `name`.
    pub fn joint_id(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index of the first frame called `name`, whatever its kind.
    pub fn frame_id(&self, name: &str) -> Option<usize> {
        self.frames.iter().position(|f| f.name == name)
    }

    /// Index of the frame called `name` with the given kind.
    pub fn frame_id_of_kind(&self, name: &str, kind: FrameKind) -> Option<usize> {
        self.frames
            .iter()
            .position(|f| f.name == name && f.kind == kind)
    }

    /// True if `ancestor` lies on the path from the universe to `joint`.
    pub fn is_ancestor(&self, ancestor: usize, joint: usize) -> bool {
        self.supports
            .get(joint)
            .is_some_and(|path| path.contains(&ancestor))
    }

    /// Neutral configuration: zero angles and translations, identity quaternions.
    pub fn neutral(&self) -> DVec {
        let mut q = DVec::zeros(self.nq);
        for jm in &self.joints {
            jm.kind
                .neutral(&mut q.as_mut_slice()[jm.idx_q..jm.idx_q + jm.nq()]);
        }
        q
    }

    /// Random valid configuration (see [`JointKind::random_configuration`]).
    pub fn random_configuration<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec {
        let mut q = DVec::zeros(self.nq);
        for jm in &self.joints {
            jm.kind
                .random_configuration(rng, &mut q.as_mut_slice()[jm.idx_q..jm.idx_q + jm.nq()]);
        }
        q
    }

    pub fn check_configuration(&self, q: &DVec) -> Result<()> {
        check_len("q", self.nq, q.len())
    }

    pub fn check_velocity(&self, v: &DVec) -> Result<()> {
        check_len("v", self.nv, v.len())
    }

    pub fn check_acceleration(&self, a: &DVec) -> Result<()> {
        check_len("a", self.nv, a.len())
    }

    pub fn check_joint(&self, joint: usize) -> Result<()> {
        if joint < self.njoints {
            Ok(())
        } else {
            Err(Error::out_of_range("joint", joint, self.njoints))
        }
    }

    pub fn check_frame(&self, frame: usize) -> Result<()> {
        if frame < self.nframes {
            Ok(())
        } else {
            Err(Error::out_of_range("frame", frame, self.nframes))
        }
    }

    /// A caller-provided Jacobian must have `nv` columns.
    pub fn check_jacobian(&self, jacobian: &Matrix6xX) -> Result<()> {
        check_len("jacobian columns", self.nv, jacobian.ncols())
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::dimension(what, expected, actual))
    }
}

/// Builder for constructing models.
///
/// Every `add_*_body` call adds one joint together with a `Joint` frame named
/// after it and a `Body` frame named `"{name}_body"` that carries the body
/// inertia. Topology errors are reported by [`ModelBuilder::build`].
pub struct ModelBuilder {
    names: Vec<String>,
    parents: Vec<usize>,
    placements: Vec<Placement>,
    kinds: Vec<JointKind>,
    frames: Vec<Frame>,
    body_frames: Vec<usize>,
    gravity: Vec3,
}

impl ModelBuilder {
    /// Start building a new model containing only the universe.
    pub fn new() -> Self {
        Self {
            names: vec!["universe".to_string()],
            parents: vec![0],
            placements: vec![Placement::identity()],
            kinds: vec![JointKind::Fixed],
            frames: vec![Frame::new(
                "universe",
                0,
                0,
                Placement::identity(),
                FrameKind::FixedJoint,
            )],
            body_frames: vec![0],
            gravity: Vec3::new(0.0, 0.0, -GRAVITY),
        }
    }

    /// Set the gravity vector.
    pub fn gravity(mut self, g: Vec3) -> Self {
        self.gravity = g;
        self
    }

    /// Set the placement of the tree root in the world (`oMi[0]`).
    pub fn root_placement(mut self, placement: Placement) -> Self {
        self.placements[0] = placement;
        self
    }

    /// Add a joint of any kind attached to joint `parent` (0 = universe).
    ///
    /// `placement` is the joint frame relative to the parent joint frame and
    /// `inertia` is the body's spatial inertia in the joint frame.
    pub fn add_joint(
        mut self,
        name: &str,
        parent: usize,
        kind: JointKind,
        placement: Placement,
        inertia: SpatialInertia,
    ) -> Self {
        let joint_id = self.names.len();
        self.names.push(name.to_string());
        self.parents.push(parent);
        self.placements.push(placement);
        self.kinds.push(kind);

        let previous = self.body_frames.get(parent).copied().unwrap_or(0);
        let joint_frame = self.frames.len();
        self.frames.push(Frame::new(
            name,
            joint_id,
            previous,
            Placement::identity(),
            FrameKind::Joint,
        ));
        let body_frame = self.frames.len();
        self.frames.push(
            Frame::new(
                format!("{name}_body"),
                joint_id,
                joint_frame,
                Placement::identity(),
                FrameKind::Body,
            )
            .with_inertia(inertia),
        );
        self.body_frames.push(body_frame);
        self
    }

    /// Add a body with a revolute joint about `axis`.
    pub fn add_revolute_body(
        self,
        name: &str,
        parent: usize,
        placement: Placement,
        axis: Vec3,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointKind::revolute(axis), placement, inertia)
    }

    /// Add a body with a prismatic joint along `axis`.
    pub fn add_prismatic_body(
        self,
        name: &str,
        parent: usize,
        placement: Placement,
        axis: Vec3,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointKind::prismatic(axis), placement, inertia)
    }

    /// Add a body with a spherical (ball) joint.
    pub fn add_spherical_body(
        self,
        name: &str,
        parent: usize,
        placement: Placement,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointKind::Spherical, placement, inertia)
    }

    /// Add a body with a free joint (6 DOF).
    pub fn add_free_body(
        self,
        name: &str,
        parent: usize,
        placement: Placement,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointKind::Free, placement, inertia)
    }

    /// Add a body with a fixed joint (0 DOF).
    pub fn add_fixed_body(
        self,
        name: &str,
        parent: usize,
        placement: Placement,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointKind::Fixed, placement, inertia)
    }

    /// Add an extra frame. Its inertia, if any, is added to its parent joint's body.
    pub fn add_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Index the next added frame will get.
    pub fn next_frame_id(&self) -> usize {
        self.frames.len()
    }

    /// Index of the `Body` frame of `joint`, if that joint was added.
    pub fn body_frame(&self, joint: usize) -> Option<usize> {
        self.body_frames.get(joint).copied()
    }

    /// Validate the description and build the model.
    pub fn build(mut self) -> Result<Model> {
        let njoints = self.names.len();
        let nframes = self.frames.len();

        for i in 1..njoints {
            if self.parents[i] >= i {
                return Err(Error::invalid_model(format!(
                    "joint {i} ({}) has parent {} which is not an earlier joint",
                    self.names[i], self.parents[i]
                )));
            }
            if self.names[..i].contains(&self.names[i]) {
                return Err(Error::invalid_model(format!(
                    "duplicate joint name {:?}",
                    self.names[i]
                )));
            }
        }

        for (i, kind) in self.kinds.iter_mut().enumerate() {
            if let Some(axis) = kind.axis_mut() {
                let norm = axis.norm();
                if norm.is_nan() || norm <= 1e-12 {
                    return Err(Error::invalid_model(format!(
                        "joint {i} ({}) has a zero axis",
                        self.names[i]
                    )));
                }
                if (norm - 1.0).abs() > 1e-9 {
                    warn!(joint = %self.names[i], norm, "normalizing joint axis");
                    *axis /= norm;
                }
            }
        }

        for (f, frame) in self.frames.iter().enumerate() {
            if frame.parent_joint >= njoints {
                return Err(Error::invalid_model(format!(
                    "frame {f} ({}) is attached to missing joint {}",
                    frame.name, frame.parent_joint
                )));
            }
            if f > 0 && frame.parent_frame >= f {
                return Err(Error::invalid_model(format!(
                    "frame {f} ({}) has parent frame {} which is not an earlier frame",
                    frame.name, frame.parent_frame
                )));
            }
        }

        let mut nq = 0;
        let mut nv = 0;
        let mut joints = Vec::with_capacity(njoints);
        for kind in &self.kinds {
            joints.push(JointModel::new(*kind, nq, nv));
            nq += kind.nq();
            nv += kind.nv();
        }

        let mut inertias = vec![SpatialInertia::zero(); njoints];
        for frame in &self.frames {
            inertias[frame.parent_joint] += frame.placement.act_inertia(&frame.inertia);
        }

        let mut children = vec![Vec::new(); njoints];
        for i in 1..njoints {
            children[self.parents[i]].push(i);
        }

        let mut supports: Vec<Vec<usize>> = Vec::with_capacity(njoints);
        supports.push(vec![0]);
        for i in 1..njoints {
            let mut path = supports[self.parents[i]].clone();
            path.push(i);
            supports.push(path);
        }

        let mut subtrees: Vec<Vec<usize>> = vec![Vec::new(); njoints];
        for i in (0..njoints).rev() {
            let mut subtree = vec![i];
            for &c in &children[i] {
                subtree.extend_from_slice(&subtrees[c]);
            }
            subtree.sort_unstable();
            subtrees[i] = subtree;
        }

        debug!(njoints, nframes, nq, nv, "built kinematic model");

        Ok(Model {
            njoints,
            nframes,
            nq,
            nv,
            names: self.names,
            parents: self.parents,
            joint_placements: self.placements,
            joints,
            inertias,
            children,
            supports,
            subtrees,
            frames: self.frames,
            gravity: self.gravity,
        })
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tree() -> Model {
        // universe
        //  └─ base (free)
        //      ├─ arm (revolute z) ── hand (spherical)
        //      └─ leg (prismatic x)
        let body = SpatialInertia::sphere(1.0, 0.1);
        ModelBuilder::new()
            .add_free_body("base", 0, Placement::identity(), body)
            .add_revolute_body(
                "arm",
                1,
                Placement::from_translation(Vec3::new(0.0, 0.2, 0.0)),
                Vec3::z(),
                body,
            )
            .add_prismatic_body("leg", 1, Placement::identity(), Vec3::x(), body)
            .add_spherical_body(
                "hand",
                2,
                Placement::from_translation(Vec3::new(0.5, 0.0, 0.0)),
                body,
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_dimensions_and_offsets() {
        let model = tree();
        assert_eq!(model.njoints, 5);
        assert_eq!(model.nframes, 1 + 2 * 4);
        assert_eq!(model.nq, 7 + 1 + 1 + 4);
        assert_eq!(model.nv, 6 + 1 + 1 + 3);
        let idx_v: Vec<usize> = model.joints.iter().map(|j| j.idx_v).collect();
        assert_eq!(idx_v, vec![0, 0, 6, 7, 8]);
        let idx_q: Vec<usize> = model.joints.iter().map(|j| j.idx_q).collect();
        assert_eq!(idx_q, vec![0, 0, 7, 8, 9]);
    }

    #[test]
    fn test_topology() {
        let model = tree();
        assert_eq!(model.parents, vec![0, 0, 1, 1, 2]);
        assert_eq!(model.children[1], vec![2, 3]);
        assert_eq!(model.supports[4], vec![0, 1, 2, 4]);
        assert_eq!(model.subtrees[1], vec![1, 2, 3, 4]);
        assert_eq!(model.subtrees[3], vec![3]);
        assert!(model.is_ancestor(1, 4));
        assert!(!model.is_ancestor(3, 4));
    }

    #[test]
    fn test_frames_and_lookup() {
        let model = tree();
        let arm = model.joint_id("arm").unwrap();
        let joint_frame = model.frame_id("arm").unwrap();
        let body_frame = model.frame_id_of_kind("arm_body", FrameKind::Body).unwrap();
        assert_eq!(model.frames[joint_frame].kind, FrameKind::Joint);
        assert_eq!(model.frames[body_frame].parent_joint, arm);
        assert_eq!(model.frames[body_frame].parent_frame, joint_frame);
        // The arm's joint frame hangs off the base's body frame.
        let base_body = model.frame_id("base_body").unwrap();
        assert_eq!(model.frames[joint_frame].parent_frame, base_body);
        assert_eq!(model.frame_id_of_kind("arm", FrameKind::Body), None);
        assert_eq!(model.joint_id("missing"), None);
    }

    #[test]
    fn test_frame_inertia_is_added_to_joint() {
        let extra = SpatialInertia::point_mass(2.0, Vec3::zeros());
        let model = ModelBuilder::new()
            .add_revolute_body(
                "j1",
                0,
                Placement::identity(),
                Vec3::z(),
                SpatialInertia::point_mass(1.0, Vec3::zeros()),
            )
            .add_frame(
                Frame::new(
                    "payload",
                    1,
                    2,
                    Placement::from_translation(Vec3::new(0.3, 0.0, 0.0)),
                    FrameKind::Operational,
                )
                .with_inertia(extra),
            )
            .build()
            .unwrap();
        assert_relative_eq!(model.inertias[1].mass, 3.0);
        assert_relative_eq!(model.inertias[1].com, Vec3::new(0.2, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_parent_must_precede_child() {
        let err = ModelBuilder::new()
            .add_revolute_body("a", 1, Placement::identity(), Vec3::z(), SpatialInertia::zero())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidModel { .. }));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let err = ModelBuilder::new()
            .add_prismatic_body("p", 0, Placement::identity(), Vec3::zeros(), SpatialInertia::zero())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("zero axis"));
    }

    #[test]
    fn test_axis_is_normalized() {
        let model = ModelBuilder::new()
            .add_revolute_body(
                "r",
                0,
                Placement::identity(),
                Vec3::new(0.0, 0.0, 2.0),
                SpatialInertia::zero(),
            )
            .build()
            .unwrap();
        assert_relative_eq!(model.joints[1].kind.axis().unwrap(), Vec3::z());
    }

    #[test]
    fn test_bad_frames_rejected() {
        let dangling = ModelBuilder::new()
            .add_frame(Frame::new("f", 3, 0, Placement::identity(), FrameKind::Sensor))
            .build();
        assert!(dangling.is_err());

        let forward = ModelBuilder::new()
            .add_frame(Frame::new("f", 0, 5, Placement::identity(), FrameKind::Sensor))
            .build();
        assert!(forward.is_err());
    }

    #[test]
    fn test_duplicate_joint_names_rejected() {
        let err = ModelBuilder::new()
            .add_fixed_body("a", 0, Placement::identity(), SpatialInertia::zero())
            .add_fixed_body("a", 1, Placement::identity(), SpatialInertia::zero())
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_configurations() {
        let model = tree();
        let q0 = model.neutral();
        assert_eq!(q0.len(), model.nq);
        // free joint quaternion is [0, 0, 0, 1]
        assert_eq!(q0[6], 1.0);
        assert_eq!(q0[12], 1.0);

        let mut rng = StdRng::seed_from_u64(42);
        let q = model.random_configuration(&mut rng);
        assert!(model.check_configuration(&q).is_ok());
        let quat = linkage_math::Quat::from_xyzw(&q.as_slice()[9..13]);
        assert_relative_eq!(quat.norm(), 1.0, epsilon = 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let model = tree();
        let json = serde_json::to_string(&model).unwrap();
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names, model.names);
        assert_eq!(back.parents, model.parents);
        assert_eq!(back.subtrees, model.subtrees);
        assert_eq!(back.frames.len(), model.frames.len());
        for (a, b) in back.joint_placements.iter().zip(&model.joint_placements) {
            assert!(a.is_approx(b, 1e-12));
        }
        for (a, b) in back.inertias.iter().zip(&model.inertias) {
            assert!(a.is_approx(b, 1e-12));
        }
    }

    #[test]
    fn test_checks() {
        let model = tree();
        assert!(model.check_configuration(&DVec::zeros(3)).unwrap_err().is_dimension_mismatch());
        assert!(model.check_velocity(&DVec::zeros(model.nv)).is_ok());
        assert!(model.check_acceleration(&DVec::zeros(model.nq)).is_err());
        assert!(model.check_joint(model.njoints).unwrap_err().is_out_of_range());
        assert!(model.check_frame(model.nframes - 1).is_ok());
        assert!(model.check_jacobian(&Matrix6xX::zeros(model.nv + 1)).is_err());
    }
}
