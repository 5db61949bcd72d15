//! Frames attached to joints, and the conventions used to express motions.

use linkage_math::{Placement, SpatialInertia};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a frame stands for. Used only to filter lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameKind {
    /// User-defined point of interest (end effector, tool tip).
    Operational,
    /// Frame placed at a joint.
    Joint,
    /// Frame standing in for a joint that was merged into its parent.
    FixedJoint,
    /// Frame of a rigid body.
    Body,
    /// Frame of a sensor.
    Sensor,
}

/// A named frame rigidly attached to a joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    pub name: String,
    /// Joint the frame moves with.
    pub parent_joint: usize,
    /// Previous frame in the frame tree (a frame with a smaller index).
    pub parent_frame: usize,
    /// Placement of the frame relative to its parent joint.
    pub placement: Placement,
    pub kind: FrameKind,
    /// Inertia carried by the frame, expressed in the frame itself.
    pub inertia: SpatialInertia,
}

impl Frame {
    /// Massless frame.
    pub fn new(
        name: impl Into<String>,
        parent_joint: usize,
        parent_frame: usize,
        placement: Placement,
        kind: FrameKind,
    ) -> Self {
        Self {
            name: name.into(),
            parent_joint,
            parent_frame,
            placement,
            kind,
            inertia: SpatialInertia::zero(),
        }
    }

    /// Attach an inertia to the frame.
    pub fn with_inertia(mut self, inertia: SpatialInertia) -> Self {
        self.inertia = inertia;
        self
    }
}

/// Axes and reference point in which a spatial motion or a Jacobian is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceFrame {
    /// Axes and origin of the frame itself.
    #[default]
    Local,
    /// World axes, referenced about the world origin.
    World,
    /// World axes, referenced about the frame origin.
    LocalWorldAligned,
}

/// Convention for relative placements between two joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Convention {
    /// Compose the global placements `oMi`.
    World,
    /// Compose the parent-relative placements `liMi` through the common ancestor.
    #[default]
    Local,
}
