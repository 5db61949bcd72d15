//! Kinematic model and data types for linkage.
//!
//! `Model` is the static description of a kinematic tree (topology, joint
//! kinds, fixed placements, frames, inertias). `Data` is the mutable scratch
//! storage the kinematic passes write into; one `Data` per concurrent
//! evaluation, all of them sharing the same read-only `Model`.

pub mod data;
pub mod error;
pub mod factories;
pub mod frame;
pub mod joint;
pub mod model;

pub use data::Data;
pub use error::{Error, Result};
pub use frame::{Convention, Frame, FrameKind, ReferenceFrame};
pub use joint::{JointKind, JointModel};
pub use model::{Model, ModelBuilder};
