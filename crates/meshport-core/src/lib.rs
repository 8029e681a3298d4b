//! # meshport-core
//!
//! Batch 3D model conversion through external scene-interchange tools.
//!
//! The crate converts model files between exchange formats (FBX → OBJ by
//! default), optionally reorienting a Z-up authored scene to the Y-up
//! convention, by delegating all parsing, scene-graph construction, and
//! serialization to a collaborator behind the [`SceneBackend`] trait. The
//! shipped [`ToolBackend`] drives an external converter executable as a
//! child process, one invocation per conversion.

pub mod backend;
pub mod batch;
pub mod convert;
pub mod error;
pub mod format;

#[cfg(test)]
pub(crate) mod testutil;

pub use backend::tool::{ToolBackend, ToolSpec};
pub use backend::{EulerRotation, SceneBackend};
pub use batch::{
    BatchFailure, BatchOptions, BatchSummary, ErrorPolicy, ProgressReporter, StdoutReporter,
};
pub use convert::{ConversionJob, Converter};
pub use error::ConvertError;
pub use format::ModelFormat;
