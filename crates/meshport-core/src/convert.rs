//! Single-file scene conversion.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::{EulerRotation, SceneBackend};
use crate::error::ConvertError;

/// One conversion work item: source, destination, and whether to reorient
/// the scene root from Z-up to Y-up.
///
/// Transient — jobs are independent of each other and carry no cross-job
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Path of the file to load.
    pub source: PathBuf,
    /// Path to write; its extension selects the output format.
    pub dest: PathBuf,
    /// Whether to apply the Z-up → Y-up root rotation.
    pub rotate: bool,
}

impl ConversionJob {
    /// Create a job.
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>, rotate: bool) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            rotate,
        }
    }
}

/// Converts scene files one at a time through a [`SceneBackend`].
#[derive(Debug, Clone)]
pub struct Converter<B: SceneBackend> {
    backend: B,
}

impl<B: SceneBackend> Converter<B> {
    /// Create a converter over a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one conversion: load, optionally rotate the root, save.
    ///
    /// The scene handle is dropped when this returns, releasing backend
    /// state on every exit path. Errors propagate unmodified; no retries,
    /// and no atomic-replace guarantee for an existing destination.
    pub fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        tracing::debug!(
            source = %job.source.display(),
            dest = %job.dest.display(),
            rotate = job.rotate,
            "converting scene"
        );

        let mut scene = self.backend.load(&job.source)?;
        if job.rotate {
            self.backend
                .set_root_rotation(&mut scene, EulerRotation::Z_UP_TO_Y_UP)?;
        }
        self.backend.save(&scene, &job.dest)
    }

    /// Convenience wrapper over [`Converter::convert`].
    pub fn convert_file(
        &self,
        source: &Path,
        dest: &Path,
        rotate: bool,
    ) -> Result<(), ConvertError> {
        self.convert(&ConversionJob::new(source, dest, rotate))
    }
}
