//! Test doubles shared across unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{EulerRotation, SceneBackend};
use crate::batch::{BatchSummary, ProgressReporter};
use crate::error::ConvertError;
use crate::format::ModelFormat;

/// Source content the stub refuses to "parse".
pub(crate) const CORRUPT: &[u8] = b"corrupt";

/// Deterministic byte-level backend: the saved file is a rotation marker
/// line followed by the source bytes, so tests can assert both content
/// equivalence and the exact rotation applied.
pub(crate) struct StubBackend;

pub(crate) struct StubScene {
    bytes: Vec<u8>,
    rotation: Option<EulerRotation>,
}

impl SceneBackend for StubBackend {
    type Scene = StubScene;

    fn load(&self, path: &Path) -> Result<StubScene, ConvertError> {
        let bytes = fs::read(path).map_err(|e| ConvertError::import(path, e))?;
        if bytes.as_slice() == CORRUPT {
            return Err(ConvertError::import(path, "unparseable scene"));
        }
        Ok(StubScene {
            bytes,
            rotation: None,
        })
    }

    fn set_root_rotation(
        &self,
        scene: &mut StubScene,
        rotation: EulerRotation,
    ) -> Result<(), ConvertError> {
        scene.rotation = Some(rotation);
        Ok(())
    }

    fn save(&self, scene: &StubScene, path: &Path) -> Result<(), ConvertError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ModelFormat::from_extension(ext).is_none() {
            return Err(ConvertError::export(
                path,
                format!("unsupported target extension '{ext}'"),
            ));
        }

        let mut out = match scene.rotation {
            Some(r) => format!("rotated({},{},{})\n", r.x, r.y, r.z).into_bytes(),
            None => b"unrotated\n".to_vec(),
        };
        out.extend_from_slice(&scene.bytes);
        fs::write(path, out).map_err(|e| ConvertError::export(path, e))
    }
}

/// Reporter recording notices for assertions.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub converted: Vec<PathBuf>,
    pub finished: usize,
}

impl ProgressReporter for RecordingReporter {
    fn converted(&mut self, dest: &Path) {
        self.converted.push(dest.to_path_buf());
    }

    fn finished(&mut self, _summary: &BatchSummary) {
        self.finished += 1;
    }
}
