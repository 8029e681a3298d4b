//! Scene-interchange backend boundary.
//!
//! Parsing, scene-graph construction, and serialization all happen behind
//! [`SceneBackend`]; the core pipeline only sequences load → optional root
//! rotation → save. Implementations are swappable per deployment; the
//! shipped one ([`tool::ToolBackend`]) shells out to an external converter
//! executable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

pub mod tool;

/// A per-axis scene root rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerRotation {
    /// Rotation around the X axis, in degrees.
    pub x: f64,
    /// Rotation around the Y axis, in degrees.
    pub y: f64,
    /// Rotation around the Z axis, in degrees.
    pub z: f64,
}

impl EulerRotation {
    /// Reorients a Z-up authored scene to the Y-up convention.
    pub const Z_UP_TO_Y_UP: Self = Self::new(-90.0, 0.0, 0.0);

    /// Create a rotation from per-axis degrees.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The external scene-interchange collaborator.
///
/// One conversion exclusively owns its scene handle from `load` until the
/// handle is dropped; dropping releases whatever state the backend holds,
/// on success and failure alike.
pub trait SceneBackend {
    /// Opaque in-memory representation of one loaded scene.
    type Scene;

    /// Load the file at `path` into a scene handle.
    ///
    /// Fails with [`ConvertError::Import`] when the source is missing,
    /// unreadable, or not parseable in a supported format.
    fn load(&self, path: &Path) -> Result<Self::Scene, ConvertError>;

    /// Set the scene root's local rotation.
    ///
    /// Fails with [`ConvertError::RotationUnsupported`] when the backend
    /// has no way to reorient the scene.
    fn set_root_rotation(
        &self,
        scene: &mut Self::Scene,
        rotation: EulerRotation,
    ) -> Result<(), ConvertError>;

    /// Save the scene to `path` in the format implied by its extension.
    ///
    /// Fails with [`ConvertError::Export`] when the destination cannot be
    /// written or the target format is unsupported.
    fn save(&self, scene: &Self::Scene, path: &Path) -> Result<(), ConvertError>;
}
