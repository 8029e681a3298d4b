//! Known model interchange formats, keyed by file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported model interchange formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// FBX (Filmbox)
    Fbx,
    /// OBJ (Wavefront)
    Obj,
    /// glTF (JSON)
    Gltf,
    /// glTF (binary)
    Glb,
    /// COLLADA
    Collada,
    /// STL (Stereolithography)
    Stl,
    /// PLY (Polygon File Format)
    Ply,
    /// 3DS (3D Studio)
    ThreeDs,
}

impl ModelFormat {
    /// Determine the format from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "fbx" => Some(Self::Fbx),
            "obj" => Some(Self::Obj),
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            "dae" => Some(Self::Collada),
            "stl" => Some(Self::Stl),
            "ply" => Some(Self::Ply),
            "3ds" => Some(Self::ThreeDs),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Fbx => "fbx",
            Self::Obj => "obj",
            Self::Gltf => "gltf",
            Self::Glb => "glb",
            Self::Collada => "dae",
            Self::Stl => "stl",
            Self::Ply => "ply",
            Self::ThreeDs => "3ds",
        }
    }

    /// Get the display name for this format
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fbx => "FBX",
            Self::Obj => "Wavefront OBJ",
            Self::Gltf => "glTF",
            Self::Glb => "glTF Binary",
            Self::Collada => "COLLADA",
            Self::Stl => "STL",
            Self::Ply => "PLY",
            Self::ThreeDs => "3D Studio",
        }
    }

    /// Whether a path carries this format's extension, compared
    /// case-insensitively
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
