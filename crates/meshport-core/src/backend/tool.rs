//! External conversion tools driven as child processes.
//!
//! Executes a configured converter executable once per conversion, with
//! placeholder-substituted arguments, timeout enforcement, and output
//! validation.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::backend::{EulerRotation, SceneBackend};
use crate::error::ConvertError;

/// Poll interval while waiting for the child process.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maximum stderr characters carried into an error message.
const MAX_STDERR_CHARS: usize = 2000;

/// Python expression for a headless Blender import → rotate → export pass.
///
/// Receives `-- <input> <output> <rot_x> <rot_y> <rot_z>` on the command
/// line; rotation is in degrees and applied to every parentless object.
const BLENDER_EXPR: &str = r#"
import bpy, math, sys
argv = sys.argv[sys.argv.index('--') + 1:]
src, dst = argv[0], argv[1]
rot = [math.radians(float(v)) for v in argv[2:5]]
bpy.ops.wm.read_factory_settings(use_empty=True)
ext = src.rsplit('.', 1)[-1].lower()
if ext == 'fbx':
    bpy.ops.import_scene.fbx(filepath=src)
elif ext in ('gltf', 'glb'):
    bpy.ops.import_scene.gltf(filepath=src)
elif ext == 'obj':
    bpy.ops.wm.obj_import(filepath=src)
elif ext == 'dae':
    bpy.ops.wm.collada_import(filepath=src)
else:
    raise SystemExit('unsupported import format: ' + ext)
for obj in bpy.context.scene.objects:
    if obj.parent is None:
        obj.rotation_euler = rot
out = dst.rsplit('.', 1)[-1].lower()
if out == 'obj':
    bpy.ops.wm.obj_export(filepath=dst)
elif out == 'fbx':
    bpy.ops.export_scene.fbx(filepath=dst)
elif out in ('gltf', 'glb'):
    bpy.ops.export_scene.gltf(filepath=dst)
elif out == 'dae':
    bpy.ops.wm.collada_export(filepath=dst)
else:
    raise SystemExit('unsupported export format: ' + out)
"#;

/// Configuration for one external conversion tool.
///
/// `args_template` entries may carry the placeholders `{input}`,
/// `{output}`, `{rot_x}`, `{rot_y}`, and `{rot_z}`; they are substituted
/// before the process is spawned. A template without rotation placeholders
/// cannot honor a reorientation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Executable name or path.
    pub command: String,
    /// Argument template, substituted per conversion.
    pub args_template: Vec<String>,
    /// Timeout in seconds for a single tool invocation.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Minimum output file size (bytes) to consider a conversion successful.
    #[serde(default = "default_min_output_bytes")]
    pub min_output_bytes: u64,
}

fn default_timeout_seconds() -> u64 {
    600
}

fn default_min_output_bytes() -> u64 {
    1
}

impl ToolSpec {
    /// The Assimp command-line tool (`assimp export`).
    ///
    /// Fast and widely packaged, but has no way to reorient the scene
    /// root; use it for `rotate = false` pipelines.
    pub fn assimp() -> Self {
        Self {
            command: "assimp".to_string(),
            args_template: vec![
                "export".to_string(),
                "{input}".to_string(),
                "{output}".to_string(),
            ],
            timeout_seconds: default_timeout_seconds(),
            min_output_bytes: default_min_output_bytes(),
        }
    }

    /// Headless Blender driving [`BLENDER_EXPR`]; rotation-capable.
    pub fn blender() -> Self {
        Self {
            command: "blender".to_string(),
            args_template: vec![
                "--background".to_string(),
                "--factory-startup".to_string(),
                "--python-expr".to_string(),
                BLENDER_EXPR.to_string(),
                "--".to_string(),
                "{input}".to_string(),
                "{output}".to_string(),
                "{rot_x}".to_string(),
                "{rot_y}".to_string(),
                "{rot_z}".to_string(),
            ],
            timeout_seconds: default_timeout_seconds(),
            min_output_bytes: default_min_output_bytes(),
        }
    }

    /// Whether the template can carry a root rotation through to the tool.
    pub fn supports_rotation(&self) -> bool {
        self.args_template
            .iter()
            .any(|arg| arg.contains("{rot_x}") || arg.contains("{rot_y}") || arg.contains("{rot_z}"))
    }

    /// Substitute template placeholders for one conversion.
    pub fn substitute_args(
        &self,
        input: &Path,
        output: &Path,
        rotation: EulerRotation,
    ) -> Result<Vec<String>, ConvertError> {
        let input = path_str(input)?;
        let output = path_str(output)?;

        Ok(self
            .args_template
            .iter()
            .map(|arg| {
                arg.replace("{input}", input)
                    .replace("{output}", output)
                    .replace("{rot_x}", &rotation.x.to_string())
                    .replace("{rot_y}", &rotation.y.to_string())
                    .replace("{rot_z}", &rotation.z.to_string())
            })
            .collect())
    }
}

fn path_str(path: &Path) -> Result<&str, ConvertError> {
    path.to_str().ok_or_else(|| ConvertError::InvalidUtf8Path {
        path: path.to_path_buf(),
    })
}

/// Pending conversion state for [`ToolBackend`].
///
/// The tool performs load and save in a single process invocation, so the
/// scene handle is the validated source path plus any requested
/// reorientation; the actual parse happens inside the child process when
/// the handle is saved. A source that exists but is unparseable therefore
/// surfaces at save time as an export failure carrying the tool's stderr.
#[derive(Debug)]
pub struct PendingScene {
    source: PathBuf,
    rotation: Option<EulerRotation>,
}

/// [`SceneBackend`] implementation that shells out to an external
/// conversion executable, one child process per conversion, nothing pooled.
#[derive(Debug, Clone)]
pub struct ToolBackend {
    spec: ToolSpec,
}

impl ToolBackend {
    /// Create a backend from a tool spec.
    pub fn new(spec: ToolSpec) -> Self {
        Self { spec }
    }

    /// Get the tool spec.
    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Check if the tool is available on the system.
    pub fn check_available(&self) -> bool {
        let finder = if cfg!(target_os = "windows") {
            "where"
        } else {
            "which"
        };

        Command::new(finder)
            .arg(&self.spec.command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Spawn the tool, enforce the timeout, and validate the output file.
    fn run_tool(&self, args: &[String], dest: &Path) -> Result<(), ConvertError> {
        let spec = &self.spec;
        let start = Instant::now();

        tracing::info!(
            command = %spec.command,
            dest = %dest.display(),
            "executing conversion tool"
        );

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConvertError::export(dest, format!("cannot create parent directory: {e}")))?;
            }
        }

        let mut child = Command::new(&spec.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ConvertError::export(dest, format!("failed to launch '{}': {e}", spec.command))
            })?;

        let timeout = Duration::from_secs(spec.timeout_seconds);
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                tracing::error!(command = %spec.command, "conversion tool timed out");
                return Err(ConvertError::export(
                    dest,
                    format!("'{}' timed out after {}s", spec.command, spec.timeout_seconds),
                ));
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        // stderr is drained only after exit; a tool that fills the pipe
        // buffer without exiting is reaped by the timeout above.
        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            tracing::error!(command = %spec.command, code, "conversion tool failed");
            return Err(ConvertError::export(
                dest,
                format!(
                    "'{}' exited with code {}: {}",
                    spec.command,
                    code,
                    stderr.trim().chars().take(MAX_STDERR_CHARS).collect::<String>()
                ),
            ));
        }

        let size = std::fs::metadata(dest)
            .map(|m| m.len())
            .map_err(|_| ConvertError::export(dest, "output file not created"))?;
        if size < spec.min_output_bytes {
            return Err(ConvertError::export(
                dest,
                format!("output file is empty ({size} bytes)"),
            ));
        }

        tracing::info!(
            command = %spec.command,
            duration_ms = start.elapsed().as_millis() as u64,
            size,
            "conversion tool completed"
        );

        Ok(())
    }
}

impl SceneBackend for ToolBackend {
    type Scene = PendingScene;

    fn load(&self, path: &Path) -> Result<PendingScene, ConvertError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ConvertError::import(path, e))?;
        if !metadata.is_file() {
            return Err(ConvertError::import(path, "not a regular file"));
        }

        Ok(PendingScene {
            source: path.to_path_buf(),
            rotation: None,
        })
    }

    fn set_root_rotation(
        &self,
        scene: &mut PendingScene,
        rotation: EulerRotation,
    ) -> Result<(), ConvertError> {
        if !self.spec.supports_rotation() {
            return Err(ConvertError::RotationUnsupported {
                command: self.spec.command.clone(),
            });
        }
        scene.rotation = Some(rotation);
        Ok(())
    }

    fn save(&self, scene: &PendingScene, path: &Path) -> Result<(), ConvertError> {
        let rotation = scene.rotation.unwrap_or(EulerRotation::new(0.0, 0.0, 0.0));
        let args = self.spec.substitute_args(&scene.source, path, rotation)?;
        self.run_tool(&args, path)
    }
}
