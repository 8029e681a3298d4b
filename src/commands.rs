//! CLI surface: argument parsing and command dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use meshport_core::{
    BatchOptions, ConversionJob, Converter, ErrorPolicy, ModelFormat, ToolBackend, ToolSpec,
};

/// Batch 3D model format converter.
#[derive(Debug, Parser)]
#[command(name = "meshport", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Conversion tool preset to drive (assimp | blender).
    #[arg(long, global = true, default_value = "blender")]
    tool: String,

    /// Override the timeout in seconds for one tool invocation.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Skip the Z-up → Y-up root rotation.
    #[arg(long, global = true)]
    no_rotate: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a single model file.
    Convert {
        /// Source model file.
        source: PathBuf,
        /// Destination file; its extension selects the output format.
        dest: PathBuf,
    },
    /// Recursively convert every matching file under a directory.
    Dir {
        /// Root directory to walk.
        root: PathBuf,
        /// Source format extension to match.
        #[arg(long, default_value = "fbx")]
        from: String,
        /// Target format extension.
        #[arg(long, default_value = "obj")]
        to: String,
        /// Keep going after a failed file and report failures at the end.
        #[arg(long)]
        keep_going: bool,
        /// Print the batch summary as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let mut spec = match self.tool.as_str() {
            "assimp" => ToolSpec::assimp(),
            "blender" => ToolSpec::blender(),
            other => bail!("unknown tool preset '{}' (expected 'assimp' or 'blender')", other),
        };
        if let Some(timeout) = self.timeout {
            spec.timeout_seconds = timeout;
        }

        let backend = ToolBackend::new(spec);
        if !backend.check_available() {
            bail!(
                "conversion tool '{}' not found on PATH",
                backend.spec().command
            );
        }
        let converter = Converter::new(backend);
        let rotate = !self.no_rotate;

        match self.command {
            Commands::Convert { source, dest } => {
                converter.convert(&ConversionJob::new(source, &dest, rotate))?;
                println!("Converted: {}", dest.display());
                Ok(())
            }
            Commands::Dir {
                root,
                from,
                to,
                keep_going,
                json,
            } => {
                let options = BatchOptions {
                    source: parse_format(&from)?,
                    target: parse_format(&to)?,
                    rotate,
                    on_error: if keep_going {
                        ErrorPolicy::Continue
                    } else {
                        ErrorPolicy::Abort
                    },
                };

                let summary = converter.convert_dir(&root, &options)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }

                if !summary.is_success() {
                    for failure in &summary.failures {
                        eprintln!("failed: {}: {}", failure.source.display(), failure.error);
                    }
                    bail!(
                        "{} of {} files failed to convert",
                        summary.failures.len(),
                        summary.failures.len() + summary.converted.len()
                    );
                }
                Ok(())
            }
        }
    }
}

fn parse_format(ext: &str) -> Result<ModelFormat> {
    ModelFormat::from_extension(ext)
        .with_context(|| format!("unsupported model format '{}'", ext))
}
