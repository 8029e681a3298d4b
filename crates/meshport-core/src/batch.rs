//! Directory-recursive batch driver.
//!
//! A single linear pass: walk the tree, convert every file whose extension
//! matches the configured source format, notify a progress reporter. No
//! retries, no resumption, no checkpointing.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::backend::SceneBackend;
use crate::convert::{ConversionJob, Converter};
use crate::error::ConvertError;
use crate::format::ModelFormat;

/// What to do when a single file fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop the batch at the first failing file and propagate its error.
    #[default]
    Abort,
    /// Log the failure, record it in the summary, and keep going.
    Continue,
}

/// Options for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Source format to match, by extension, case-insensitively.
    pub source: ModelFormat,
    /// Target format for derived destination paths.
    pub target: ModelFormat,
    /// Whether to apply the Z-up → Y-up root rotation.
    pub rotate: bool,
    /// Per-file failure handling.
    pub on_error: ErrorPolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source: ModelFormat::Fbx,
            target: ModelFormat::Obj,
            rotate: true,
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// A file that failed to convert during a [`ErrorPolicy::Continue`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The source file that failed.
    pub source: PathBuf,
    /// The rendered conversion error.
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Destination paths written, in visit order.
    pub converted: Vec<PathBuf>,
    /// Files that failed; empty under [`ErrorPolicy::Abort`].
    pub failures: Vec<BatchFailure>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Whether every matched file converted.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Observer for batch progress notices.
pub trait ProgressReporter {
    /// Called after each successful conversion with the destination path.
    fn converted(&mut self, dest: &Path);
    /// Called once after the traversal completes.
    fn finished(&mut self, summary: &BatchSummary);
}

/// Reporter printing human-readable notices to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn converted(&mut self, dest: &Path) {
        println!("Converting: {}", dest.display());
    }

    fn finished(&mut self, _summary: &BatchSummary) {
        println!("Conversion done.");
    }
}

impl<B: SceneBackend> Converter<B> {
    /// Convert every matching file under `root`, reporting to stdout.
    pub fn convert_dir(
        &self,
        root: &Path,
        options: &BatchOptions,
    ) -> Result<BatchSummary, ConvertError> {
        self.convert_dir_with(root, options, &mut StdoutReporter)
    }

    /// Convert every matching file under `root`.
    ///
    /// Every regular file reachable under `root` (subdirectories included)
    /// whose extension matches `options.source` is converted to a sibling
    /// destination with the same stem and the target extension. Entries are
    /// visited in a sorted depth-first order, but callers must not rely on
    /// it. Traversal failures abort the run regardless of the error policy.
    pub fn convert_dir_with(
        &self,
        root: &Path,
        options: &BatchOptions,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchSummary, ConvertError> {
        let start = Instant::now();
        let mut summary = BatchSummary::default();

        tracing::info!(
            root = %root.display(),
            source = %options.source,
            target = %options.target,
            rotate = options.rotate,
            "starting batch conversion"
        );

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ConvertError::Traversal { path, source }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let source = entry.path();
            if !options.source.matches_path(source) {
                continue;
            }

            let dest = source.with_extension(options.target.extension());
            if dest == source {
                // Same extension for source and target would clobber the input.
                tracing::warn!(path = %source.display(), "destination equals source, skipping");
                continue;
            }

            let job = ConversionJob::new(source, &dest, options.rotate);
            match self.convert(&job) {
                Ok(()) => {
                    summary.converted.push(dest.clone());
                    reporter.converted(&dest);
                }
                Err(err) => match options.on_error {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Continue => {
                        tracing::error!(
                            source = %source.display(),
                            error = %err,
                            "conversion failed, continuing"
                        );
                        summary.failures.push(BatchFailure {
                            source: source.to_path_buf(),
                            error: err.to_string(),
                        });
                    }
                },
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            converted = summary.converted.len(),
            failed = summary.failures.len(),
            duration_ms = summary.duration_ms,
            "batch conversion finished"
        );

        reporter.finished(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingReporter, StubBackend, CORRUPT};
    use std::fs;

    /// Lay down `{a.fbx, b.FBX, c.obj, sub/d.fbx}` under a fresh tempdir.
    fn mixed_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.fbx"), b"scene a").unwrap();
        fs::write(dir.path().join("b.FBX"), b"scene b").unwrap();
        fs::write(dir.path().join("c.obj"), b"not a source").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/d.fbx"), b"scene d").unwrap();
        dir
    }

    #[test]
    fn converts_matching_files_including_nested() {
        let dir = mixed_tree();
        let converter = Converter::new(StubBackend);
        let mut reporter = RecordingReporter::default();

        let summary = converter
            .convert_dir_with(dir.path(), &BatchOptions::default(), &mut reporter)
            .unwrap();

        let expected = vec![
            dir.path().join("a.obj"),
            dir.path().join("b.obj"),
            dir.path().join("sub/d.obj"),
        ];
        assert_eq!(summary.converted, expected);
        assert!(summary.is_success());

        // One progress notice per conversion, in visit order, then one
        // completion notice.
        assert_eq!(reporter.converted, expected);
        assert_eq!(reporter.finished, 1);

        for dest in &expected {
            assert!(fs::read(dest).unwrap().starts_with(b"rotated(-90,0,0)\n"));
        }
    }

    #[test]
    fn non_matching_files_are_untouched() {
        let dir = mixed_tree();
        let converter = Converter::new(StubBackend);

        converter
            .convert_dir(dir.path(), &BatchOptions::default())
            .unwrap();

        assert_eq!(fs::read(dir.path().join("c.obj")).unwrap(), b"not a source");

        // Exactly three new files, nothing else.
        let count = WalkDir::new(dir.path())
            .into_iter()
            .filter(|e| e.as_ref().unwrap().file_type().is_file())
            .count();
        assert_eq!(count, 7);
    }

    #[test]
    fn rotate_flag_reaches_every_job() {
        let dir = mixed_tree();
        let converter = Converter::new(StubBackend);
        let options = BatchOptions {
            rotate: false,
            ..Default::default()
        };

        converter.convert_dir(dir.path(), &options).unwrap();

        assert!(
            fs::read(dir.path().join("a.obj"))
                .unwrap()
                .starts_with(b"unrotated\n")
        );
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let dir = mixed_tree();
        fs::write(dir.path().join("a.fbx"), CORRUPT).unwrap();
        let converter = Converter::new(StubBackend);

        let err = converter
            .convert_dir(dir.path(), &BatchOptions::default())
            .unwrap_err();

        assert!(matches!(err, ConvertError::Import { .. }));
        // a.fbx sorts first, so nothing after it was converted.
        assert!(!dir.path().join("a.obj").exists());
        assert!(!dir.path().join("b.obj").exists());
        assert!(!dir.path().join("sub/d.obj").exists());
    }

    #[test]
    fn continue_policy_records_failures_and_keeps_going() {
        let dir = mixed_tree();
        fs::write(dir.path().join("a.fbx"), CORRUPT).unwrap();
        let converter = Converter::new(StubBackend);
        let options = BatchOptions {
            on_error: ErrorPolicy::Continue,
            ..Default::default()
        };

        let summary = converter.convert_dir(dir.path(), &options).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].source, dir.path().join("a.fbx"));
        assert_eq!(
            summary.converted,
            vec![dir.path().join("b.obj"), dir.path().join("sub/d.obj")]
        );
        assert!(dir.path().join("sub/d.obj").exists());
    }

    #[test]
    fn rerun_is_idempotent() {
        let dir = mixed_tree();
        let converter = Converter::new(StubBackend);
        let options = BatchOptions::default();

        converter.convert_dir(dir.path(), &options).unwrap();
        let first = fs::read(dir.path().join("a.obj")).unwrap();

        converter.convert_dir(dir.path(), &options).unwrap();
        let second = fs::read(dir.path().join("a.obj")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn identical_source_and_target_extension_is_skipped() {
        let dir = mixed_tree();
        let converter = Converter::new(StubBackend);
        let options = BatchOptions {
            source: ModelFormat::Obj,
            target: ModelFormat::Obj,
            ..Default::default()
        };

        let summary = converter.convert_dir(dir.path(), &options).unwrap();

        assert!(summary.converted.is_empty());
        assert_eq!(fs::read(dir.path().join("c.obj")).unwrap(), b"not a source");
    }

    #[test]
    fn missing_root_is_traversal_failure_even_when_continuing() {
        let converter = Converter::new(StubBackend);
        let options = BatchOptions {
            on_error: ErrorPolicy::Continue,
            ..Default::default()
        };

        let err = converter
            .convert_dir(Path::new("/nonexistent/meshport-root"), &options)
            .unwrap_err();

        assert!(matches!(err, ConvertError::Traversal { .. }));
    }

    #[test]
    fn empty_tree_still_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let converter = Converter::new(StubBackend);
        let mut reporter = RecordingReporter::default();

        let summary = converter
            .convert_dir_with(dir.path(), &BatchOptions::default(), &mut reporter)
            .unwrap();

        assert!(summary.converted.is_empty());
        assert!(reporter.converted.is_empty());
        assert_eq!(reporter.finished, 1);
    }
}
