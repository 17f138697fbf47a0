//! Top-level run sequencing: validate, gather, assemble the shared context,
//! then generate (and optionally persist) each requested format. The context
//! is built exactly once; every format observes identical data.

use crate::config::{OutputFormat, PackOptions};
use crate::context::{PackContext, ProcessingError, SkippedFile};
use crate::error::{AppError, Result};
use crate::formats;
use crate::gather;
use crate::validate;
use std::fs;
use std::path::PathBuf;

/// Milestones reported to an optional caller-supplied callback. The core
/// never prints these itself.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    FileProcessed { path: String },
    FilesDiscovered { count: usize },
    FormatGenerated { format: OutputFormat, bytes: usize },
    DocumentWritten { format: OutputFormat, path: PathBuf },
    RunComplete { written: usize, failed: usize },
}

pub type ProgressSink<'a> = Option<&'a dyn Fn(ProgressEvent)>;

/// One document that was generated (and written, unless the run was dry).
#[derive(Debug, Clone)]
pub struct WrittenDocument {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub bytes: usize,
}

/// A format that failed during an all-formats run. Single-format runs
/// propagate the error instead.
#[derive(Debug)]
pub struct FailedFormat {
    pub format: OutputFormat,
    pub error: AppError,
}

/// Everything the CLI summary needs about a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub source: PathBuf,
    pub dry_run: bool,
    pub total_files: usize,
    pub architecture: String,
    pub skipped: Vec<SkippedFile>,
    pub errors: Vec<ProcessingError>,
    pub written: Vec<WrittenDocument>,
    pub failed: Vec<FailedFormat>,
}

/// Runs one full pack: path validation (fatal on failure), sequential
/// discovery, context assembly, then one generation pass per requested
/// format. In all-formats mode a failing format is recorded and the rest
/// still run; in single-format mode the failure is the run's failure.
pub fn run(options: &PackOptions, progress: ProgressSink) -> Result<RunSummary> {
    let root = validate::validate_source_path(&options.source)?;
    log::info!("Packing {}", root.display());

    let outcome = gather::gather_files(&root, options, progress)?;
    let context = PackContext::assemble(
        outcome.files,
        outcome.skipped,
        outcome.errors,
        &root,
        options,
    );

    let requested = options.requested_formats();
    let single_format = requested.len() == 1;

    let mut summary = RunSummary {
        source: root,
        dry_run: options.dry_run,
        total_files: context.metadata.total_files,
        architecture: context.analysis.architecture.clone(),
        skipped: context.skipped.clone(),
        errors: context.errors.clone(),
        written: Vec::new(),
        failed: Vec::new(),
    };

    for format in requested {
        match produce(&context, format, options, progress) {
            Ok(written) => summary.written.push(written),
            Err(e) if single_format => return Err(e),
            Err(e) => {
                log::warn!("{} generation failed: {}", format, e);
                summary.failed.push(FailedFormat { format, error: e });
            }
        }
    }

    if let Some(cb) = progress {
        cb(ProgressEvent::RunComplete {
            written: summary.written.len(),
            failed: summary.failed.len(),
        });
    }
    Ok(summary)
}

/// Generates one document, enforces the aggregate size ceiling before any
/// byte is written, then persists it unless the run is dry.
fn produce(
    context: &PackContext,
    format: OutputFormat,
    options: &PackOptions,
    progress: ProgressSink,
) -> Result<WrittenDocument> {
    let document = formats::generate(context, format)?;
    let bytes = document.byte_len();
    if let Some(cb) = progress {
        cb(ProgressEvent::FormatGenerated { format, bytes });
    }
    if bytes > options.max_output_bytes {
        return Err(AppError::OutputTooLarge {
            format: format.tag().to_string(),
            actual: bytes,
            limit: options.max_output_bytes,
        });
    }

    let path = output_path(options, format);
    if options.dry_run {
        log::info!(
            "Dry run: would write {} ({} bytes) to {}",
            format,
            bytes,
            path.display()
        );
        return Ok(WrittenDocument {
            format,
            path,
            bytes,
        });
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|source| AppError::DirCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, &document.text).map_err(|source| AppError::FileWrite {
        path: path.clone(),
        source,
    })?;
    log::info!("Wrote {} ({} bytes) to {}", format, bytes, path.display());
    if let Some(cb) = progress {
        cb(ProgressEvent::DocumentWritten {
            format,
            path: path.clone(),
        });
    }
    Ok(WrittenDocument {
        format,
        path,
        bytes,
    })
}

fn output_path(options: &PackOptions, format: OutputFormat) -> PathBuf {
    let mut name = options
        .output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "codepack-output".to_string());
    name.push('.');
    name.push_str(format.extension());
    options.output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn options_for(source: &Path, output: &Path) -> PackOptions {
        PackOptions {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            ..PackOptions::default()
        }
    }

    fn seed_project(dir: &Path) {
        fs::write(dir.join("README.md"), "# Demo\n").unwrap();
        fs::write(dir.join("package.json"), "{\"name\":\"demo\"}\n").unwrap();
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("src/index.js"), "console.log(1);\n").unwrap();
    }

    #[test]
    fn single_format_run_writes_one_document() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let options = options_for(src.path(), &out.path().join("ctx"));

        let summary = run(&options, None).unwrap();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.written.len(), 1);
        assert!(summary.failed.is_empty());
        let written = &summary.written[0];
        assert_eq!(written.path, out.path().join("ctx.md"));
        let text = fs::read_to_string(&written.path).unwrap();
        assert!(text.contains("# Code Context:"));
    }

    #[test]
    fn all_formats_run_writes_nine_documents() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let mut options = options_for(src.path(), &out.path().join("ctx"));
        options.all_formats = true;

        let summary = run(&options, None).unwrap();
        assert_eq!(summary.written.len(), 9);
        assert!(summary.failed.is_empty());
        for written in &summary.written {
            assert!(written.path.exists(), "{} missing", written.path.display());
        }
        // Distinct extensions, so nine distinct paths.
        let mut paths: Vec<_> = summary.written.iter().map(|w| &w.path).collect();
        paths.dedup();
        assert_eq!(paths.len(), 9);
    }

    #[test]
    fn dry_run_reports_sizes_without_writing() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let mut options = options_for(src.path(), &out.path().join("ctx"));
        options.dry_run = true;

        let summary = run(&options, None).unwrap();
        assert!(summary.dry_run);
        assert_eq!(summary.written.len(), 1);
        assert!(summary.written[0].bytes > 0);
        assert!(!summary.written[0].path.exists());
    }

    #[test]
    fn oversized_document_aborts_before_writing() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let mut options = options_for(src.path(), &out.path().join("ctx"));
        options.max_output_bytes = 10;

        let err = run(&options, None).unwrap_err();
        assert!(matches!(err, AppError::OutputTooLarge { .. }));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Output too large"), "{err}");
        assert!(!out.path().join("ctx.md").exists());
    }

    #[test]
    fn all_formats_records_failures_and_continues() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let mut options = options_for(src.path(), &out.path().join("ctx"));
        options.all_formats = true;
        options.max_output_bytes = 10;

        let summary = run(&options, None).unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(summary.failed.len(), 9);
    }

    #[test]
    fn invalid_source_is_fatal() {
        let out = tempdir().unwrap();
        let options = options_for(
            Path::new("/definitely/not/a/real/dir"),
            &out.path().join("ctx"),
        );
        let err = run(&options, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn progress_callback_sees_discovery_and_writes() {
        let src = tempdir().unwrap();
        seed_project(src.path());
        let out = tempdir().unwrap();
        let options = options_for(src.path(), &out.path().join("ctx"));

        let events: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| {
            let tag = match event {
                ProgressEvent::FileProcessed { .. } => "processed",
                ProgressEvent::FilesDiscovered { .. } => "discovered",
                ProgressEvent::FormatGenerated { .. } => "generated",
                ProgressEvent::DocumentWritten { .. } => "written",
                ProgressEvent::RunComplete { .. } => "complete",
            };
            events.lock().unwrap().push(tag.to_string());
        };
        run(&options, Some(&sink)).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.iter().filter(|e| *e == "processed").count(), 3);
        assert_eq!(events.iter().filter(|e| *e == "discovered").count(), 1);
        assert_eq!(events.iter().filter(|e| *e == "written").count(), 1);
        // Completion is signaled exactly once, after everything else.
        assert_eq!(events.iter().filter(|e| *e == "complete").count(), 1);
        assert_eq!(events.last().map(String::as_str), Some("complete"));
    }
}
