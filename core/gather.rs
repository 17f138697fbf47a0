use crate::config::PackOptions;
use crate::content::{self, ContentMode};
use crate::context::{FileRecord, ProcessingError, SkippedFile, derive_file_type, kb_rounded};
use crate::error::{AppError, Result};
use crate::orchestrate::{ProgressEvent, ProgressSink};
use crate::patterns::get_builtin_tables;
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log;
use std::fs;
use std::path::{Component, Path};

/// The three mutually exclusive buckets discovery produces. A path appears in
/// at most one of them.
#[derive(Debug, Default)]
pub struct GatherOutcome {
    pub files: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    pub errors: Vec<ProcessingError>,
}

/// Enumerates non-directory entries under the validated root, applies the
/// exclusion policy, classifies survivors and loads their content. Individual
/// file errors are always recoverable; no single bad file aborts discovery.
pub fn gather_files(
    root: &Path,
    options: &PackOptions,
    progress: ProgressSink,
) -> Result<GatherOutcome> {
    let tables = get_builtin_tables();
    let exclude_set = build_exclusion_set(&tables.exclude, &options.exclude)?;
    let mode = ContentMode::from_flags(options.compact, options.smart);
    let max_bytes = options.max_file_size_bytes();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_global(false)
        .git_exclude(false)
        .git_ignore(options.respect_gitignore)
        .require_git(false)
        .follow_links(false);
    log::debug!(
        "Walking {} (gitignore: {})",
        root.display(),
        options.respect_gitignore
    );

    let mut outcome = GatherOutcome::default();
    let mut discovered = 0usize;

    for entry_result in builder.build() {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error walking directory: {}", e);
                outcome.errors.push(ProcessingError {
                    message: format!("Walk error: {}", e),
                });
                continue;
            }
        };
        if entry.depth() == 0 || entry.file_type().is_none_or(|ft| ft.is_dir()) {
            continue;
        }

        let path = entry.path();
        let Some(relative) = pathdiff::diff_paths(path, root) else {
            log::warn!("Could not get relative path for: {}", path.display());
            continue;
        };
        // The version-control metadata directory is always implicitly ignored.
        if relative
            .components()
            .any(|c| c == Component::Normal(".git".as_ref()))
        {
            continue;
        }

        let rel_str = relative.to_string_lossy().replace('\\', "/");
        discovered += 1;

        if exclude_set.is_match(&rel_str) {
            log::trace!("Excluded by pattern: {}", rel_str);
            continue;
        }
        // Secondary substring safety net for dependency / virtual-environment
        // directories the pattern pass might miss.
        if tables
            .dependency_markers
            .iter()
            .any(|marker| rel_str.contains(marker.as_str()))
        {
            log::trace!("Excluded by dependency marker: {}", rel_str);
            continue;
        }

        classify_and_load(path, &rel_str, max_bytes, mode, &mut outcome);
        if let Some(cb) = progress {
            cb(ProgressEvent::FileProcessed {
                path: rel_str.clone(),
            });
        }
    }

    if let Some(cb) = progress {
        cb(ProgressEvent::FilesDiscovered { count: discovered });
    }
    log::info!(
        "Discovery complete: {} included, {} skipped (too large), {} errors",
        outcome.files.len(),
        outcome.skipped.len(),
        outcome.errors.len()
    );
    Ok(outcome)
}

/// Binary/allowlist/size classification for one surviving path, then content
/// loading. Exclusion filtering has already happened by the time a path gets
/// here.
fn classify_and_load(
    path: &Path,
    rel_str: &str,
    max_bytes: u64,
    mode: ContentMode,
    outcome: &mut GatherOutcome,
) {
    let tables = get_builtin_tables();
    let name = rel_str.rsplit('/').next().unwrap_or(rel_str);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();

    if !extension.is_empty() && tables.is_binary_extension(&extension) {
        log::trace!("Rejected binary extension: {}", rel_str);
        return;
    }
    let allowed = (!extension.is_empty() && tables.is_source_extension(&extension))
        || tables.is_known_filename(name);
    if !allowed {
        log::trace!("Not in source allowlist: {}", rel_str);
        return;
    }

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("Cannot stat {}: {}", rel_str, e);
            outcome.errors.push(ProcessingError {
                message: format!("Cannot stat {}: {}", rel_str, e),
            });
            return;
        }
    };
    let size_bytes = metadata.len();
    if size_bytes > max_bytes {
        log::debug!(
            "Skipping {} ({} KB over ceiling)",
            rel_str,
            kb_rounded(size_bytes)
        );
        outcome.skipped.push(SkippedFile {
            name: rel_str.to_string(),
            size_kb: kb_rounded(size_bytes),
        });
        return;
    }
    let last_modified: Option<DateTime<Utc>> =
        metadata.modified().ok().map(DateTime::<Utc>::from);

    let content = match read_text(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Cannot read {}: {}", rel_str, e);
            outcome.errors.push(ProcessingError {
                message: e.to_string(),
            });
            return;
        }
    };
    let content = content::transform(&content, &extension, mode);
    let is_empty = content.is_empty();

    outcome.files.push(FileRecord {
        path: rel_str.to_string(),
        absolute_path: path.to_path_buf(),
        size_bytes,
        extension: extension.clone(),
        content,
        last_modified,
        file_type: derive_file_type(name, &extension, is_empty),
        is_empty,
        is_package_marker: name == "__init__.py",
        description: tables.description_for(name).map(String::from),
    });
}

/// Reads a file as UTF-8 text, normalizing CRLF. Non-UTF-8 content in an
/// otherwise eligible file is a recoverable processing error.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| {
        AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "not valid UTF-8 text",
            ),
        }
    })?;
    Ok(text.replace("\r\n", "\n"))
}

/// Builds the run's exclusion glob set. Every configured pattern is expanded
/// so it matches a root-level folder, a nested folder, and a bare name at any
/// depth.
fn build_exclusion_set(defaults: &[String], user: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in defaults.iter().chain(user.iter()) {
        let mut base = pattern.trim().to_string();
        if base.ends_with('/') && base.len() > 1 {
            base.pop();
        }
        if base.is_empty() {
            continue;
        }
        for expanded in [
            base.clone(),
            format!("{}/**", base),
            format!("**/{}", base),
            format!("**/{}/**", base),
        ] {
            let glob = Glob::new(&expanded).map_err(|e| {
                AppError::Glob(format!(
                    "Invalid exclude pattern \"{}\" (expanded as \"{}\"): {}",
                    pattern, expanded, e
                ))
            })?;
            builder.add(glob);
        }
    }
    builder.build().map_err(|e| AppError::Glob(e.to_string()))
}
