use crate::analyze::{Analysis, analyze_paths};
use crate::config::PackOptions;
use crate::patterns::get_builtin_tables;
use crate::priority;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// Canonical in-memory representation of one included file. Immutable once
/// produced; every output strategy observes identical content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Root-relative path with `/` separators. Unique key.
    pub path: String,
    pub absolute_path: PathBuf,
    pub size_bytes: u64,
    pub extension: String,
    /// Raw or transformed text, selected once per run by mode.
    pub content: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// Derived classification tag (source, config, documentation, ...).
    pub file_type: String,
    pub is_empty: bool,
    pub is_package_marker: bool,
    /// Human label for well-known basenames.
    pub description: Option<String>,
}

impl FileRecord {
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn size_kb(&self) -> u64 {
        kb_rounded(self.size_bytes)
    }

    #[cfg(test)]
    pub fn for_tests(path: &str, content: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let extension = name.rsplit('.').next().filter(|e| *e != name).unwrap_or("");
        FileRecord {
            path: path.to_string(),
            absolute_path: PathBuf::from(path),
            size_bytes: content.len() as u64,
            extension: extension.to_string(),
            content: content.to_string(),
            last_modified: None,
            file_type: derive_file_type(name, extension, content.is_empty()),
            is_empty: content.is_empty(),
            is_package_marker: name == "__init__.py",
            description: None,
        }
    }
}

/// Files excluded solely for exceeding the per-file size ceiling. Retained
/// for reporting, never serialized into content-bearing sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    /// Rounded size in KB.
    #[serde(rename = "size")]
    pub size_kb: u64,
}

/// Non-fatal read/stat failures. Accumulated, never thrown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingError {
    pub message: String,
}

/// Active options echoed into every document's metadata block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOptions {
    pub compact: bool,
    pub smart: bool,
    /// Per-file ceiling in KB, serialized as `maxFileSize`.
    #[serde(rename = "maxFileSize")]
    pub max_file_size_kb: u64,
    #[serde(rename = "respectIgnoreFile")]
    pub respect_gitignore: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub source_path: String,
    pub total_files: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    /// Counts by classification tag, insertion-ordered.
    pub file_types: IndexMap<String, usize>,
    pub options: ActiveOptions,
}

/// Everything the nine strategies consume: included files in priority order,
/// the report-only buckets, the shared analysis and the run metadata.
/// Recomputed once per run and shared across all formats.
#[derive(Debug, Clone)]
pub struct PackContext {
    pub files: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    pub errors: Vec<ProcessingError>,
    pub analysis: Analysis,
    pub metadata: RunMetadata,
}

impl PackContext {
    pub fn assemble(
        mut files: Vec<FileRecord>,
        skipped: Vec<SkippedFile>,
        errors: Vec<ProcessingError>,
        source_path: &std::path::Path,
        options: &PackOptions,
    ) -> Self {
        priority::sort_records(&mut files);

        let relative_paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let analysis = analyze_paths(&relative_paths);
        log::debug!(
            "Analysis complete: architecture='{}', {} technologies, {} patterns",
            analysis.architecture,
            analysis.technologies.len(),
            analysis.patterns.len()
        );

        let mut file_types: IndexMap<String, usize> = IndexMap::new();
        for file in &files {
            *file_types.entry(file.file_type.clone()).or_insert(0) += 1;
        }

        let metadata = RunMetadata {
            generated_at: Utc::now(),
            source_path: source_path.to_string_lossy().to_string(),
            total_files: files.len(),
            skipped_count: skipped.len(),
            error_count: errors.len(),
            file_types,
            options: ActiveOptions {
                compact: options.compact,
                smart: options.smart,
                max_file_size_kb: options.max_file_size_kb,
                respect_gitignore: options.respect_gitignore,
            },
        };

        PackContext {
            files,
            skipped,
            errors,
            analysis,
            metadata,
        }
    }

    /// Relative paths of empty package-marker files, used by the expected-
    /// empty notes of several formats.
    pub fn empty_marker_paths(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.is_package_marker && f.is_empty)
            .map(|f| f.path.as_str())
            .collect()
    }
}

pub fn kb_rounded(bytes: u64) -> u64 {
    (bytes as f64 / 1024.0).round() as u64
}

/// Derives the classification tag for one file. Empty package markers get a
/// dedicated tag so a consuming model never mistakes them for missing code.
pub fn derive_file_type(name: &str, extension: &str, is_empty: bool) -> String {
    if name == "__init__.py" && is_empty {
        return "package-marker".to_string();
    }
    let tables = get_builtin_tables();
    let lower_name = name.to_lowercase();
    let ext = extension.to_lowercase();

    let tag = if tables.build_filenames.iter().any(|f| f == name) {
        "build"
    } else if lower_name.starts_with("readme")
        || lower_name.starts_with("license")
        || matches!(ext.as_str(), "md" | "markdown" | "rst" | "txt")
    {
        "documentation"
    } else if matches!(ext.as_str(), "css" | "scss" | "sass" | "less") {
        "stylesheet"
    } else if matches!(ext.as_str(), "html" | "htm" | "xml") {
        "markup"
    } else if matches!(
        ext.as_str(),
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env"
    ) || tables.config_filenames.iter().any(|f| f == name)
    {
        "config"
    } else {
        "source"
    };
    tag.to_string()
}
