//! The JSON-like family: plain JSON, YAML, TOML and JSON-LD. All four project
//! the same context; TOML drops the `description`/`relativePath` fields and
//! flattens the active options into the metadata table, JSON-LD adds
//! `@context`/`@type`/`@id` keys alongside the same data.

use crate::context::{FileRecord, PackContext, ProcessingError, SkippedFile};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

const MARKER_NOTE: &str =
    "Empty package-marker files (e.g. __init__.py) are expected to be empty; they signal an importable package, not missing code.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry<'a> {
    pub path: String,
    pub relative_path: &'a str,
    pub size: u64,
    pub extension: &'a str,
    pub content: &'a str,
    pub file_type: &'a str,
    pub is_empty: bool,
    pub is_package_marker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl<'a> FileEntry<'a> {
    fn from_record(record: &'a FileRecord) -> Self {
        FileEntry {
            path: record.absolute_path.to_string_lossy().to_string(),
            relative_path: &record.path,
            size: record.size_bytes,
            extension: &record.extension,
            content: &record.content,
            file_type: &record.file_type,
            is_empty: record.is_empty,
            is_package_marker: record.is_package_marker,
            description: record.description.as_deref(),
            last_modified: record.last_modified,
        }
    }
}

/// Shared top-level shape of the structured formats. The binary-archive
/// strategy encodes exactly this representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument<'a> {
    pub metadata: &'a crate::context::RunMetadata,
    pub analysis: &'a crate::analyze::Analysis,
    pub files: Vec<FileEntry<'a>>,
    pub skipped_files: &'a [SkippedFile],
    pub errors: &'a [ProcessingError],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

pub fn build_document(context: &PackContext) -> StructuredDocument<'_> {
    let mut notes = Vec::new();
    let markers = context.empty_marker_paths();
    if !markers.is_empty() {
        notes.push(format!("{} ({})", MARKER_NOTE, markers.join(", ")));
    }
    StructuredDocument {
        metadata: &context.metadata,
        analysis: &context.analysis,
        files: context.files.iter().map(FileEntry::from_record).collect(),
        skipped_files: &context.skipped,
        errors: &context.errors,
        notes,
    }
}

pub fn to_json(context: &PackContext) -> Result<String> {
    serde_json::to_string_pretty(&build_document(context)).map_err(AppError::JsonSerialize)
}

pub fn to_yaml(context: &PackContext) -> Result<String> {
    serde_yml::to_string(&build_document(context)).map_err(AppError::YamlSerialize)
}

pub fn to_jsonld(context: &PackContext) -> Result<String> {
    let mut value = serde_json::to_value(build_document(context))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("@context".to_string(), json!("https://schema.org"));
        obj.insert("@type".to_string(), json!("SoftwareSourceCode"));
        obj.insert(
            "@id".to_string(),
            json!(context.metadata.source_path.clone()),
        );
        if let Some(files) = obj.get_mut("files").and_then(|f| f.as_array_mut()) {
            for file in files {
                if let Some(entry) = file.as_object_mut() {
                    let id = entry
                        .get("relativePath")
                        .and_then(|p| p.as_str())
                        .unwrap_or("")
                        .to_string();
                    entry.insert("@type".to_string(), json!("SoftwareSourceCode"));
                    entry.insert("@id".to_string(), json!(id));
                }
            }
        }
    }
    serde_json::to_string_pretty(&value).map_err(AppError::JsonSerialize)
}

// TOML cannot express nulls and rejects values after tables, so it gets its
// own projection: scalar metadata (options inlined) before the type-count
// table, entries without description or relativePath.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TomlMetadata<'a> {
    generated_at: DateTime<Utc>,
    source_path: &'a str,
    total_files: usize,
    skipped_count: usize,
    error_count: usize,
    compact: bool,
    smart: bool,
    #[serde(rename = "maxFileSize")]
    max_file_size_kb: u64,
    #[serde(rename = "respectIgnoreFile")]
    respect_gitignore: bool,
    file_types: &'a indexmap::IndexMap<String, usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TomlFileEntry<'a> {
    path: &'a str,
    size: u64,
    extension: &'a str,
    content: &'a str,
    file_type: &'a str,
    is_empty: bool,
    is_package_marker: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TomlDocument<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    metadata: TomlMetadata<'a>,
    analysis: &'a crate::analyze::Analysis,
    files: Vec<TomlFileEntry<'a>>,
    skipped_files: &'a [SkippedFile],
    errors: &'a [ProcessingError],
}

pub fn to_toml(context: &PackContext) -> Result<String> {
    let mut notes = Vec::new();
    let markers = context.empty_marker_paths();
    if !markers.is_empty() {
        notes.push(format!("{} ({})", MARKER_NOTE, markers.join(", ")));
    }
    let document = TomlDocument {
        notes,
        metadata: TomlMetadata {
            generated_at: context.metadata.generated_at,
            source_path: &context.metadata.source_path,
            total_files: context.metadata.total_files,
            skipped_count: context.metadata.skipped_count,
            error_count: context.metadata.error_count,
            compact: context.metadata.options.compact,
            smart: context.metadata.options.smart,
            max_file_size_kb: context.metadata.options.max_file_size_kb,
            respect_gitignore: context.metadata.options.respect_gitignore,
            file_types: &context.metadata.file_types,
        },
        analysis: &context.analysis,
        files: context
            .files
            .iter()
            .map(|record| TomlFileEntry {
                path: &record.path,
                size: record.size_bytes,
                extension: &record.extension,
                content: &record.content,
                file_type: &record.file_type,
                is_empty: record.is_empty,
                is_package_marker: record.is_package_marker,
            })
            .collect(),
        skipped_files: &context.skipped,
        errors: &context.errors,
    };
    toml::to_string(&document).map_err(AppError::TomlSerialize)
}
