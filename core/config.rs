use crate::error::{AppError, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Default per-file size ceiling in KB. Files above this are recorded as
/// skipped, never serialized into content sections.
pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 500;

/// Aggregate ceiling for one fully generated output document. A document
/// exceeding this aborts the run before anything is written.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// How many skipped/errored entries the human summary previews before
/// collapsing the rest into an overflow count.
pub const SUMMARY_PREVIEW_CAP: usize = 5;

/// The nine output format tags. Format is always passed explicitly into the
/// generation entry point; it is never stored as shared run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Smart,
    MdYaml,
    Json,
    Yaml,
    Toml,
    JsonLd,
    MsgPack,
    Dsl,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 9] = [
        OutputFormat::Markdown,
        OutputFormat::Smart,
        OutputFormat::MdYaml,
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Toml,
        OutputFormat::JsonLd,
        OutputFormat::MsgPack,
        OutputFormat::Dsl,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Smart => "smart",
            OutputFormat::MdYaml => "mdyaml",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Toml => "toml",
            OutputFormat::JsonLd => "jsonld",
            OutputFormat::MsgPack => "msgpack",
            OutputFormat::Dsl => "dsl",
        }
    }

    /// File extension used when persisting a document of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Smart => "smart.md",
            OutputFormat::MdYaml => "mdyaml.md",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Toml => "toml",
            OutputFormat::JsonLd => "jsonld",
            OutputFormat::MsgPack => "msgpack.txt",
            OutputFormat::Dsl => "dsl",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "smart" => Ok(OutputFormat::Smart),
            "mdyaml" | "frontmatter" => Ok(OutputFormat::MdYaml),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "toml" => Ok(OutputFormat::Toml),
            "jsonld" | "json-ld" => Ok(OutputFormat::JsonLd),
            "msgpack" => Ok(OutputFormat::MsgPack),
            "dsl" => Ok(OutputFormat::Dsl),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Plain configuration record consumed from the CLI layer. The core never
/// parses flags itself.
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// User-supplied input path, validated and canonicalized before any walk.
    pub source: PathBuf,
    /// Base path (without extension) for persisted documents.
    pub output: PathBuf,
    /// User exclude patterns, applied on top of the built-in defaults.
    pub exclude: Vec<String>,
    /// Compact normalization: strip comments and collapse blank runs.
    pub compact: bool,
    /// Aggressive optimization for script/stylesheet families. Implies the
    /// compact pass.
    pub smart: bool,
    /// Per-file size ceiling in KB.
    pub max_file_size_kb: u64,
    /// Requested format when `all_formats` is false.
    pub format: OutputFormat,
    /// Generate every format in `OutputFormat::ALL`.
    pub all_formats: bool,
    /// Report sizes without writing anything.
    pub dry_run: bool,
    /// Respect a `.gitignore` at the root (the `.git` directory itself is
    /// always ignored either way).
    pub respect_gitignore: bool,
    /// Aggregate document ceiling. Not surfaced as a CLI flag.
    pub max_output_bytes: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            output: PathBuf::from("codepack-output"),
            exclude: Vec::new(),
            compact: false,
            smart: false,
            max_file_size_kb: DEFAULT_MAX_FILE_SIZE_KB,
            format: OutputFormat::Markdown,
            all_formats: false,
            dry_run: false,
            respect_gitignore: true,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl PackOptions {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb * 1024
    }

    /// Formats to produce for this run, in a fixed iteration order.
    pub fn requested_formats(&self) -> Vec<OutputFormat> {
        if self.all_formats {
            OutputFormat::ALL.to_vec()
        } else {
            vec![self.format]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tags_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(format.tag().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "protobuf".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn all_formats_expands_to_nine() {
        let opts = PackOptions {
            all_formats: true,
            ..PackOptions::default()
        };
        assert_eq!(opts.requested_formats().len(), 9);
    }
}
