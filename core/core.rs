pub mod analyze;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod formats;
pub mod gather;
pub mod orchestrate;
pub mod patterns;
pub mod priority;
pub mod validate;

pub use analyze::{Analysis, analyze_paths};
pub use config::{
    DEFAULT_MAX_FILE_SIZE_KB, DEFAULT_MAX_OUTPUT_BYTES, OutputFormat, PackOptions,
    SUMMARY_PREVIEW_CAP,
};
pub use content::ContentMode;
pub use context::{FileRecord, PackContext, ProcessingError, RunMetadata, SkippedFile};
pub use error::{AppError, Result};
pub use formats::{OutputDocument, generate};
pub use gather::{GatherOutcome, gather_files};
pub use orchestrate::{FailedFormat, ProgressEvent, ProgressSink, RunSummary, WrittenDocument, run};
pub use validate::validate_source_path;
