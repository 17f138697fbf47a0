use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Restricted path: refusing to process '{0}'")]
    RestrictedPath(PathBuf),

    #[error("Unsupported format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Output too large: {format} document is {actual} bytes (limit {limit} bytes)")]
    OutputTooLarge {
        format: String,
        actual: usize,
        limit: usize,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Ignore Error: {0}")]
    Ignore(#[from] ignore::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("YAML Serialization Error: {0}")]
    YamlSerialize(#[from] serde_yml::Error),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("MessagePack Serialization Error: {0}")]
    MsgPackSerialize(String),
}

impl AppError {
    /// Fatal errors abort the whole run; everything else is recorded and
    /// the run continues. Per-file errors are always local.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::InvalidPath(_)
                | AppError::RestrictedPath(_)
                | AppError::UnsupportedFormat(_)
                | AppError::OutputTooLarge { .. }
        )
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

impl From<rmp_serde::encode::Error> for AppError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        AppError::MsgPackSerialize(err.to_string())
    }
}
