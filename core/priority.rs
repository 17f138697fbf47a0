//! Deterministic ordering and purpose-based bucketing of included files for
//! the human-oriented renderings.

use crate::context::FileRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Tier for well-known basenames. Unknown basenames rank last in this tier.
fn basename_rank(name: &str) -> u8 {
    let lower = name.to_lowercase();
    if lower == "readme" || lower.starts_with("readme.") {
        return 0;
    }
    match name {
        "package.json" | "Cargo.toml" | "pyproject.toml" | "go.mod" | "Gemfile"
        | "composer.json" => 1,
        "tsconfig.json" => 2,
        _ => {
            let stem = name.split('.').next().unwrap_or(name);
            match stem {
                "index" | "main" | "app" | "server" | "lib" | "__main__" => 3,
                _ => 4,
            }
        }
    }
}

/// Secondary tier: structured config before script code before markup/docs.
fn extension_rank(ext: &str) -> u8 {
    match ext.to_lowercase().as_str() {
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env" | "xml" => 0,
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "py" | "rb" | "go" | "rs" | "java"
        | "kt" | "c" | "h" | "cpp" | "hpp" | "cs" | "php" | "swift" | "scala" | "sh" | "sql"
        | "vue" | "svelte" => 1,
        "html" | "htm" | "css" | "scss" | "sass" | "less" | "md" | "markdown" | "rst"
        | "txt" => 2,
        _ => 3,
    }
}

/// Total order over included files: basename tier, then extension tier, then
/// lexical path comparison. Stable and reproducible for identical inputs.
pub fn compare_records(a: &FileRecord, b: &FileRecord) -> Ordering {
    let a_name = a.basename();
    let b_name = b.basename();
    basename_rank(a_name)
        .cmp(&basename_rank(b_name))
        .then_with(|| extension_rank(&a.extension).cmp(&extension_rank(&b.extension)))
        .then_with(|| a.path.cmp(&b.path))
}

pub fn sort_records(records: &mut [FileRecord]) {
    records.sort_by(compare_records);
}

/// Purpose buckets for the grouped human rendering. Every file lands in
/// exactly one bucket; checks are ordered and the first match wins, mirroring
/// the architecture-detection tie-break policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileGroup {
    Configuration,
    EntryPoint,
    Component,
    Api,
    Model,
    Utility,
    Test,
    Stylesheet,
    Other,
}

impl FileGroup {
    pub const ORDERED: [FileGroup; 9] = [
        FileGroup::Configuration,
        FileGroup::EntryPoint,
        FileGroup::Component,
        FileGroup::Api,
        FileGroup::Model,
        FileGroup::Utility,
        FileGroup::Test,
        FileGroup::Stylesheet,
        FileGroup::Other,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            FileGroup::Configuration => "Configuration",
            FileGroup::EntryPoint => "Entry Points",
            FileGroup::Component => "UI Components",
            FileGroup::Api => "API & Routes",
            FileGroup::Model => "Models & Schemas",
            FileGroup::Utility => "Utilities",
            FileGroup::Test => "Tests",
            FileGroup::Stylesheet => "Stylesheets",
            FileGroup::Other => "Other",
        }
    }
}

pub fn group_for(record: &FileRecord) -> FileGroup {
    let path = record.path.to_lowercase();
    let name = record.basename().to_lowercase();
    let ext = record.extension.to_lowercase();

    if matches!(
        ext.as_str(),
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env"
    ) || name.starts_with('.')
        || matches!(name.as_str(), "makefile" | "dockerfile" | "gemfile")
    {
        FileGroup::Configuration
    } else if matches!(
        name.split('.').next().unwrap_or(&name),
        "index" | "main" | "app" | "server" | "__main__"
    ) {
        FileGroup::EntryPoint
    } else if path.contains("component") || ext == "vue" || ext == "svelte" || ext == "jsx" {
        FileGroup::Component
    } else if path.contains("api/") || path.contains("route") || path.contains("controller") {
        FileGroup::Api
    } else if path.contains("model") || path.contains("schema") || path.contains("entit") {
        FileGroup::Model
    } else if path.contains("util") || path.contains("helper") || path.contains("lib/") {
        FileGroup::Utility
    } else if path.contains("test") || path.contains("spec") || path.contains("__tests__") {
        FileGroup::Test
    } else if matches!(ext.as_str(), "css" | "scss" | "sass" | "less") {
        FileGroup::Stylesheet
    } else {
        FileGroup::Other
    }
}
