//! The nine serialization strategies. Each is a pure function from the shared
//! `PackContext` to one output document; the format is an explicit parameter
//! of the dispatch, never shared run state, so no strategy can observe
//! another strategy's format choice.

use crate::config::OutputFormat;
use crate::context::PackContext;
use crate::error::Result;

pub mod archive;
pub mod dsl;
pub mod markdown;
pub mod structured;

/// One fully generated artifact. The aggregate size check operates on the
/// materialized text.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    pub format: OutputFormat,
    pub text: String,
}

impl OutputDocument {
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

pub fn generate(context: &PackContext, format: OutputFormat) -> Result<OutputDocument> {
    log::debug!("Generating {} document...", format.tag());
    let text = match format {
        OutputFormat::Markdown => markdown::render_plain(context),
        OutputFormat::Smart => markdown::render_grouped(context),
        OutputFormat::MdYaml => markdown::render_frontmatter(context)?,
        OutputFormat::Json => structured::to_json(context)?,
        OutputFormat::Yaml => structured::to_yaml(context)?,
        OutputFormat::Toml => structured::to_toml(context)?,
        OutputFormat::JsonLd => structured::to_jsonld(context)?,
        OutputFormat::MsgPack => archive::render(context)?,
        OutputFormat::Dsl => dsl::render(context),
    };
    Ok(OutputDocument { format, text })
}

/// Best-guess fenced-code-block language tag for a file extension.
pub fn fence_language(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "c" | "h" => "c",
        "cpp" | "hpp" | "cc" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "scala" => "scala",
        "sh" | "bash" | "zsh" => "bash",
        "ps1" => "powershell",
        "pl" => "perl",
        "lua" => "lua",
        "sql" => "sql",
        "graphql" => "graphql",
        "proto" => "protobuf",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "less" => "less",
        "vue" => "vue",
        "svelte" => "svelte",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "ini" | "cfg" | "conf" => "ini",
        "md" | "markdown" => "markdown",
        "rst" => "rst",
        "tf" => "hcl",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackOptions;
    use crate::context::FileRecord;
    use std::path::Path;

    pub(crate) fn sample_context() -> PackContext {
        let files = vec![
            FileRecord::for_tests("README.md", "# Demo\n"),
            FileRecord::for_tests("package.json", "{\"name\":\"demo\"}"),
            FileRecord::for_tests("src/index.js", "console.log(1);\n"),
            FileRecord::for_tests("pkg/__init__.py", ""),
        ];
        PackContext::assemble(
            files,
            vec![crate::context::SkippedFile {
                name: "big.bin.js".to_string(),
                size_kb: 600,
            }],
            vec![crate::context::ProcessingError {
                message: "Cannot stat broken.js".to_string(),
            }],
            Path::new("/tmp/demo"),
            &PackOptions::default(),
        )
    }

    #[test]
    fn every_format_produces_a_document() {
        let context = sample_context();
        for format in OutputFormat::ALL {
            let doc = generate(&context, format).unwrap();
            assert!(!doc.text.is_empty(), "{} produced empty text", format);
            assert_eq!(doc.format, format);
        }
    }

    #[test]
    fn skipped_files_never_reach_content_sections() {
        let context = sample_context();
        for format in OutputFormat::ALL {
            let doc = generate(&context, format).unwrap();
            if format == OutputFormat::MsgPack {
                continue; // content is base64-opaque there
            }
            // The skipped file name may appear in report sections, but never
            // with a fenced body or content field of its own.
            assert!(!doc.text.contains("FILE: big.bin.js"));
            assert!(!doc.text.contains("## big.bin.js"));
        }
    }

    #[test]
    fn fence_language_falls_back_to_text() {
        assert_eq!(fence_language("rs"), "rust");
        assert_eq!(fence_language("blob"), "text");
    }
}
