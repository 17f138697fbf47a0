//! Mode-driven text normalization applied uniformly to included file bodies
//! before any output format sees them.
//!
//! Both transforms are regex-driven and explicitly lossy: comment-like
//! sequences inside string or template literals are stripped like real
//! comments. That is a known, accepted limitation; consumers depend on the
//! current output shape, so it is documented here rather than fixed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Content transformation selected once per run. Every output strategy
/// observes the same transformed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Byte-for-byte faithful apart from line-ending normalization.
    Raw,
    /// Comment stripping plus blank-run collapsing. Idempotent.
    Compact,
    /// Compact plus per-family whitespace reduction. Best effort.
    Smart,
}

impl ContentMode {
    pub fn from_flags(compact: bool, smart: bool) -> Self {
        if smart {
            ContentMode::Smart
        } else if compact {
            ContentMode::Compact
        } else {
            ContentMode::Raw
        }
    }
}

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
// Line comments must start the line or follow whitespace, which leaves
// protocol separators like `https://` alone.
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|\s)//[^\n]*$").unwrap());
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static IMPORT_DESTRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s*\{\s*([^}]+?)\s*\}\s*from\s*(['"][^'"]+['"])"#).unwrap()
});
static SCRIPT_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*([{}();,=])[ \t]*").unwrap());
static STYLE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([{}:;,])\s*").unwrap());

const SCRIPT_EXTENSIONS: [&str; 6] = ["js", "jsx", "ts", "tsx", "mjs", "cjs"];
const STYLE_EXTENSIONS: [&str; 4] = ["css", "scss", "sass", "less"];

/// Applies the run-wide transform to one file body. `extension` drives the
/// per-family passes of smart mode; files outside the recognized families
/// only receive the base normalization.
pub fn transform(content: &str, extension: &str, mode: ContentMode) -> String {
    match mode {
        ContentMode::Raw => content.to_string(),
        ContentMode::Compact => normalize(content),
        ContentMode::Smart => {
            let base = normalize(content);
            let ext = extension.to_lowercase();
            if SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
                optimize_script(&base)
            } else if STYLE_EXTENSIONS.contains(&ext.as_str()) {
                optimize_stylesheet(&base)
            } else {
                base
            }
        }
    }
}

/// Compact normalization: strip block and line comments, strip trailing and
/// whitespace-only-line whitespace, collapse 3+ newlines to one blank line,
/// trim. Applying it twice yields the same output as once.
pub fn normalize(content: &str) -> String {
    let text = BLOCK_COMMENT.replace_all(content, "");
    let text = LINE_COMMENT.replace_all(&text, "$1");
    let text = TRAILING_WS.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn optimize_script(content: &str) -> String {
    let text = IMPORT_DESTRUCTURE.replace_all(content, |caps: &regex::Captures| {
        let names: Vec<&str> = caps[1]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        format!("import {{{}}} from {}", names.join(", "), &caps[2])
    });
    SCRIPT_PUNCT.replace_all(&text, "$1").to_string()
}

fn optimize_stylesheet(content: &str) -> String {
    let text = STYLE_PUNCT.replace_all(content, "$1");
    text.replace('\n', "")
}
