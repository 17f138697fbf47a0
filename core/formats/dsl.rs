//! Terse line-oriented grammar: a fixed preamble, one metadata line, an
//! optional empty-marker list, then a `FILE:` block per included file in
//! priority order, each terminated by a literal `END` line.

use super::fence_language;
use crate::context::PackContext;

pub const PREAMBLE: &str = "CODEPACK_DSL_V1";

pub fn render(context: &PackContext) -> String {
    let mut out = String::new();
    out.push_str(PREAMBLE);
    out.push('\n');

    let technologies: Vec<&str> = context
        .analysis
        .technologies
        .iter()
        .map(String::as_str)
        .collect();
    out.push_str(&format!(
        "META: files={} | tech={} | arch={}\n",
        context.metadata.total_files,
        technologies.join("|"),
        context.analysis.architecture
    ));

    let markers = context.empty_marker_paths();
    if !markers.is_empty() {
        out.push_str(&format!("EMPTY_MARKERS: {}\n", markers.join("|")));
    }

    for file in &context.files {
        out.push('\n');
        out.push_str(&format!(
            "FILE: {} [{}, {}KB]\n",
            file.path,
            file.file_type,
            file.size_kb()
        ));
        out.push_str(&format!("```{}\n", fence_language(&file.extension)));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n");
        out.push_str("END\n");
    }
    out
}
