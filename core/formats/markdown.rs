//! Human-oriented markdown renderings. The plain variant honors the run's
//! compact flag by dropping the tree and table of contents; the grouped
//! variant buckets files by purpose; the frontmatter variant prefixes the
//! plain body with a YAML metadata block.

use super::fence_language;
use crate::context::{FileRecord, PackContext};
use crate::error::Result;
use crate::priority::{FileGroup, group_for};
use serde::Serialize;
use std::collections::BTreeMap;

pub fn render_plain(context: &PackContext) -> String {
    let compact = context.metadata.options.compact || context.metadata.options.smart;
    let mut out = String::new();

    out.push_str(&format!("# Code Context: {}\n\n", project_name(context)));
    push_metadata_section(&mut out, context);
    push_analysis_section(&mut out, context);

    if !compact {
        out.push_str("## Directory Structure\n\n```\n");
        out.push_str(&render_tree(context));
        out.push_str("```\n\n");

        out.push_str("## Table of Contents\n\n");
        for file in &context.files {
            out.push_str(&format!("- {}\n", file.path));
        }
        out.push('\n');
    }

    out.push_str("## Files\n\n");
    for file in &context.files {
        push_file_section(&mut out, file, "###");
    }
    push_report_sections(&mut out, context);
    out
}

pub fn render_grouped(context: &PackContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Code Context: {}\n\n", project_name(context)));
    push_metadata_section(&mut out, context);
    push_analysis_section(&mut out, context);

    out.push_str("## Architecture Overview\n\n```\n");
    out.push_str(&render_diagram(context));
    out.push_str("```\n\n");

    let mut groups: BTreeMap<usize, Vec<&FileRecord>> = BTreeMap::new();
    for file in &context.files {
        let group = group_for(file);
        let index = FileGroup::ORDERED
            .iter()
            .position(|g| *g == group)
            .unwrap_or(FileGroup::ORDERED.len() - 1);
        groups.entry(index).or_default().push(file);
    }

    out.push_str("## Table of Contents\n\n");
    for (index, members) in &groups {
        out.push_str(&format!(
            "- {} ({} files)\n",
            FileGroup::ORDERED[*index].heading(),
            members.len()
        ));
    }
    out.push('\n');

    for (index, members) in &groups {
        out.push_str(&format!("## {}\n\n", FileGroup::ORDERED[*index].heading()));
        for file in members {
            push_file_section(&mut out, file, "###");
        }
    }
    push_report_sections(&mut out, context);
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter<'a> {
    metadata: &'a crate::context::RunMetadata,
    analysis: &'a crate::analyze::Analysis,
}

pub fn render_frontmatter(context: &PackContext) -> Result<String> {
    let frontmatter = serde_yml::to_string(&Frontmatter {
        metadata: &context.metadata,
        analysis: &context.analysis,
    })?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&frontmatter);
    out.push_str("---\n\n");
    out.push_str(&format!("# Code Context: {}\n\n", project_name(context)));
    out.push_str("## Files\n\n");
    for file in &context.files {
        push_file_section(&mut out, file, "###");
    }
    push_report_sections(&mut out, context);
    Ok(out)
}

fn project_name(context: &PackContext) -> &str {
    context
        .metadata
        .source_path
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("project")
}

fn push_metadata_section(out: &mut String, context: &PackContext) {
    out.push_str(&format!(
        "Generated: {}  \nSource: `{}`  \nFiles: {} included, {} skipped (too large), {} errors\n\n",
        context.metadata.generated_at.to_rfc3339(),
        context.metadata.source_path,
        context.metadata.total_files,
        context.metadata.skipped_count,
        context.metadata.error_count,
    ));
}

fn push_analysis_section(out: &mut String, context: &PackContext) {
    out.push_str("## Analysis\n\n");
    out.push_str(&format!(
        "- Architecture: {}\n",
        context.analysis.architecture
    ));
    if !context.analysis.technologies.is_empty() {
        let technologies: Vec<&str> = context
            .analysis
            .technologies
            .iter()
            .map(String::as_str)
            .collect();
        out.push_str(&format!("- Technologies: {}\n", technologies.join(", ")));
    }
    if !context.analysis.patterns.is_empty() {
        let patterns: Vec<&str> = context
            .analysis
            .patterns
            .iter()
            .map(String::as_str)
            .collect();
        out.push_str(&format!("- Patterns: {}\n", patterns.join(", ")));
    }
    out.push('\n');
}

fn push_file_section(out: &mut String, file: &FileRecord, heading: &str) {
    out.push_str(&format!("{} {}\n\n", heading, file.path));

    let mut meta = format!("*{} | {} KB*", file.file_type, file.size_kb());
    if let Some(description) = &file.description {
        meta = format!("*{} | {} KB | {}*", file.file_type, file.size_kb(), description);
    }
    out.push_str(&meta);
    out.push_str("\n\n");

    if file.is_package_marker && file.is_empty {
        out.push_str("(Empty package marker; expected, not missing code.)\n\n");
        return;
    }
    out.push_str(&format!("```{}\n", fence_language(&file.extension)));
    out.push_str(&file.content);
    if !file.content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n\n");
}

fn push_report_sections(out: &mut String, context: &PackContext) {
    if !context.skipped.is_empty() {
        out.push_str("## Skipped Files (over size limit)\n\n");
        for skipped in &context.skipped {
            out.push_str(&format!("- {} ({} KB)\n", skipped.name, skipped.size_kb));
        }
        out.push('\n');
    }
    if !context.errors.is_empty() {
        out.push_str("## Processing Errors\n\n");
        for error in &context.errors {
            out.push_str(&format!("- {}\n", error.message));
        }
        out.push('\n');
    }
}

fn render_diagram(context: &PackContext) -> String {
    let technologies: Vec<&str> = context
        .analysis
        .technologies
        .iter()
        .map(String::as_str)
        .collect();
    let patterns: Vec<&str> = context
        .analysis
        .patterns
        .iter()
        .map(String::as_str)
        .collect();
    format!(
        "[{}]\n  |- technologies: {}\n  `- patterns: {}\n",
        context.analysis.architecture,
        if technologies.is_empty() {
            "none detected".to_string()
        } else {
            technologies.join(", ")
        },
        if patterns.is_empty() {
            "none detected".to_string()
        } else {
            patterns.join(", ")
        },
    )
}

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    is_dir: bool,
}

/// Indent-rendered directory tree over the included relative paths.
fn render_tree(context: &PackContext) -> String {
    let mut root = TreeNode::default();
    for file in &context.files {
        let mut node = &mut root;
        let components: Vec<&str> = file.path.split('/').collect();
        for (i, component) in components.iter().enumerate() {
            let child = node.children.entry(component.to_string()).or_default();
            if i < components.len() - 1 {
                child.is_dir = true;
            }
            node = child;
        }
    }
    let mut out = String::new();
    render_tree_level(&root, 0, &mut out);
    out
}

fn render_tree_level(node: &TreeNode, depth: usize, out: &mut String) {
    for (name, child) in &node.children {
        let suffix = if child.is_dir { "/" } else { "" };
        out.push_str(&format!("{}{}{}\n", "  ".repeat(depth), name, suffix));
        render_tree_level(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tests::sample_context;

    #[test]
    fn plain_rendering_has_tree_toc_and_fenced_files() {
        let context = sample_context();
        let text = render_plain(&context);
        assert!(text.starts_with("# Code Context: demo"));
        assert!(text.contains("## Directory Structure"));
        assert!(text.contains("src/\n  index.js"));
        assert!(text.contains("## Table of Contents"));
        assert!(text.contains("### src/index.js"));
        assert!(text.contains("```javascript\nconsole.log(1);\n```"));
        assert!(text.contains("## Skipped Files"));
        assert!(text.contains("- big.bin.js (600 KB)"));
    }

    #[test]
    fn compact_flag_drops_tree_and_toc() {
        let mut context = sample_context();
        context.metadata.options.compact = true;
        let text = render_plain(&context);
        assert!(!text.contains("## Directory Structure"));
        assert!(!text.contains("## Table of Contents"));
        assert!(text.contains("### src/index.js"));
    }

    #[test]
    fn grouped_rendering_buckets_by_purpose() {
        let context = sample_context();
        let text = render_grouped(&context);
        assert!(text.contains("## Architecture Overview"));
        assert!(text.contains("## Configuration"));
        assert!(text.contains("## Entry Points"));
        // package.json lands under Configuration, index.js under Entry Points.
        let config_pos = text.find("## Configuration").unwrap();
        let entry_pos = text.find("## Entry Points").unwrap();
        assert!(config_pos < entry_pos);
    }

    #[test]
    fn frontmatter_rendering_starts_with_a_yaml_block() {
        let context = sample_context();
        let text = render_frontmatter(&context).unwrap();
        assert!(text.starts_with("---\n"));
        let end = text[4..].find("---\n").unwrap() + 4;
        let yaml: serde_yml::Value = serde_yml::from_str(&text[4..end]).unwrap();
        assert_eq!(yaml["metadata"]["totalFiles"].as_u64().unwrap(), 4);
    }

    #[test]
    fn empty_marker_gets_a_note_instead_of_a_code_block() {
        let context = sample_context();
        let text = render_plain(&context);
        let marker_pos = text.find("### pkg/__init__.py").unwrap();
        let tail = &text[marker_pos..];
        let section_end = tail[4..].find("###").map(|i| i + 4).unwrap_or(tail.len());
        assert!(tail[..section_end].contains("Empty package marker"));
        assert!(!tail[..section_end].contains("```"));
    }
}
