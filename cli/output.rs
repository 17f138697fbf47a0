use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use codepack_core::{RunSummary, SUMMARY_PREVIEW_CAP};

pub fn print_summary(summary: &RunSummary, quiet: bool) {
    if quiet {
        return;
    }
    println!();
    println!(
        "{} {} ({} files, {})",
        "Packed:".green().bold(),
        summary.source.display().to_string().blue(),
        summary.total_files.to_string().cyan(),
        summary.architecture.cyan()
    );

    if summary.dry_run {
        println!("{}", "Dry run: nothing was written.".yellow());
    }

    match summary.written.len() {
        0 => {}
        1 => {
            let written = &summary.written[0];
            let verb = if summary.dry_run { "Would write" } else { "Saved" };
            println!(
                "{} {} {} ({})",
                "✅".green(),
                verb,
                written.path.display().to_string().blue(),
                readable(written.bytes).dimmed()
            );
        }
        _ => print_format_table(summary),
    }

    for failed in &summary.failed {
        println!(
            "{} {} generation failed: {}",
            "❌".red(),
            failed.format.tag().cyan(),
            failed.error
        );
    }

    if !summary.skipped.is_empty() {
        println!(
            "\n{} {} file(s) skipped (over size limit):",
            "⚠️".yellow(),
            summary.skipped.len().to_string().yellow()
        );
        for skipped in summary.skipped.iter().take(SUMMARY_PREVIEW_CAP) {
            println!("  - {} ({} KB)", skipped.name.dimmed(), skipped.size_kb);
        }
        overflow_note(summary.skipped.len());
    }

    if !summary.errors.is_empty() {
        println!(
            "\n{} {} file(s) could not be read:",
            "⚠️".yellow(),
            summary.errors.len().to_string().yellow()
        );
        for error in summary.errors.iter().take(SUMMARY_PREVIEW_CAP) {
            println!("  - {}", error.message.dimmed());
        }
        overflow_note(summary.errors.len());
    }
    println!();
}

/// Side-by-side size comparison for all-formats runs.
fn print_format_table(summary: &RunSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Format").fg(Color::Green),
        Cell::new("Size").fg(Color::Green),
        Cell::new(if summary.dry_run { "Would write" } else { "Path" }).fg(Color::Green),
    ]);
    for written in &summary.written {
        table.add_row(vec![
            Cell::new(written.format.tag()).fg(Color::Cyan),
            Cell::new(readable(written.bytes))
                .set_alignment(comfy_table::CellAlignment::Right),
            Cell::new(written.path.display().to_string()).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
}

fn overflow_note(total: usize) {
    if total > SUMMARY_PREVIEW_CAP {
        println!(
            "  {} and {} more",
            "...".dimmed(),
            (total - SUMMARY_PREVIEW_CAP).to_string().dimmed()
        );
    }
}

fn readable(bytes: usize) -> String {
    let byte = Byte::from_u128(bytes as u128).unwrap_or_default();
    byte.get_appropriate_unit(UnitType::Binary).to_string()
}
