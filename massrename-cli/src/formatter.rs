//! Output formatters for plans and job outcomes

use anyhow::Result;
use colored::*;
use massrename_core::{JobOutcome, PlannedRename};
use std::path::Path;

/// Print planned renames as an aligned "source -> emitted" list
pub fn print_plan_human(plan: &[PlannedRename]) {
    if plan.is_empty() {
        println!("{}", "Nothing to convert".yellow());
        return;
    }

    println!("{}", "Planned renames:".bold().underline());
    let width = plan.iter().map(|p| p.source_name.len()).max().unwrap_or(0);
    for rename in plan {
        let arrow = if rename.source_name == rename.emitted_name {
            "=".bright_black()
        } else {
            "→".cyan()
        };
        println!(
            "  {:width$} {} {}",
            rename.source_name,
            arrow,
            rename.emitted_name.bold(),
            width = width
        );
    }
    println!();
    println!("{} {}", "Files:".bold(), plan.len());
}

/// Print planned renames in JSON format
pub fn print_plan_json(plan: &[PlannedRename]) -> Result<()> {
    let output = serde_json::json!({
        "dry_run": true,
        "renames": plan,
        "summary": {
            "total": plan.len(),
            "renamed": plan.iter().filter(|p| p.source_name != p.emitted_name).count(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_outcome_human(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::NothingToDeliver => {
            println!("{}", "Nothing to convert".yellow());
        }
        JobOutcome::Delivered {
            location,
            entries,
            bytes,
        } => {
            println!("{}", "✓ Archive created".green().bold());
            println!("  {} {}", "Output:".bold(), location.display());
            println!("  {} {}", "Files:".bold(), entries);
            println!("  {} {} bytes", "Size:".bold(), bytes);
        }
    }
}

/// Print the job outcome in JSON format
pub fn print_outcome_json(outcome: &JobOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

pub fn print_template_written(path: &Path) {
    println!("{}", "✓ Template written".green().bold());
    println!("  {} {}", "Output:".bold(), path.display());
}
