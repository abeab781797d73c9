// relink/src/cli/display.rs
use colored::Colorize;
use relink_common::model::{ReconcileReport, RepairSummary, Unavailability};
use relink_common::Config;

pub fn print_store_missing(config: &Config) {
    println!(
        "{} ({} not found)",
        "Dependencies are not installed!".yellow().bold(),
        config.store_dir().display()
    );
}

/// Prints what the read-only phases found.
pub fn print_report(report: &ReconcileReport) {
    if !report.unavailable.is_empty() {
        for missing in &report.unavailable {
            let dep = &missing.dependency;
            match missing.reason {
                Unavailability::MissingDeclaredTarget => eprintln!(
                    "{} {} -> {}",
                    "Dependency does not exist:".red(),
                    dep.name.cyan(),
                    dep.specifier
                ),
                Unavailability::MissingStoreEntry => eprintln!(
                    "{} {}{}",
                    "Dependency is not installed:".red(),
                    dep.name.cyan(),
                    missing
                        .detail
                        .as_ref()
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default()
                ),
            }
        }
        return;
    }

    let mismatched: Vec<_> = report.mismatched().collect();
    if mismatched.is_empty() {
        println!("{}", "no issues found! you are good to go!".green());
        return;
    }

    println!(
        "You have {} {} with incorrect path!",
        mismatched.len(),
        if mismatched.len() > 1 {
            "dependencies"
        } else {
            "dependency"
        }
    );
    for checked in mismatched {
        let dep = &checked.dependency;
        println!("{}", dep.name().bold());
        println!("your path: {}", dep.expected_installed_path.display().to_string().yellow());
        println!("while, real path: {}", dep.canonical_path.display().to_string().green());
        match &dep.store_link_target {
            Some(target) => println!(
                "  ({} links to {})",
                dep.store_entry_path.display(),
                target.display()
            ),
            None => println!(
                "  ({} is an installed copy, not a link)",
                dep.store_entry_path.display()
            ),
        }
        if let Some(root) = &dep.implied_project_root {
            println!("  (linked from project at {})", root.display());
        }
    }
}

/// Prints what the repair phase did, if anything.
pub fn print_repairs(report: &ReconcileReport) {
    match &report.repair {
        RepairSummary::NotAttempted => {}
        RepairSummary::Declined => println!("{}", "Left as is.".yellow()),
        RepairSummary::Attempted(outcomes) => {
            for outcome in outcomes {
                match &outcome.error {
                    None => println!("✓ Relinked {}", outcome.name.green()),
                    Some(e) => eprintln!(
                        "✖ Failed to relink {} after {:?} (could not {}): {}",
                        outcome.name.cyan(),
                        outcome.reached,
                        outcome.reached.pending_step(),
                        e
                    ),
                }
            }
            if outcomes.iter().all(|o| o.is_success()) {
                println!("done!");
            }
        }
    }
}
