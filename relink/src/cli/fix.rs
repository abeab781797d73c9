// relink/src/cli/fix.rs
use std::io::IsTerminal;

use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use relink_aio::DiskFs;
use relink_common::error::Result;
use relink_common::model::{PassStatus, RepairSummary};
use relink_common::Config;
use relink_core::Reconciler;
use tracing::{instrument, warn};

use super::{bootstrap, display, load_specifiers};

#[derive(Args, Debug)]
pub struct Fix {
    /// Answer yes to every prompt (install missing dependencies, repair links)
    #[arg(short, long)]
    pub yes: bool,
}

impl Fix {
    #[instrument(skip_all, fields(yes = self.yes))]
    pub async fn run(&self, config: &Config) -> Result<PassStatus> {
        let specifiers = load_specifiers(config)?;

        if !bootstrap::store_installed(config).await {
            display::print_store_missing(config);
            let prompt = format!(
                "Do you want to install dependencies using `{}`?",
                config.install_command
            );
            if !self.confirm(&prompt) {
                println!("OK!");
                return Ok(PassStatus::IssuesRemain);
            }
            bootstrap::install_dependencies(config).await?;
        }

        let report = Reconciler::new(&DiskFs, config)
            .run(&specifiers, |report| {
                display::print_report(report);
                self.confirm("Do you want to fix them?")
            })
            .await;

        // The approval closure never ran, so nothing has been printed yet.
        if matches!(report.repair, RepairSummary::NotAttempted) {
            display::print_report(&report);
        }
        display::print_repairs(&report);
        Ok(report.status())
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        if !std::io::stderr().is_terminal() {
            println!(
                "{} not running in a terminal; re-run with {} to proceed",
                "Skipping:".yellow(),
                "--yes".bold()
            );
            return false;
        }
        match Confirm::new().with_prompt(prompt).default(true).interact() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Prompt failed: {}", e);
                false
            }
        }
    }
}
