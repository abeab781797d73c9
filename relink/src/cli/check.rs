// relink/src/cli/check.rs
use clap::Args;
use relink_aio::DiskFs;
use relink_common::error::Result;
use relink_common::model::{PassStatus, ReconcileReport};
use relink_common::Config;
use relink_core::Reconciler;
use serde::Serialize;
use tracing::instrument;

use super::{bootstrap, display, load_specifiers};

#[derive(Serialize)]
struct JsonReport<'a> {
    status: PassStatus,
    report: &'a ReconcileReport,
}

#[derive(Args, Debug)]
pub struct Check {
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Check {
    #[instrument(skip_all)]
    pub async fn run(&self, config: &Config) -> Result<PassStatus> {
        let specifiers = load_specifiers(config)?;

        if !bootstrap::store_installed(config).await {
            display::print_store_missing(config);
            return Ok(PassStatus::IssuesRemain);
        }

        let report = Reconciler::new(&DiskFs, config)
            .inspect(&specifiers)
            .await;
        let status = report.status();

        if self.json {
            let out = JsonReport {
                status,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            display::print_report(&report);
        }
        Ok(status)
    }
}
