// relink/src/cli/bootstrap.rs
//! Populating an empty dependency store with the package manager.
use colored::Colorize;
use relink_aio::{run_shell_async, DiskFs, LinkFs};
use relink_common::error::{RelinkError, Result};
use relink_common::Config;
use tracing::{debug, info};

pub async fn store_installed(config: &Config) -> bool {
    let installed = DiskFs.exists(&config.store_dir()).await;
    debug!(
        "Dependency store {} present: {}",
        config.store_dir().display(),
        installed
    );
    installed
}

/// Runs the configured install command in the project root.
pub async fn install_dependencies(config: &Config) -> Result<()> {
    println!(
        "{}{}",
        "==> ".bold().blue(),
        format!("Running {}", config.install_command).bold()
    );
    info!("Installing dependencies with '{}'", config.install_command);

    let output = run_shell_async(&config.install_command, config.project_root()).await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        println!("{line}");
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RelinkError::CommandExec(format!(
            "'{}' exited with {}: {}",
            config.install_command,
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}
