// relink-aio/src/process.rs
use std::path::Path;
use std::process::{Output, Stdio};

use relink_common::error::Result;
use tokio::process::Command;
use tracing::{debug, error};

/// Runs `command_line` through `bash -c` in `cwd` and captures its output.
///
/// A non-zero exit is not an error here; callers inspect `Output::status`.
/// Only a failure to spawn the shell is returned as `RelinkError::Io`.
pub async fn run_shell_async(command_line: &str, cwd: &Path) -> Result<Output> {
    debug!("Running '{}' in {}", command_line, cwd.display());

    let output = Command::new("bash")
        .arg("-c")
        .arg(command_line)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .inspect_err(|e| error!("Failed to spawn shell for '{}': {}", command_line, e))?;

    if output.status.success() {
        debug!("'{}' finished successfully", command_line);
    } else {
        debug!("'{}' exited with {}", command_line, output.status);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("Stderr:\n{}", stderr.trim());
        }
    }
    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;

    use relink_common::RelinkError;

    use super::*;

    #[tokio::test]
    async fn captures_output_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_shell_async("pwd; echo oops >&2; exit 3", dir.path())
            .await
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(
            PathBuf::from(stdout.trim()).canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "oops");
    }

    #[tokio::test]
    async fn stdin_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_shell_async("cat; echo after", dir.path()).await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "after");
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_shell_async("true", &dir.path().join("gone")).await;
        assert!(matches!(result, Err(RelinkError::Io(_))));
    }
}
