/*
File: relink-aio/src/fs.rs
Purpose: Filesystem operations the reconciliation engine needs, behind a trait.
*/
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error};

/// The filesystem as seen by the reconciliation engine.
///
/// Everything the engine reads or mutates goes through this trait so the
/// engine can run against [`DiskFs`] or an in-memory double.
pub trait LinkFs: Sync {
    /// Whether `path` exists, following links. Never fails: any error reads
    /// as absent.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Whether an entry of any type sits at `path`, without following a final
    /// symlink. A dangling link exists.
    fn entry_exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Fully resolves `path` through every symlink.
    fn canonicalize(&self, path: &Path) -> impl Future<Output = io::Result<PathBuf>> + Send;

    /// The immediate target of the symlink at `path`.
    fn read_link(&self, path: &Path) -> impl Future<Output = io::Result<PathBuf>> + Send;

    /// Removes a file or symlink. A real directory is removed with its contents.
    fn remove_entry(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;

    /// Creates `link` as a symlink to `target`. Fails if `link` already exists.
    fn symlink(&self, target: &Path, link: &Path) -> impl Future<Output = io::Result<()>> + Send;
}

/// The real filesystem, via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl LinkFs for DiskFs {
    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    async fn entry_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).await.is_ok()
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path).await
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path).await
    }

    async fn remove_entry(&self, path: &Path) -> io::Result<()> {
        let metadata = fs::symlink_metadata(path).await?;
        // Symlinks to directories are removed with remove_file.
        let is_real_dir = metadata.file_type().is_dir();
        debug!(
            "Removing {} at: {}",
            if is_real_dir {
                "directory"
            } else if metadata.file_type().is_symlink() {
                "symlink"
            } else {
                "file"
            },
            path.display()
        );
        let result = if is_real_dir {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };
        result.inspect_err(|e| error!("Failed to remove {}: {}", path.display(), e))
    }

    #[cfg(unix)]
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        debug!("Creating symlink {} -> {}", link.display(), target.display());
        fs::symlink(target, link).await.inspect_err(|e| {
            error!(
                "Failed create symlink {} -> {}: {}",
                link.display(),
                target.display(),
                e
            )
        })
    }

    #[cfg(not(unix))]
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        tracing::warn!(
            "Symlink creation not supported on this platform: {} -> {}",
            link.display(),
            target.display()
        );
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symlinks not supported on this platform",
        ))
    }
}
