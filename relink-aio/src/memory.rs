// relink-aio/src/memory.rs
//! An in-memory [`LinkFs`] with Unix-like symlink resolution.
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use relink_common::path::normalize_lexically;

use crate::fs::LinkFs;

const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File,
    Symlink(PathBuf),
}

#[derive(Debug, Default)]
struct Tree {
    nodes: BTreeMap<PathBuf, Node>,
    denied: HashSet<PathBuf>,
}

enum Part {
    Parent,
    Name(OsString),
}

fn parts(path: &Path) -> impl DoubleEndedIterator<Item = Part> + '_ {
    path.components().filter_map(|c| match c {
        Component::ParentDir => Some(Part::Parent),
        Component::Normal(name) => Some(Part::Name(name.to_os_string())),
        _ => None,
    })
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

fn require_absolute(path: &Path) -> io::Result<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path must be absolute: {}", path.display()),
        ))
    }
}

impl Tree {
    fn ensure_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
    }

    /// Walks `path` from the root, following symlinks. The final component is
    /// followed only when `follow_last` is set; either way it must exist.
    fn resolve(&self, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
        require_absolute(path)?;
        let mut pending: VecDeque<Part> = parts(path).collect();
        let mut resolved = PathBuf::from("/");
        let mut hops = 0;

        while let Some(part) = pending.pop_front() {
            let name = match part {
                Part::Parent => {
                    resolved.pop();
                    continue;
                }
                Part::Name(name) => name,
            };
            let candidate = resolved.join(&name);
            match self.nodes.get(&candidate) {
                None => return Err(not_found(&candidate)),
                Some(Node::Symlink(target)) if follow_last || !pending.is_empty() => {
                    hops += 1;
                    if hops > MAX_LINK_HOPS {
                        return Err(io::Error::other(format!(
                            "too many levels of symbolic links: {}",
                            path.display()
                        )));
                    }
                    if target.is_absolute() {
                        resolved = PathBuf::from("/");
                    }
                    for part in parts(target).rev() {
                        pending.push_front(part);
                    }
                }
                Some(Node::File) if !pending.is_empty() => {
                    return Err(io::Error::other(format!(
                        "not a directory: {}",
                        candidate.display()
                    )));
                }
                Some(_) => resolved = candidate,
            }
        }
        Ok(resolved)
    }

    /// The location of the entry named by `path` itself, parents resolved.
    fn locate(&self, path: &Path) -> io::Result<PathBuf> {
        self.resolve(path, false)
    }

    fn is_denied(&self, path: &Path, located: &Path) -> bool {
        self.denied.contains(&normalize_lexically(path)) || self.denied.contains(located)
    }
}

/// Filesystem double for engine tests. All paths must be absolute.
#[derive(Debug)]
pub struct MemoryFs {
    tree: Mutex<Tree>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            tree: Mutex::new(tree),
        }
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates a directory and any missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        let path = normalize_lexically(path.as_ref());
        let mut tree = self.tree();
        tree.ensure_parents(&path);
        tree.nodes.entry(path).or_insert(Node::Dir);
        drop(tree);
        self
    }

    /// Creates an empty file and any missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>) -> &Self {
        let path = normalize_lexically(path.as_ref());
        let mut tree = self.tree();
        tree.ensure_parents(&path);
        tree.nodes.insert(path, Node::File);
        drop(tree);
        self
    }

    /// Creates (or replaces) `link` as a symlink to `target`, which is stored
    /// verbatim and may be relative to the link's directory.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) -> &Self {
        let link = normalize_lexically(link.as_ref());
        let mut tree = self.tree();
        tree.ensure_parents(&link);
        tree.nodes
            .insert(link, Node::Symlink(target.as_ref().to_path_buf()));
        drop(tree);
        self
    }

    /// Makes removal and creation at `path` fail with `PermissionDenied`.
    pub fn deny_writes(&self, path: impl AsRef<Path>) -> &Self {
        self.tree()
            .denied
            .insert(normalize_lexically(path.as_ref()));
        self
    }

    pub fn allow_writes(&self, path: impl AsRef<Path>) -> &Self {
        self.tree()
            .denied
            .remove(&normalize_lexically(path.as_ref()));
        self
    }

    /// The stored target of the symlink at `path`, without resolving parents.
    pub fn link_target(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        match self.tree().nodes.get(&normalize_lexically(path.as_ref())) {
            Some(Node::Symlink(target)) => Some(target.clone()),
            _ => None,
        }
    }

    fn resolve(&self, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
        self.tree().resolve(path, follow_last)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree();
        let located = tree.locate(path)?;
        if tree.is_denied(path, &located) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        if located == Path::new("/") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "refusing to remove the root directory",
            ));
        }
        match tree.nodes.remove(&located) {
            Some(Node::Dir) => tree.nodes.retain(|p, _| !p.starts_with(&located)),
            Some(_) => {}
            None => return Err(not_found(path)),
        }
        Ok(())
    }

    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        require_absolute(link)?;
        let mut tree = self.tree();
        let (parent, file_name) = match (link.parent(), link.file_name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid link path: {}", link.display()),
                ))
            }
        };
        let parent = tree.resolve(parent, true)?;
        if tree.nodes.get(&parent) != Some(&Node::Dir) {
            return Err(io::Error::other(format!(
                "not a directory: {}",
                parent.display()
            )));
        }
        let located = parent.join(file_name);
        if tree.is_denied(link, &located) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", link.display()),
            ));
        }
        if tree.nodes.contains_key(&located) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {}", link.display()),
            ));
        }
        tree.nodes
            .insert(located, Node::Symlink(target.to_path_buf()));
        Ok(())
    }
}

impl LinkFs for MemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        self.resolve(path, true).is_ok()
    }

    async fn entry_exists(&self, path: &Path) -> bool {
        self.resolve(path, false).is_ok()
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.resolve(path, true)
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        let tree = self.tree();
        let located = tree.locate(path)?;
        match tree.nodes.get(&located) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a symlink: {}", path.display()),
            )),
        }
    }

    async fn remove_entry(&self, path: &Path) -> io::Result<()> {
        self.remove(path)
    }

    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.create_symlink(target, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_relative_and_absolute_chains() {
        let fs = MemoryFs::new();
        fs.add_dir("/work/lib-a")
            .add_symlink("/home/link/lib-a", "/work/lib-a")
            .add_symlink("/work/app/node_modules/lib-a", "../../../home/link/lib-a");

        let canonical = fs
            .canonicalize(Path::new("/work/app/node_modules/lib-a"))
            .await
            .unwrap();
        assert_eq!(canonical, PathBuf::from("/work/lib-a"));
    }

    #[tokio::test]
    async fn dotdot_after_a_link_is_physical() {
        let fs = MemoryFs::new();
        fs.add_dir("/real/deep/dir")
            .add_file("/real/deep/marker")
            .add_symlink("/short", "/real/deep/dir");

        assert!(fs.exists(Path::new("/short/../marker")).await);
        assert!(!fs.exists(Path::new("/marker")).await);
    }

    #[tokio::test]
    async fn dangling_links_are_entries_only() {
        let fs = MemoryFs::new();
        fs.add_symlink("/app/node_modules/gone", "/nowhere");
        let link = Path::new("/app/node_modules/gone");

        assert!(fs.entry_exists(link).await);
        assert!(!fs.exists(link).await);
        let err = fs.canonicalize(link).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.read_link(link).await.unwrap(), PathBuf::from("/nowhere"));
    }

    #[tokio::test]
    async fn link_loops_are_reported() {
        let fs = MemoryFs::new();
        fs.add_symlink("/a", "/b").add_symlink("/b", "/a");
        assert!(fs.canonicalize(Path::new("/a")).await.is_err());
        assert!(fs.entry_exists(Path::new("/a")).await);
    }

    #[tokio::test]
    async fn symlink_requires_free_slot_and_parent() {
        let fs = MemoryFs::new();
        fs.add_dir("/reg").add_dir("/target");

        fs.symlink(Path::new("/target"), Path::new("/reg/x")).await.unwrap();
        let err = fs
            .symlink(Path::new("/target"), Path::new("/reg/x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(fs
            .symlink(Path::new("/target"), Path::new("/missing/x"))
            .await
            .is_err());
        assert_eq!(fs.link_target("/reg/x"), Some(PathBuf::from("/target")));
    }

    #[tokio::test]
    async fn denied_paths_reject_writes() {
        let fs = MemoryFs::new();
        fs.add_dir("/reg").add_symlink("/reg/x", "/t").deny_writes("/reg/x");

        let err = fs.remove_entry(Path::new("/reg/x")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        fs.allow_writes("/reg/x");
        fs.remove_entry(Path::new("/reg/x")).await.unwrap();
        assert!(!fs.entry_exists(Path::new("/reg/x")).await);
    }

    #[tokio::test]
    async fn removing_a_directory_removes_descendants_not_link_targets() {
        let fs = MemoryFs::new();
        fs.add_file("/app/node_modules/copy/index.js")
            .add_file("/src/index.js")
            .add_symlink("/app/node_modules/link", "/src");

        fs.remove_entry(Path::new("/app/node_modules/copy")).await.unwrap();
        fs.remove_entry(Path::new("/app/node_modules/link")).await.unwrap();
        assert!(!fs.exists(Path::new("/app/node_modules/copy/index.js")).await);
        assert!(fs.exists(Path::new("/src/index.js")).await);
    }
}
