// relink-common/src/path.rs
use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` segments without touching the filesystem.
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if at_parent || (!out.pop() && !path.is_absolute()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(if path.is_absolute() { "/" } else { "." });
    }
    out
}

/// Removes `relative` from the end of `path`, comparing whole components.
///
/// `.` segments in `relative` are ignored. Returns `None` when `relative` is
/// empty, contains `..`, or is not a trailing run of `path`'s components.
pub fn strip_relative_suffix(path: &Path, relative: &str) -> Option<PathBuf> {
    let mut suffix = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(name) => suffix.push(name),
            // A leading separator still means "relative to the project".
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    if suffix.is_empty() {
        return None;
    }

    let mut root = path.to_path_buf();
    for expected in suffix.iter().rev() {
        if root.file_name() != Some(*expected) {
            return None;
        }
        root.pop();
    }
    Some(root)
}
