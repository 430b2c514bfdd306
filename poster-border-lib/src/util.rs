use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components and redundant separators without
/// touching the file system.
///
/// A leading `..` on a relative path is kept; `..` directly under the root
/// is dropped. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
