//! Scanning the document root for version directories.

use anyhow::Result;
use std::path::Path;

use crate::error::Error;
use crate::runtime::Runtime;

/// List the names of all immediate child directories of the document root.
///
/// Returns raw names; version parsing and filtering is the caller's job.
/// Fails when the root itself is missing or not a directory.
#[tracing::instrument(skip(runtime, root))]
pub fn version_directories<R: Runtime>(runtime: &R, root: &Path) -> Result<Vec<String>> {
    if !runtime.is_dir(root) {
        return Err(Error::RootNotFound(root.to_path_buf()).into());
    }

    let mut names = Vec::new();
    for entry in runtime.read_dir(root)? {
        if !runtime.is_dir(&entry) {
            continue;
        }
        if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_lists_child_directories() {
        let mut runtime = MockRuntime::new();
        let root = PathBuf::from("/docs");

        runtime
            .expect_is_dir()
            .with(eq(root.clone()))
            .returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(root.clone()))
            .returning(|p| Ok(vec![p.join("v0.1.0"), p.join("v0.2.3"), p.join("notes.md")]));
        runtime
            .expect_is_dir()
            .returning(|p| p.file_name().is_some_and(|n| n != "notes.md"));

        let names = version_directories(&runtime, &root).unwrap();
        assert_eq!(names, vec!["v0.1.0", "v0.2.3"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let mut runtime = MockRuntime::new();
        let root = PathBuf::from("/nowhere");

        runtime
            .expect_is_dir()
            .with(eq(root.clone()))
            .returning(|_| false);

        let err = version_directories(&runtime, &root).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::RootNotFound(_))
        ));
    }

    #[test]
    fn test_empty_root() {
        let mut runtime = MockRuntime::new();
        let root = PathBuf::from("/docs");

        runtime
            .expect_is_dir()
            .with(eq(root.clone()))
            .returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(root.clone()))
            .returning(|_| Ok(vec![]));

        assert!(version_directories(&runtime, &root).unwrap().is_empty());
    }
}
