//! Typed errors for the version-reconciliation pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be coerced into a semantic version.
    #[error("not a semantic version: {0:?}")]
    InvalidVersion(String),

    /// The documentation root is missing or not a directory.
    #[error("documentation root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A link resolved to a version that has no directory under the root.
    #[error("document directory does not exist: {version} (required by the {link} link)")]
    MissingTarget { link: String, version: String },
}
