//! The documentation-versioning domain.
//!
//! The pipeline runs once per documentation build: scan the root, reconcile
//! the persisted record with what is actually on disk, rewrite the alias and
//! minor-version links, and emit the browser manifest.

mod discovery;
mod link;
mod manifest;
mod meta;
mod resolve;
mod version;

pub use discovery::version_directories;
pub use link::relink;
pub use manifest::{INDEX_FILE, MANIFEST_FILE, render, render_redirect};
pub use meta::{META_FILE, Metadata};
pub use resolve::{AliasPreference, AliasPreferences, reconcile};
pub use version::{Alias, Channel, MinorKey, Version};
