//! List action - read-only view of the persisted record.

use anyhow::Result;
use std::path::Path;

use crate::docs::{Alias, Channel, Metadata};
use crate::error::Error;
use crate::runtime::Runtime;

/// One known documentation version, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionInfo {
    pub version: String,
    pub channel: &'static str,
    /// Aliases currently pointing at this version.
    pub aliases: Vec<&'static str>,
}

/// Report the versions the sidecar knows about, newest first.
pub fn list_versions<R: Runtime>(runtime: &R, root: &Path) -> Result<Vec<VersionInfo>> {
    if !runtime.is_dir(root) {
        return Err(Error::RootNotFound(root.to_path_buf()).into());
    }

    let metadata = Metadata::load(runtime, root);
    Ok(metadata
        .versions
        .iter()
        .map(|version| VersionInfo {
            version: version.to_string(),
            channel: match version.channel() {
                Channel::Stable => "stable",
                Channel::Dev => "dev",
            },
            aliases: Alias::ALL
                .iter()
                .filter(|alias| metadata.alias(**alias) == Some(version))
                .map(|alias| alias.as_str())
                .collect(),
        })
        .collect())
}
