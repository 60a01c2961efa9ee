//! The metadata sidecar persisted at the document root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::docs::version::{Alias, Version};
use crate::runtime::Runtime;

/// Sidecar file name, relative to the document root.
pub const META_FILE: &str = "meta.json";

/// The record of known documentation versions and alias pointers.
///
/// `versions` is unique and sorted descending; `stable` and `dev`, when set,
/// are elements of `versions`. The record only exists as the persisted
/// sidecar and as the in-memory value passed through one build.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<Version>,
}

impl Metadata {
    pub fn alias(&self, alias: Alias) -> Option<&Version> {
        match alias {
            Alias::Stable => self.stable.as_ref(),
            Alias::Dev => self.dev.as_ref(),
        }
    }

    /// Load the sidecar from the document root.
    ///
    /// An absent, unreadable or malformed sidecar yields the empty record;
    /// a fresh install starts from nothing.
    #[tracing::instrument(skip(runtime, root))]
    pub fn load<R: Runtime>(runtime: &R, root: &Path) -> Self {
        let path = root.join(META_FILE);
        let content = match runtime.read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                debug!("no readable {META_FILE} under {:?}, starting empty", root);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("discarding malformed {META_FILE}: {err}");
                Self::default()
            }
        }
    }

    /// Overwrite the sidecar with this record.
    #[tracing::instrument(skip(self, runtime, root))]
    pub fn save<R: Runtime>(&self, runtime: &R, root: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize metadata")?;
        runtime
            .write(&root.join(META_FILE), json.as_bytes())
            .context("Failed to write metadata sidecar")
    }
}
