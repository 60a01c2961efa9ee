//! Refresh action - the post-build reconciliation pass.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::docs::{
    AliasPreference, AliasPreferences, INDEX_FILE, MANIFEST_FILE, Metadata, Version, reconcile,
    relink, render, render_redirect,
};
use crate::error::Error;
use crate::runtime::Runtime;

/// Inputs the host build supplies for one refresh pass.
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Version of the package whose documentation was just built.
    pub package_version: String,
    pub stable: AliasPreference,
    pub dev: AliasPreference,
}

/// Run the full pipeline against a document root: reconcile the sidecar with
/// the on-disk versions, rewrite the links, emit the browser manifest and
/// redirect page, and persist the refreshed record.
///
/// Returns the record that was persisted.
#[tracing::instrument(skip(runtime))]
pub fn refresh<R: Runtime>(runtime: &R, root: &Path, options: &RefreshOptions) -> Result<Metadata> {
    if !runtime.is_dir(root) {
        return Err(Error::RootNotFound(root.to_path_buf()).into());
    }

    // A broken version of the package itself aborts the build; every other
    // malformed version string merely degrades.
    let package_version = Version::normalize(&options.package_version)
        .context("the package version for this build is malformed")?;

    let prev = Metadata::load(runtime, root);
    let prefs = AliasPreferences {
        stable: options.stable.clone(),
        dev: options.dev.clone(),
    };
    let metadata = reconcile(runtime, &prev, root, &package_version, &prefs)?;
    relink(runtime, &metadata, root)?;

    runtime
        .write(&root.join(MANIFEST_FILE), render(&metadata).as_bytes())
        .context("Failed to write version manifest")?;
    runtime
        .write(&root.join(INDEX_FILE), render_redirect(&metadata).as_bytes())
        .context("Failed to write redirect page")?;

    metadata.save(runtime, root)?;

    info!(
        versions = metadata.versions.len(),
        stable = %metadata.stable.as_ref().map(ToString::to_string).unwrap_or_default(),
        dev = %metadata.dev.as_ref().map(ToString::to_string).unwrap_or_default(),
        "documentation root refreshed"
    );
    Ok(metadata)
}
