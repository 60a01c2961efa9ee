//! Maintenance of the alias and minor-version symlinks at the document root.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::debug;

use crate::docs::meta::Metadata;
use crate::docs::version::{Alias, Channel, MinorKey, Version};
use crate::error::Error;
use crate::runtime::Runtime;

/// Bring the symlinks under `root` in line with the resolved record.
///
/// Creates or replaces one link per resolved alias and one per minor-version
/// group. An unresolved alias leaves any existing link of that name in
/// place; a resolved alias whose version directory is missing is a fatal
/// misconfiguration.
#[tracing::instrument(skip(runtime, metadata, root))]
pub fn relink<R: Runtime>(runtime: &R, metadata: &Metadata, root: &Path) -> Result<()> {
    for alias in Alias::ALL {
        match metadata.alias(alias) {
            Some(version) => replace_link(runtime, root, alias.as_str(), version)?,
            None => debug!(%alias, "alias unresolved, leaving any existing link in place"),
        }
    }

    for (key, version) in minor_targets(metadata) {
        replace_link(runtime, root, &key.to_string(), &version)?;
    }
    Ok(())
}

/// Swap the entry named `name` for a symlink to `version`'s directory.
///
/// The old link is removed only once the target is known to exist, and the
/// new link is created immediately after, so the entry is never left absent
/// longer than the swap itself. Targets are bare directory names, relative
/// to the root.
fn replace_link<R: Runtime>(
    runtime: &R,
    root: &Path,
    name: &str,
    version: &Version,
) -> Result<()> {
    let target = version.to_string();
    if !runtime.is_dir(&root.join(&target)) {
        return Err(Error::MissingTarget {
            link: name.to_string(),
            version: target,
        }
        .into());
    }

    let link = root.join(name);
    if runtime.is_symlink(&link) {
        runtime
            .remove_symlink(&link)
            .with_context(|| format!("Failed to remove old {name} link"))?;
    } else if runtime.exists(&link) {
        bail!("{link:?} exists but is not a symlink, refusing to replace it");
    }
    runtime
        .symlink(Path::new(&target), &link)
        .with_context(|| format!("Failed to link {name} to {target}"))?;
    debug!(link = name, target = %version, "replaced link");
    Ok(())
}

/// The link target for every minor-version group: the highest stable patch
/// of the group when one exists, else the highest patch overall.
fn minor_targets(metadata: &Metadata) -> Vec<(MinorKey, Version)> {
    let mut targets: Vec<(MinorKey, Version)> = Vec::new();
    for version in &metadata.versions {
        let key = version.minor_key();
        if targets.iter().any(|(k, _)| *k == key) {
            continue;
        }
        // `versions` is descending, so the first match per group wins.
        let group = || metadata.versions.iter().filter(|v| v.minor_key() == key);
        let best = group()
            .find(|v| channel_in(metadata, v) == Channel::Stable)
            .or_else(|| group().next())
            .cloned();
        if let Some(best) = best {
            targets.push((key, best));
        }
    }
    targets
}

/// Channel of a version within a resolved record: the alias pointers act as
/// the pin record, overriding plain classification.
fn channel_in(metadata: &Metadata, version: &Version) -> Channel {
    if metadata.stable.as_ref() == Some(version) {
        Channel::Stable
    } else if metadata.dev.as_ref() == Some(version) {
        Channel::Dev
    } else {
        version.channel()
    }
}
