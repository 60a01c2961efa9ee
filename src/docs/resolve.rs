//! Reconciliation of remembered metadata against the live document root.
//!
//! The resolver merges the persisted record, the directory listing, the
//! version just built and the currently advertised alias links into one
//! canonical record: a descending unique version list plus the `stable` and
//! `dev` pointers.

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::docs::discovery::version_directories;
use crate::docs::meta::Metadata;
use crate::docs::version::{Alias, Channel, Version};
use crate::runtime::Runtime;

/// Per-alias user preference: let the resolver decide, or pin a version.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AliasPreference {
    #[default]
    Auto,
    Pinned(String),
}

impl FromStr for AliasPreference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Ok(AliasPreference::Auto)
        } else {
            Ok(AliasPreference::Pinned(trimmed.to_string()))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AliasPreferences {
    pub stable: AliasPreference,
    pub dev: AliasPreference,
}

/// Merge the previous record with the live state of `root` into a fresh one.
///
/// A remembered version survives only while its directory does. The package
/// version and explicit pins are kept unconditionally: they name the build
/// that just ran or a version the user demands. A pin with no directory
/// fails later, at link time.
#[tracing::instrument(skip(runtime, prev, prefs))]
pub fn reconcile<R: Runtime>(
    runtime: &R,
    prev: &Metadata,
    root: &Path,
    package_version: &Version,
    prefs: &AliasPreferences,
) -> Result<Metadata> {
    let stable_pin = normalized_pin(Alias::Stable, &prefs.stable);
    let dev_pin = normalized_pin(Alias::Dev, &prefs.dev);

    let mut candidates: BTreeSet<Version> = BTreeSet::new();

    // Remembered versions, kept only while their directories exist.
    let remembered = prev
        .versions
        .iter()
        .chain(prev.stable.iter())
        .chain(prev.dev.iter());
    for version in remembered {
        if runtime.is_dir(&root.join(version.to_string())) {
            candidates.insert(version.clone());
        } else {
            debug!(%version, "dropping remembered version, directory is gone");
        }
    }

    // Live directory listing. Names that do not parse are not ours to manage;
    // names that parse to a version with no directory of that canonical name
    // (e.g. the minor-version links) contribute nothing new.
    for name in version_directories(runtime, root)? {
        let Ok(version) = Version::normalize(&name) else {
            debug!(directory = %name, "skipping non-version directory");
            continue;
        };
        if runtime.is_dir(&root.join(version.to_string())) {
            candidates.insert(version);
        }
    }

    // The versions the alias links currently advertise, as long as they
    // still exist on disk.
    for alias in Alias::ALL {
        if let Some(version) = link_version(runtime, root, alias) {
            if runtime.is_dir(&root.join(version.to_string())) {
                candidates.insert(version);
            }
        }
    }

    candidates.insert(package_version.clone());
    candidates.extend(stable_pin.clone());
    candidates.extend(dev_pin.clone());

    let versions: Vec<Version> = candidates.into_iter().rev().collect();

    let stable = resolve_alias(Alias::Stable, &versions, &stable_pin, &dev_pin, None);
    let dev = resolve_alias(Alias::Dev, &versions, &stable_pin, &dev_pin, stable.as_ref());

    Ok(Metadata {
        versions,
        stable,
        dev,
    })
}

/// Pick the version an alias should point at, or `None` when no candidate
/// qualifies (a valid state: an install may hold only dev versions, or none).
///
/// An explicit pin always wins. Otherwise the highest version whose
/// effective channel matches the alias is chosen, with one guard: an
/// auto-resolved `dev` older than `stable` is suppressed, since a document
/// set must never advertise a dev alias behind its stable one.
fn resolve_alias(
    alias: Alias,
    versions: &[Version],
    stable_pin: &Option<Version>,
    dev_pin: &Option<Version>,
    stable: Option<&Version>,
) -> Option<Version> {
    let pin = match alias {
        Alias::Stable => stable_pin,
        Alias::Dev => dev_pin,
    };
    if let Some(version) = pin {
        debug!(%alias, %version, "alias pinned by configuration");
        return Some(version.clone());
    }

    let candidate = versions
        .iter()
        .find(|v| effective_channel(v, stable_pin, dev_pin) == alias.channel())
        .cloned();

    if alias == Alias::Dev {
        if let (Some(dev), Some(stable)) = (&candidate, stable) {
            if dev < stable {
                debug!(%dev, %stable, "suppressing dev alias older than stable");
                return None;
            }
        }
    }
    candidate
}

/// Channel of a version once user pins are taken into account: a version
/// pinned to an alias counts as that alias's channel regardless of its
/// classification.
fn effective_channel(
    version: &Version,
    stable_pin: &Option<Version>,
    dev_pin: &Option<Version>,
) -> Channel {
    if stable_pin.as_ref() == Some(version) {
        Channel::Stable
    } else if dev_pin.as_ref() == Some(version) {
        Channel::Dev
    } else {
        version.channel()
    }
}

fn normalized_pin(alias: Alias, pref: &AliasPreference) -> Option<Version> {
    match pref {
        AliasPreference::Auto => None,
        AliasPreference::Pinned(raw) => match Version::normalize(raw) {
            Ok(version) => Some(version),
            Err(err) => {
                warn!(%alias, input = %raw, "ignoring unparseable alias preference: {err}");
                None
            }
        },
    }
}

/// The version an existing alias link points at, recovered from its target's
/// directory name. Absent links, foreign entries and unparseable targets all
/// yield `None`.
fn link_version<R: Runtime>(runtime: &R, root: &Path, alias: Alias) -> Option<Version> {
    let link = root.join(alias.as_str());
    if !runtime.is_symlink(&link) {
        return None;
    }
    let target = runtime.read_link(&link).ok()?;
    let name = target.file_name()?.to_str()?;
    Version::normalize(name).ok()
}
