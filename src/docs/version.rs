//! Normalized semantic versions and their classification.
//!
//! Every version used by the reconciliation pipeline passes through
//! [`Version::normalize`] exactly once; raw directory names are never
//! compared directly. Normalization is loose on input (leading `v`, missing
//! components, build metadata) but canonical on output: the rendered form is
//! always `v<major>.<minor>.<patch>[-<prerelease>]`.

use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Release channel of a version.
///
/// Versions below 1.0.0 or carrying a prerelease label are `Dev`; everything
/// else is `Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stable,
    Dev,
}

/// One of the two fixed symbolic link names maintained at the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alias {
    Stable,
    Dev,
}

impl Alias {
    pub const ALL: [Alias; 2] = [Alias::Stable, Alias::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alias::Stable => "stable",
            Alias::Dev => "dev",
        }
    }

    /// The channel a version must belong to for this alias to select it.
    pub fn channel(&self) -> Channel {
        match self {
            Alias::Stable => Channel::Stable,
            Alias::Dev => Channel::Dev,
        }
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized semantic version.
///
/// Wraps [`semver::Version`] with empty build metadata, so equality and
/// ordering follow semver precedence (a prerelease orders below the
/// otherwise-equal release).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    /// Coerce a raw string into a canonical version.
    ///
    /// Accepts a leading `v`/`V`, defaults missing minor/patch components to
    /// zero, strips `+build` metadata and preserves a `-prerelease` suffix.
    /// Fails on empty input, non-numeric components or a malformed
    /// prerelease label.
    pub fn normalize(raw: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidVersion(raw.to_string());

        let input = raw.trim();
        if input.is_empty() {
            return Err(invalid());
        }
        let bare = input.strip_prefix(['v', 'V']).unwrap_or(input);
        // Build metadata never survives normalization.
        let bare = bare.split('+').next().unwrap_or(bare);
        let (triple, prerelease) = match bare.split_once('-') {
            Some((triple, label)) => (triple, Some(label)),
            None => (bare, None),
        };

        let mut components = triple.split('.');
        let mut next_component = |required: bool| -> Result<u64, Error> {
            match components.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let major = next_component(true)?;
        let minor = next_component(false)?;
        let patch = next_component(false)?;
        if components.next().is_some() {
            return Err(invalid());
        }

        let pre = match prerelease {
            Some(label) => Prerelease::new(label).map_err(|_| invalid())?,
            None => Prerelease::EMPTY,
        };

        Ok(Version(semver::Version {
            major,
            minor,
            patch,
            pre,
            build: BuildMetadata::EMPTY,
        }))
    }

    /// The grouping key for "floating" minor-version links.
    pub fn minor_key(&self) -> MinorKey {
        MinorKey {
            major: self.0.major,
            minor: self.0.minor,
        }
    }

    pub fn channel(&self) -> Channel {
        if self.0.major == 0 || !self.0.pre.is_empty() {
            Channel::Dev
        } else {
            Channel::Stable
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::normalize(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::normalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// A version truncated to `v<major>.<minor>`, used for grouping and link
/// naming only, never for identity of the underlying directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinorKey {
    major: u64,
    minor: u64,
}

impl fmt::Display for MinorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
