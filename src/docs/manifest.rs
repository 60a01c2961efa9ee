//! Rendering of the browser-side version manifest.
//!
//! The manifest is a tiny ES module consumed by the selector widget shipped
//! with each documentation build. Pure string formatting, no I/O.

use crate::docs::meta::Metadata;
use crate::docs::version::{Alias, MinorKey};

/// Manifest file name, relative to the document root.
pub const MANIFEST_FILE: &str = "versions.js";

/// Redirect page name, relative to the document root.
pub const INDEX_FILE: &str = "index.html";

/// Render the ordered list of selector keys as a script.
///
/// The lead key is the active alias (`stable` when resolved, else `dev`),
/// followed by each distinct minor version in descending order, and `dev`
/// once more when it is resolved and not already the lead.
pub fn render(metadata: &Metadata) -> String {
    let lead = if metadata.stable.is_some() {
        Alias::Stable
    } else {
        Alias::Dev
    };

    let mut keys = vec![lead.as_str().to_string()];
    let mut seen: Vec<MinorKey> = Vec::new();
    for version in &metadata.versions {
        let key = version.minor_key();
        if !seen.contains(&key) {
            seen.push(key);
            keys.push(key.to_string());
        }
    }
    if lead != Alias::Dev && metadata.dev.is_some() {
        keys.push(Alias::Dev.as_str().to_string());
    }

    let mut lines = vec![
        "\"use strict\"".to_string(),
        "export const DOC_VERSIONS = [".to_string(),
    ];
    lines.extend(keys.iter().map(|key| format!("\t'{key}',")));
    lines.push("];".to_string());
    lines.join("\n") + "\n"
}

/// Render the root redirect page pointing at the active alias.
pub fn render_redirect(metadata: &Metadata) -> String {
    let lead = if metadata.stable.is_some() {
        Alias::Stable
    } else {
        Alias::Dev
    };
    format!("<meta http-equiv=\"refresh\" content=\"0; url={lead}\"/>")
}
