//! End-to-end tests driving the refresh pipeline against a real filesystem.

use std::fs;
use std::path::Path;

use docvers::application::{RefreshOptions, refresh};
use docvers::docs::{AliasPreference, MANIFEST_FILE, META_FILE, Metadata, Version};
use docvers::error::Error;
use docvers::runtime::RealRuntime;
use tempfile::tempdir;

fn ver(s: &str) -> Version {
    Version::normalize(s).unwrap()
}

fn make_dirs(root: &Path, names: &[&str]) {
    for name in names {
        fs::create_dir_all(root.join(name)).unwrap();
    }
}

fn link_target(root: &Path, name: &str) -> String {
    fs::read_link(root.join(name))
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn options(package_version: &str) -> RefreshOptions {
    RefreshOptions {
        package_version: package_version.into(),
        stable: AliasPreference::Auto,
        dev: AliasPreference::Auto,
    }
}

#[test_log::test]
fn refresh_on_all_dev_versions() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v0.0.0", "v0.1.0", "v0.1.1", "v0.2.3", "v0.10.1"]);

    let metadata = refresh(&RealRuntime, root, &options("0.10.1")).unwrap();

    let rendered: Vec<String> = metadata.versions.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["v0.10.1", "v0.2.3", "v0.1.1", "v0.1.0", "v0.0.0"]
    );
    assert_eq!(metadata.stable, None);
    assert_eq!(metadata.dev, Some(ver("0.10.1")));

    // All versions are major-zero, so only the dev alias exists.
    assert!(!root.join("stable").exists());
    assert_eq!(link_target(root, "dev"), "v0.10.1");

    // Minor groups float to their highest patch.
    assert_eq!(link_target(root, "v0.10"), "v0.10.1");
    assert_eq!(link_target(root, "v0.2"), "v0.2.3");
    assert_eq!(link_target(root, "v0.1"), "v0.1.1");
    assert_eq!(link_target(root, "v0.0"), "v0.0.0");

    let manifest = fs::read_to_string(root.join(MANIFEST_FILE)).unwrap();
    assert_eq!(
        manifest,
        "\"use strict\"\n\
         export const DOC_VERSIONS = [\n\
         \t'dev',\n\
         \t'v0.10',\n\
         \t'v0.2',\n\
         \t'v0.1',\n\
         \t'v0.0',\n\
         ];\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("index.html")).unwrap(),
        "<meta http-equiv=\"refresh\" content=\"0; url=dev\"/>"
    );
}

#[test_log::test]
fn refresh_with_pinned_stable() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v0.0.0", "v0.1.0", "v0.1.1", "v0.2.3", "v0.10.1"]);

    let metadata = refresh(
        &RealRuntime,
        root,
        &RefreshOptions {
            package_version: "0.10.1".into(),
            stable: AliasPreference::Pinned("0.2.3".into()),
            dev: AliasPreference::Auto,
        },
    )
    .unwrap();

    assert_eq!(metadata.stable, Some(ver("0.2.3")));
    assert_eq!(metadata.dev, Some(ver("0.10.1")));
    assert_eq!(link_target(root, "stable"), "v0.2.3");
    assert_eq!(link_target(root, "dev"), "v0.10.1");

    // With stable resolved, it leads the manifest and dev trails.
    let manifest = fs::read_to_string(root.join(MANIFEST_FILE)).unwrap();
    assert!(manifest.starts_with("\"use strict\"\nexport const DOC_VERSIONS = [\n\t'stable',"));
    assert!(manifest.ends_with("\t'dev',\n];\n"));
}

#[test_log::test]
fn refresh_with_pin_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v0.1.0"]);

    let err = refresh(
        &RealRuntime,
        root,
        &RefreshOptions {
            package_version: "0.1.0".into(),
            stable: AliasPreference::Pinned("0.11".into()),
            dev: AliasPreference::Auto,
        },
    )
    .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::MissingTarget { link, version }) => {
            assert_eq!(link, "stable");
            assert_eq!(version, "v0.11.0");
        }
        other => panic!("expected MissingTarget, got {other:?}"),
    }
    // The failed build must not have persisted a record naming v0.11.0.
    assert!(!root.join(META_FILE).exists());
}

#[test_log::test]
fn refresh_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v0.1.0", "v1.0.0", "v1.1.0"]);

    let first = refresh(&RealRuntime, root, &options("1.1.0")).unwrap();
    let sidecar_first = fs::read_to_string(root.join(META_FILE)).unwrap();
    let stable_first = link_target(root, "stable");

    let second = refresh(&RealRuntime, root, &options("1.1.0")).unwrap();
    let sidecar_second = fs::read_to_string(root.join(META_FILE)).unwrap();

    assert_eq!(first, second);
    assert_eq!(sidecar_first, sidecar_second);
    assert_eq!(stable_first, link_target(root, "stable"));
}

#[test_log::test]
fn refresh_recovers_after_directory_removal() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v0.1.0", "v0.2.3", "v0.10.1"]);

    let before = refresh(&RealRuntime, root, &options("0.10.1")).unwrap();
    assert_eq!(before.dev, Some(ver("0.10.1")));

    // The dev target disappears between builds, leaving a dangling link.
    fs::remove_dir_all(root.join("v0.10.1")).unwrap();

    let after = refresh(&RealRuntime, root, &options("0.2.3")).unwrap();
    let rendered: Vec<String> = after.versions.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["v0.2.3", "v0.1.0"]);
    assert_eq!(after.dev, Some(ver("0.2.3")));
    assert_eq!(link_target(root, "dev"), "v0.2.3");
    assert!(!root.join("v0.10").exists());
}

#[test_log::test]
fn refresh_keeps_unresolvable_alias_link() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v1.0.0"]);

    // First build establishes stable; no dev link is ever created.
    refresh(&RealRuntime, root, &options("1.0.0")).unwrap();
    assert_eq!(link_target(root, "stable"), "v1.0.0");
    assert!(!root.join("dev").exists());

    // A later build with only a stale stable version still cannot resolve
    // dev; the stable link must survive untouched.
    let metadata = refresh(&RealRuntime, root, &options("1.0.0")).unwrap();
    assert_eq!(metadata.dev, None);
    assert_eq!(link_target(root, "stable"), "v1.0.0");
}

#[test_log::test]
fn refresh_reads_versions_remembered_only_by_sidecar() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v1.0.0", "v1.1.0"]);

    refresh(&RealRuntime, root, &options("1.1.0")).unwrap();

    // Another process rebuilt only v1.0.0; the sidecar still remembers
    // v1.1.0 and its directory is intact, so nothing is lost.
    let metadata = refresh(&RealRuntime, root, &options("1.0.0")).unwrap();
    let rendered: Vec<String> = metadata.versions.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["v1.1.0", "v1.0.0"]);
    assert_eq!(metadata.stable, Some(ver("1.1.0")));
}

#[test_log::test]
fn refresh_with_corrupt_sidecar_starts_fresh() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v1.0.0"]);
    fs::write(root.join(META_FILE), "{definitely not json").unwrap();

    let metadata = refresh(&RealRuntime, root, &options("1.0.0")).unwrap();
    assert_eq!(metadata.stable, Some(ver("1.0.0")));

    let saved: Metadata =
        serde_json::from_str(&fs::read_to_string(root.join(META_FILE)).unwrap()).unwrap();
    assert_eq!(saved, metadata);
}

#[test_log::test]
fn refresh_missing_root_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("absent");

    let err = refresh(&RealRuntime, &root, &options("1.0.0")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::RootNotFound(_))
    ));
}

#[test_log::test]
fn refresh_ignores_foreign_directories() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v1.0.0", "assets", "not-a-version"]);

    let metadata = refresh(&RealRuntime, root, &options("1.0.0")).unwrap();
    let rendered: Vec<String> = metadata.versions.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["v1.0.0"]);
}

#[test_log::test]
fn refresh_prerelease_build_becomes_dev() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    make_dirs(root, &["v1.0.0", "v1.1.0-rc.1"]);

    let metadata = refresh(&RealRuntime, root, &options("1.1.0-rc.1")).unwrap();
    assert_eq!(metadata.stable, Some(ver("1.0.0")));
    assert_eq!(metadata.dev, Some(ver("1.1.0-rc.1")));
    assert_eq!(link_target(root, "stable"), "v1.0.0");
    assert_eq!(link_target(root, "dev"), "v1.1.0-rc.1");
    // The prerelease shares a minor group with nothing stable, so its group
    // link floats to it.
    assert_eq!(link_target(root, "v1.1"), "v1.1.0-rc.1");
    assert_eq!(link_target(root, "v1.0"), "v1.0.0");
}
