// tests/scanner.rs

mod common;
use crate::common::init_tracing;

use std::path::PathBuf;

use proptest::prelude::*;

use assetpipe::fs::mock::MockFileSystem;
use assetpipe::scan::{is_backup_entry, scan_sources, ExtensionPattern, SourceScan};

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

#[test]
fn scan_yields_matching_files_sorted_within_each_directory() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/src/js/b.js");
    fs.add_file("/src/js/a.js");
    fs.add_file("/src/js/readme.txt");
    fs.add_file("/src/js/lib/c.js");

    let found = scan_sources(&fs, &paths(&["/src/js"]), &ExtensionPattern::scripts());

    assert_eq!(
        found,
        paths(&["/src/js/a.js", "/src/js/b.js", "/src/js/lib/c.js"])
    );
}

#[test]
fn subdirectory_contents_appear_at_the_subdirectory_position() {
    let fs = MockFileSystem::new();
    fs.add_file("/r/z.js");
    fs.add_file("/r/m/inner.js");
    fs.add_file("/r/a.js");

    let found = scan_sources(&fs, &paths(&["/r"]), &ExtensionPattern::scripts());

    assert_eq!(found, paths(&["/r/a.js", "/r/m/inner.js", "/r/z.js"]));
}

#[test]
fn roots_are_visited_in_configured_order() {
    let fs = MockFileSystem::new();
    fs.add_file("/b/one.js");
    fs.add_file("/a/two.js");

    let found = scan_sources(&fs, &paths(&["/b", "/a"]), &ExtensionPattern::scripts());

    assert_eq!(found, paths(&["/b/one.js", "/a/two.js"]));
}

#[test]
fn file_root_is_yielded_when_it_matches() {
    let fs = MockFileSystem::new();
    fs.add_file("/single/app.js");
    fs.add_file("/single/app.css");

    let roots = paths(&["/single/app.js", "/single/app.css"]);
    let found = scan_sources(&fs, &roots, &ExtensionPattern::scripts());

    assert_eq!(found, paths(&["/single/app.js"]));
}

#[test]
fn backup_entries_are_neither_yielded_nor_descended_into() {
    let fs = MockFileSystem::new();
    fs.add_file("/src/.#a.js");
    fs.add_file("/src/.#locked/inner.js");
    fs.add_file("/src/ok.js");

    let found = scan_sources(&fs, &paths(&["/src"]), &ExtensionPattern::scripts());

    assert_eq!(found, paths(&["/src/ok.js"]));
}

#[test]
fn backup_marker_applies_to_roots_too() {
    let fs = MockFileSystem::new();
    fs.add_file("/src/.#root/a.js");

    let found = scan_sources(&fs, &paths(&["/src/.#root"]), &ExtensionPattern::scripts());

    assert!(found.is_empty());
}

#[test]
fn missing_root_contributes_nothing() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/present/a.js");

    let found = scan_sources(
        &fs,
        &paths(&["/missing", "/present"]),
        &ExtensionPattern::scripts(),
    );

    assert_eq!(found, paths(&["/present/a.js"]));
}

#[test]
fn scan_is_restartable() {
    let fs = MockFileSystem::new();
    fs.add_file("/s/a.less");
    fs.add_file("/s/b.css");

    let roots = paths(&["/s"]);
    let pattern = ExtensionPattern::styles();
    let scan = SourceScan::new(&fs, &roots, &pattern);

    let first: Vec<PathBuf> = scan.iter().collect();
    let second = scan.collect();

    assert_eq!(first, second);
    assert_eq!(first, paths(&["/s/a.less", "/s/b.css"]));
}

#[test]
fn invalid_custom_pattern_is_rejected() {
    assert!(ExtensionPattern::new(r"\.(js").is_err());
    let custom = ExtensionPattern::new(r"\.ts$").unwrap();
    assert!(custom.matches(&PathBuf::from("/x/y.ts")));
    assert!(!custom.matches(&PathBuf::from("/x/y.js")));
}

fn file_name_strategy() -> impl Strategy<Value = String> {
    (any::<bool>(), "[a-z]{1,6}", prop_oneof![Just("js"), Just("css"), Just("txt")])
        .prop_map(|(backup, stem, ext)| {
            if backup {
                format!(".#{stem}.{ext}")
            } else {
                format!("{stem}.{ext}")
            }
        })
}

proptest! {
    #[test]
    fn scan_never_yields_backup_entries(
        names in proptest::collection::vec(file_name_strategy(), 0..20),
        nested in proptest::collection::vec(file_name_strategy(), 0..10),
    ) {
        let fs = MockFileSystem::new();
        for name in &names {
            fs.add_file(format!("/root/{name}"));
        }
        for name in &nested {
            fs.add_file(format!("/root/.#dir/{name}"));
            fs.add_file(format!("/root/dir/{name}"));
        }

        let roots = paths(&["/root"]);
        let found = scan_sources(&fs, &roots, &ExtensionPattern::scripts());

        for path in &found {
            prop_assert!(path.components().all(|c| !c.as_os_str().to_string_lossy().starts_with(".#")));
            prop_assert!(!is_backup_entry(path));
            prop_assert!(path.extension().is_some_and(|e| e == "js"));
        }
    }

    #[test]
    fn scan_output_is_stable_and_sorted(
        names in proptest::collection::btree_set("[a-z]{1,8}", 0..25),
    ) {
        let fs = MockFileSystem::new();
        // Insert in reverse so directory listings are not pre-sorted.
        for name in names.iter().rev() {
            fs.add_file(format!("/flat/{name}.js"));
        }

        let roots = paths(&["/flat"]);
        let pattern = ExtensionPattern::scripts();
        let first = scan_sources(&fs, &roots, &pattern);
        let second = scan_sources(&fs, &roots, &pattern);

        prop_assert_eq!(&first, &second);
        let mut sorted = first.clone();
        sorted.sort();
        prop_assert_eq!(first.len(), names.len());
        prop_assert_eq!(first, sorted);
    }
}
