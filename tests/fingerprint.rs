// tests/fingerprint.rs

mod common;
use crate::common::builders::BuildConfigBuilder;

use proptest::prelude::*;

use assetpipe::fingerprint::{fingerprint, ArtifactNames, FINGERPRINT_SALT};
use assetpipe::types::{CompileMode, WarningLevel};

#[test]
fn unhashed_names_are_plain() {
    let cfg = BuildConfigBuilder::new().name("site").build();
    let names = ArtifactNames::new(&cfg);

    assert_eq!(names.script_artifact_name(), "site.js");
    assert_eq!(names.style_artifact_name(), "site.css");
    assert_eq!(names.source_map_artifact_name(), "site.css.map");
}

#[test]
fn hashed_names_embed_the_fingerprint() {
    let cfg = BuildConfigBuilder::new().hash(true).build();
    let fp = fingerprint(&cfg);
    let names = ArtifactNames::new(&cfg);

    assert_eq!(names.script_artifact_name(), format!("app{fp}.js"));
    assert_eq!(names.style_artifact_name(), format!("app{fp}.css"));
}

#[test]
fn default_hashed_config_has_a_known_fingerprint() {
    // name, output_dir, no sources, SIMPLE_OPTIMIZATIONS, DEFAULT, then the
    // flags debug..source_map as n n Y n n.
    let cfg = BuildConfigBuilder::new().hash(true).build();
    assert_eq!(fingerprint(&cfg), 1_807_757_507);
}

#[test]
fn fields_are_folded_in_a_fixed_order() {
    let cfg = BuildConfigBuilder::new().build();
    let order: Vec<&str> = cfg.fingerprint_fields().iter().map(|(k, _)| *k).collect();

    assert_eq!(
        order,
        vec![
            "name",
            "output_dir",
            "scripts",
            "externs",
            "styles",
            "compile_mode",
            "warning_level",
            "debug",
            "pretty_print",
            "hash",
            "no_watch",
            "source_map",
            "tools",
        ]
    );
    assert_ne!(fingerprint(&cfg), FINGERPRINT_SALT);
}

#[test]
fn fingerprint_is_a_pure_function_of_configuration() {
    let a = BuildConfigBuilder::new().script_root("js").style_root("less").build();
    let b = BuildConfigBuilder::new().script_root("js").style_root("less").build();
    assert_eq!(fingerprint(&a), fingerprint(&b));
}

#[test]
fn each_field_change_changes_the_fingerprint() {
    let base = fingerprint(&BuildConfigBuilder::new().build());

    let variants = vec![
        BuildConfigBuilder::new().name("other").build(),
        BuildConfigBuilder::new().output_dir("dist").build(),
        BuildConfigBuilder::new().script_root("js").build(),
        BuildConfigBuilder::new().extern_root("externs").build(),
        BuildConfigBuilder::new().style_root("less").build(),
        BuildConfigBuilder::new().compile_mode(CompileMode::Advanced).build(),
        BuildConfigBuilder::new().warning_level(WarningLevel::Verbose).build(),
        BuildConfigBuilder::new().pretty_print(true).build(),
        BuildConfigBuilder::new().hash(true).build(),
        BuildConfigBuilder::new().no_watch(true).build(),
        BuildConfigBuilder::new().source_map(true).build(),
    ];

    for cfg in variants {
        assert_ne!(fingerprint(&cfg), base, "{cfg:?}");
    }
}

#[test]
fn debug_flag_alone_changes_the_fingerprint() {
    // Pin the derived fields so only `debug` differs.
    let plain = BuildConfigBuilder::new()
        .compile_mode(CompileMode::Simple)
        .pretty_print(false)
        .build();
    let debug = BuildConfigBuilder::new()
        .debug(true)
        .compile_mode(CompileMode::Simple)
        .pretty_print(false)
        .build();

    assert_ne!(fingerprint(&plain), fingerprint(&debug));
}

proptest! {
    #[test]
    fn hashed_name_is_name_followed_by_fingerprint(name in "[a-z]{1,12}", debug in any::<bool>()) {
        let cfg = BuildConfigBuilder::new().name(&name).debug(debug).hash(true).build();
        let again = BuildConfigBuilder::new().name(&name).debug(debug).hash(true).build();

        let fp = fingerprint(&cfg);
        prop_assert_eq!(fp, fingerprint(&again));

        let names = ArtifactNames::new(&cfg);
        prop_assert_eq!(names.script_artifact_name(), format!("{name}{fp}.js"));
        prop_assert_eq!(names.style_artifact_name(), format!("{name}{fp}.css"));
    }
}
