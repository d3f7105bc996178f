// src/fingerprint.rs

//! Configuration fingerprint and artifact naming.
//!
//! The fingerprint only distinguishes file names for cache busting. It is a
//! 32-bit string hash folded over the configuration fields in a fixed order,
//! not an integrity check.

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;

/// Starting value of the fold.
pub const FINGERPRINT_SALT: i32 = 5381;

/// One configuration field as seen by the fingerprint.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    List(&'a [String]),
    Text(&'a str),
    Flag(bool),
    /// Not a string, list or flag; contributes nothing.
    Ignored,
}

impl BuildConfig {
    /// Every configuration field, in the order the fingerprint folds them.
    pub fn fingerprint_fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", FieldValue::Text(&self.name)),
            ("output_dir", FieldValue::Text(&self.output_dir_raw)),
            ("scripts", FieldValue::List(&self.sources.scripts)),
            ("externs", FieldValue::List(&self.sources.externs)),
            ("styles", FieldValue::List(&self.sources.styles)),
            ("compile_mode", FieldValue::Text(self.compile_mode.token())),
            ("warning_level", FieldValue::Text(self.warning_level.token())),
            ("debug", FieldValue::Flag(self.debug)),
            ("pretty_print", FieldValue::Flag(self.pretty_print)),
            ("hash", FieldValue::Flag(self.hash)),
            ("no_watch", FieldValue::Flag(self.no_watch)),
            ("source_map", FieldValue::Flag(self.source_map)),
            ("tools", FieldValue::Ignored),
        ]
    }
}

/// `hash = (hash << 5) - hash + c` for every char, wrapping at 32 bits.
fn fold_str(hash: i32, s: &str) -> i32 {
    s.chars().fold(hash, |h, c| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32)
    })
}

fn fold_field(hash: i32, value: FieldValue<'_>) -> i32 {
    match value {
        FieldValue::List(items) => items.iter().fold(hash, |h, item| fold_str(h, item)),
        FieldValue::Text(s) => fold_str(hash, s),
        FieldValue::Flag(true) => fold_str(hash, "Y"),
        FieldValue::Flag(false) => fold_str(hash, "n"),
        FieldValue::Ignored => hash,
    }
}

/// Deterministic fingerprint of `cfg`.
pub fn fingerprint(cfg: &BuildConfig) -> i32 {
    cfg.fingerprint_fields()
        .into_iter()
        .fold(FINGERPRINT_SALT, |h, (_, value)| fold_field(h, value))
}

/// Artifact file names, fingerprinted when `hash = true`.
///
/// Template code should ask for these names instead of hard-coding them,
/// because fingerprinting makes them change with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    output_dir: PathBuf,
    script: String,
    style: String,
    source_map: String,
}

impl ArtifactNames {
    pub fn new(cfg: &BuildConfig) -> Self {
        let stem = if cfg.hash {
            format!("{}{}", cfg.name, fingerprint(cfg))
        } else {
            cfg.name.clone()
        };
        Self {
            output_dir: cfg.output_dir.clone(),
            script: format!("{stem}.js"),
            style: format!("{stem}.css"),
            source_map: format!("{stem}.css.map"),
        }
    }

    pub fn script_artifact_name(&self) -> &str {
        &self.script
    }

    pub fn style_artifact_name(&self) -> &str {
        &self.style
    }

    pub fn source_map_artifact_name(&self) -> &str {
        &self.source_map
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join(&self.script)
    }

    pub fn style_path(&self) -> PathBuf {
        self.output_dir.join(&self.style)
    }

    pub fn source_map_path(&self) -> PathBuf {
        self.output_dir.join(&self.source_map)
    }
}
