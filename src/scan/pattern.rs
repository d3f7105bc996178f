// src/scan/pattern.rs

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::errors::Result;

/// Extension-matching pattern applied to the final path segment.
#[derive(Clone)]
pub struct ExtensionPattern {
    regex: Regex,
}

impl fmt::Debug for ExtensionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtensionPattern")
            .field(&self.regex.as_str())
            .finish()
    }
}

impl ExtensionPattern {
    /// Compile a regex that will be matched against file names.
    pub fn new(regex: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(regex)?,
        })
    }

    /// Plain script sources.
    pub fn scripts() -> Self {
        Self::builtin(r"\.js$")
    }

    /// Template sources handed to the transpiler.
    pub fn templates() -> Self {
        Self::builtin(r"\.soy$")
    }

    /// Everything that feeds the script pipeline (scripts and templates).
    pub fn script_inputs() -> Self {
        Self::builtin(r"\.(js|soy)$")
    }

    /// Stylesheets and style includes.
    pub fn styles() -> Self {
        Self::builtin(r"\.(css|less)$")
    }

    fn builtin(regex: &str) -> Self {
        Self {
            regex: Regex::new(regex).expect("built-in extension pattern is valid"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True if the file name of `path` matches.
    pub fn matches(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.regex.is_match(&name.to_string_lossy()),
            None => false,
        }
    }
}
