// src/types.rs

use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// The two independently tracked pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Script,
    Style,
}

impl ResourceKind {
    /// Every kind, in the order startup decisions are made.
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Script, ResourceKind::Style];

    /// Classify a source file by its extension.
    ///
    /// Scripts and templates feed the script pipeline; stylesheets and style
    /// includes feed the style pipeline. Anything else is not ours.
    pub fn classify(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "soy" => Some(ResourceKind::Script),
            "css" | "less" => Some(ResourceKind::Style),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Style => "style",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimisation level handed to the script compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    Whitespace,
    Simple,
    Advanced,
}

impl CompileMode {
    /// Token passed on the collaborator command line.
    pub fn token(&self) -> &'static str {
        match self {
            CompileMode::Whitespace => "WHITESPACE_ONLY",
            CompileMode::Simple => "SIMPLE_OPTIMIZATIONS",
            CompileMode::Advanced => "ADVANCED_OPTIMIZATIONS",
        }
    }

    /// Mode used when the config does not override it.
    pub fn default_for(debug: bool) -> Self {
        if debug {
            CompileMode::Whitespace
        } else {
            CompileMode::Simple
        }
    }
}

/// Diagnostic verbosity handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Quiet,
    #[default]
    Default,
    Verbose,
}

impl WarningLevel {
    pub fn token(&self) -> &'static str {
        match self {
            WarningLevel::Quiet => "QUIET",
            WarningLevel::Default => "DEFAULT",
            WarningLevel::Verbose => "VERBOSE",
        }
    }
}
