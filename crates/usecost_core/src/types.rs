use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A third-party import found in a source file.
///
/// Local, absolute and path-aliased imports never become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub source: String,
    /// `"default"` for a default binding, `"*"` for a namespace binding, otherwise the
    /// imported (not local) names. Empty for side-effect imports, requires and dynamic imports.
    pub specifiers: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ImportKind,
    pub file: PathBuf,
    pub line: u32,
}

impl ImportRecord {
    /// Specifiers in ordinal order, independent of how they were written.
    pub fn sorted_specifiers(&self) -> Vec<&str> {
        let mut specs: Vec<&str> = self.specifiers.iter().map(String::as_str).collect();
        specs.sort_unstable();
        specs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    #[serde(rename = "import")]
    StaticImport,
    #[serde(rename = "require")]
    RequireCall,
    #[serde(rename = "dynamic")]
    DynamicImport,
}

impl ImportKind {
    /// Same label the serialized form uses.
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::StaticImport => "import",
            ImportKind::RequireCall => "require",
            ImportKind::DynamicImport => "dynamic",
        }
    }
}

/// Declared identity of an installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub install_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub alias: String,
    pub paths: Vec<String>,
}

/// Path mappings loaded from `tsconfig.json` / `jsconfig.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    pub base_url: PathBuf,
    pub aliases: Vec<PathAlias>,
}

impl AliasConfig {
    pub fn matches(&self, request: &str) -> bool {
        self.aliases.iter().any(|a| {
            request == a.alias
                || request.strip_prefix(a.alias.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
