use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::PathBuf};

use usecost_core::ImportRecord;

/// Byte counts for one measured bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub raw: u64,
    pub minified: u64,
    pub gzipped: u64,
}

impl Size {
    pub fn is_zero(&self) -> bool {
        self.raw == 0 && self.minified == 0 && self.gzipped == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeResult {
    pub import: ImportRecord,
    /// All zero when the measurement failed
    pub size: Size,
    /// Milliseconds spent measuring
    pub duration: u64,
}

impl SizeResult {
    pub fn failed(import: ImportRecord, duration: u64) -> Self {
        Self { import, size: Size::default(), duration }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_packages: usize,
    pub total_raw: u64,
    pub total_minified: u64,
    pub total_gzipped: u64,
    /// Wall-clock milliseconds for the whole run
    pub duration: u64,
}

/// Sizes summed over every import of one top-level package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSize {
    pub name: String,
    pub size: Size,
    pub imports: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Project root the import paths live under
    #[serde(skip)]
    pub root: PathBuf,
    pub imports: Vec<SizeResult>,
    pub summary: AnalysisSummary,
    /// `None` when the project has no readable manifest or detection was disabled
    pub unused_dependencies: Option<BTreeSet<String>>,
}
