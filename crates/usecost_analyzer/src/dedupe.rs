use log::debug;
use std::collections::HashSet;

use usecost_core::ImportRecord;

/// `source` plus its specifiers in ordinal order. Two records share a key exactly
/// when they would bundle to the same entry module.
pub fn unique_key(import: &ImportRecord) -> String {
    format!("{}:{}", import.source, import.sorted_specifiers().join(","))
}

/// Keeps the first record for every unique key, in first-seen order.
pub fn deduplicate(imports: &[ImportRecord]) -> Vec<ImportRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(imports.len());
    let unique: Vec<ImportRecord> =
        imports.iter().filter(|i| seen.insert(unique_key(i))).cloned().collect();
    debug!("Deduplicated {} imports into {}", imports.len(), unique.len());
    unique
}
