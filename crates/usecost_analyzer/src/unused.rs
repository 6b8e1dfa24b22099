use log::{debug, warn};
use std::{
    collections::{BTreeSet, HashSet},
    fs,
    path::Path,
};

/// Names in the `dependencies` table of `<root>/package.json`.
///
/// `None` when the manifest is missing or unreadable.
pub fn read_declared_dependencies(root: &Path) -> Option<Vec<String>> {
    let manifest = root.join("package.json");
    if !manifest.is_file() {
        debug!("No package.json at {}", manifest.display());
        return None;
    }

    let json = match fs::read_to_string(&manifest)
        .map_err(anyhow::Error::from)
        .and_then(|txt| Ok(serde_json::from_str::<serde_json::Value>(&txt)?))
    {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to read {}: {}", manifest.display(), e);
            return None;
        }
    };

    let names = json
        .get("dependencies")
        .and_then(|d| d.as_object())
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default();
    Some(names)
}

/// Declared dependencies that no import refers to.
///
/// Approximate: conditional or computed requires are invisible to extraction.
pub fn find_unused_dependencies(declared: &[String], used: &HashSet<String>) -> BTreeSet<String> {
    declared.iter().filter(|name| !used.contains(*name)).cloned().collect()
}
