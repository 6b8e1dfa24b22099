//! Persistent size cache.
//!
//! One JSON file per fingerprint, `<sha256-hex>.json`, holding
//! `{ "timestamp": <epoch-millis>, "data": <SizeResult> }`. Fingerprints cover the
//! installed package name and version, so entries are shared across projects but
//! never across versions. Imports of packages that cannot be resolved bypass the cache.

use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use usecost_core::{ImportRecord, PackageInfo, package_name, resolve_package};

use crate::types::SizeResult;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: u64,
    data: SizeResult,
}

pub struct SizeCache {
    dir: PathBuf,
    ttl: Duration,
    packages: DashMap<(PathBuf, String), Option<PackageInfo>>,
}

impl SizeCache {
    /// Opens (creating if needed) the cache directory.
    pub fn open(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        debug!("Opened size cache at {} (ttl {:?})", dir.display(), ttl);
        Ok(Self { dir, ttl, packages: DashMap::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A fresh cached measurement for `import`, re-bound to this record.
    ///
    /// Missing, expired, unreadable and malformed entries all read as a miss.
    pub fn get(&self, import: &ImportRecord, project_root: &Path) -> Option<SizeResult> {
        let path = self.entry_path(import, project_root)?;
        let text = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) => {
                debug!("Ignoring malformed cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        let age = Duration::from_millis(now_millis().saturating_sub(entry.timestamp));
        if age > self.ttl {
            trace!("Cache entry for '{}' expired ({:?} old)", import.source, age);
            return None;
        }

        trace!("Cache hit for '{}'", import.source);
        Some(SizeResult { import: import.clone(), ..entry.data })
    }

    /// Stores `result`; a no-op for unresolvable packages. Write failures are logged.
    pub fn set(&self, result: &SizeResult, project_root: &Path) {
        let Some(path) = self.entry_path(&result.import, project_root) else {
            trace!("Not caching '{}': package not resolvable", result.import.source);
            return;
        };

        let entry = CacheEntry { timestamp: now_millis(), data: result.clone() };
        let written = serde_json::to_string_pretty(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&path, json).map_err(anyhow::Error::from));
        if let Err(e) = written {
            warn!("Failed to write cache entry {}: {}", path.display(), e);
        }
    }

    pub fn has(&self, import: &ImportRecord, project_root: &Path) -> bool {
        self.get(import, project_root).is_some()
    }

    pub(crate) fn entry_path(&self, import: &ImportRecord, project_root: &Path) -> Option<PathBuf> {
        let name = package_name(&import.source);
        let info = self.resolve(name, project_root)?;
        Some(self.dir.join(format!("{}.json", fingerprint(&info, import))))
    }

    fn resolve(&self, name: &str, project_root: &Path) -> Option<PackageInfo> {
        let key = (project_root.to_path_buf(), name.to_string());
        if let Some(v) = self.packages.get(&key) {
            return v.value().clone();
        }
        let info = resolve_package(name, project_root);
        self.packages.insert(key, info.clone());
        info
    }
}

/// SHA-256 hex of `name@version[/subpath]:sorted,specifiers`.
pub fn fingerprint(info: &PackageInfo, import: &ImportRecord) -> String {
    let subpath = &import.source[package_name(&import.source).len()..];
    let data = format!(
        "{}@{}{}:{}",
        info.name,
        info.version,
        subpath,
        import.sorted_specifiers().join(",")
    );
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
