use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::{COMPONENT_EXTENSIONS, DEFAULT_EXCLUDES, DEFAULT_INCLUDES, JS_TS_EXTENSIONS};

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Glob patterns relative to `root`; empty means [`DEFAULT_INCLUDES`]
    pub include: Vec<String>,
    /// Glob patterns relative to `root`; empty means [`DEFAULT_EXCLUDES`]
    pub exclude: Vec<String>,
}

pub fn collect_source_files(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting source files");
    let root = &cfg.root;
    if !root.is_dir() {
        bail!("Project root {} is not a directory", root.display());
    }

    let include = build_glob_set(&cfg.include, DEFAULT_INCLUDES)?;
    let exclude = build_glob_set(&cfg.exclude, DEFAULT_EXCLUDES)?;

    let prune_root = root.clone();
    let prune_set = exclude.clone();
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .filter_entry(move |dent| {
            if !dent.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            match dent.path().strip_prefix(&prune_root) {
                Ok(rel) if !rel.as_os_str().is_empty() => !excludes_dir(&prune_set, rel),
                _ => true,
            }
        })
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }
        let Ok(rel) = p.strip_prefix(root) else {
            continue;
        };
        if exclude.is_match(rel) {
            trace!("Excluded: {}", rel.display());
            continue;
        }
        if include.is_match(rel) {
            if !is_script_file(rel) {
                trace!("Skipping non-script file: {}", rel.display());
                continue;
            }
            trace!("Found source file: {}", rel.display());
            files.push(p.to_path_buf());
        }
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}

fn build_glob_set(patterns: &[String], defaults: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        for p in defaults {
            builder.add(Glob::new(p).with_context(|| format!("Invalid glob pattern '{}'", p))?);
        }
    } else {
        for p in patterns {
            builder.add(Glob::new(p).with_context(|| format!("Invalid glob pattern '{}'", p))?);
        }
    }
    Ok(builder.build()?)
}

fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| JS_TS_EXTENSIONS.contains(&ext) || COMPONENT_EXTENSIONS.contains(&ext))
}

// A directory is pruned when anything directly inside it would be excluded.
fn excludes_dir(exclude: &GlobSet, rel_dir: &Path) -> bool {
    exclude.is_match(rel_dir.join("*"))
}
