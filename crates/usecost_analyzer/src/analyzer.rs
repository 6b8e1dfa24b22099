//! Per-import bundle size measurement.
//!
//! Each import is measured in isolation: a one-line entry module that uses the import
//! is written to a scratch directory, bundled with minification and tree shaking, and
//! the output is gzipped. Failures never escape; they turn into zero-size results.

use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use log::{debug, trace, warn};
use rayon::{ThreadPoolBuilder, prelude::*};
use std::{
    fs,
    io::Write,
    path::PathBuf,
    time::Instant,
};

use usecost_core::{ImportKind, ImportRecord};

use crate::{
    bundler::Bundler,
    types::{Size, SizeResult},
};

pub struct SizeAnalyzer<B: Bundler> {
    bundler: B,
    resolution_roots: Vec<PathBuf>,
    concurrency: usize,
}

impl<B: Bundler> SizeAnalyzer<B> {
    pub fn new(bundler: B, resolution_roots: Vec<PathBuf>, concurrency: usize) -> Self {
        Self { bundler, resolution_roots, concurrency: concurrency.max(1) }
    }

    /// Measures one import. Never fails: errors yield an all-zero [`Size`].
    pub fn analyze_one(&self, import: &ImportRecord) -> SizeResult {
        let start = Instant::now();
        match self.measure(import) {
            Ok(size) => {
                trace!("Measured '{}': {:?}", import.source, size);
                SizeResult { import: import.clone(), size, duration: elapsed_ms(start) }
            }
            Err(e) => {
                warn!("Failed to measure '{}': {:#}", import.source, e);
                SizeResult::failed(import.clone(), elapsed_ms(start))
            }
        }
    }

    /// Measures every import with at most `concurrency` bundler runs in flight.
    /// Results come back in input order.
    pub fn analyze_many(&self, imports: &[ImportRecord]) -> Vec<SizeResult> {
        if imports.is_empty() {
            return Vec::new();
        }
        debug!("Measuring {} imports with concurrency {}", imports.len(), self.concurrency);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("usecost-bundle-{}", i))
            .build();
        match pool {
            Ok(pool) => {
                pool.install(|| imports.par_iter().map(|import| self.analyze_one(import)).collect())
            }
            Err(e) => {
                warn!("Failed to start measurement pool, measuring sequentially: {}", e);
                imports.iter().map(|import| self.analyze_one(import)).collect()
            }
        }
    }

    fn measure(&self, import: &ImportRecord) -> Result<Size> {
        // Dropping the TempDir on an early return removes it as well
        let scratch = tempfile::Builder::new()
            .prefix("usecost-")
            .tempdir()
            .context("Failed to create scratch directory")?;
        let entry = scratch.path().join("entry.js");
        let outfile = scratch.path().join("entry.bundle.js");

        fs::write(&entry, synthesize_entry(import))
            .with_context(|| format!("Failed to write {}", entry.display()))?;

        let measured = self
            .bundler
            .bundle(&entry, &outfile, &self.resolution_roots)
            .and_then(|bytes| size_of_bundle(&bytes));

        if let Err(e) = scratch.close() {
            debug!("Failed to remove scratch directory: {}", e);
        }
        measured
    }
}

/// Source of the throwaway entry module that pulls in exactly `import`.
pub fn synthesize_entry(import: &ImportRecord) -> String {
    let source = js_string(&import.source);
    match import.kind {
        ImportKind::RequireCall => format!("const pkg = require({});\nconsole.log(pkg);\n", source),
        ImportKind::DynamicImport => format!("import({}).then(pkg => console.log(pkg));\n", source),
        ImportKind::StaticImport => static_entry(&import.specifiers, &source),
    }
}

fn static_entry(specifiers: &[String], source: &str) -> String {
    if specifiers.is_empty() {
        return format!("import {};\n", source);
    }
    if specifiers.iter().any(|s| s == "*") {
        return format!("import * as pkg from {};\nconsole.log(pkg);\n", source);
    }
    if specifiers.iter().any(|s| s == "default") {
        return format!("import pkg from {};\nconsole.log(pkg);\n", source);
    }

    let bindings: Vec<String> = specifiers
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} as __used{}", export_name(name), i))
        .collect();
    format!("import {{ {} }} from {};\nconsole.log(__used0);\n", bindings.join(", "), source)
}

// Export names that are not identifiers need the string form
fn export_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_ident = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident { name.to_string() } else { js_string(name) }
}

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn size_of_bundle(bytes: &[u8]) -> Result<Size> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let gzipped = encoder.finish()?.len() as u64;

    // Only a minified bundle is produced, so raw mirrors minified
    let minified = bytes.len() as u64;
    Ok(Size { raw: minified, minified, gzipped })
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
