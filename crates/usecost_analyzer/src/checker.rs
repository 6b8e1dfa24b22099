use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::{collections::HashSet, time::Instant};

use usecost_core::{CollectorConfig, ImportRecord, collect_source_files, package_name, parse_files};

use crate::{
    aggregate::summarize,
    analyzer::SizeAnalyzer,
    bundler::{Bundler, EsbuildBundler, resolution_roots},
    cache::SizeCache,
    config::Config,
    dedupe::deduplicate,
    types::{AnalysisResult, SizeResult},
    unused::{find_unused_dependencies, read_declared_dependencies},
};

/// Runs the full analysis, measuring with the esbuild CLI.
pub fn run_import_cost_analysis(cfg: Config) -> Result<AnalysisResult> {
    let bundler = EsbuildBundler::new(cfg.esbuild.clone(), cfg.bundler_timeout());
    run_with_bundler(cfg, bundler)
}

/// Runs the full analysis with a caller-provided [`Bundler`].
pub fn run_with_bundler<B: Bundler>(mut cfg: Config, bundler: B) -> Result<AnalysisResult> {
    let start = Instant::now();
    info!("Starting import cost analysis");

    cfg.initialize()?;
    let root = cfg.root()?.clone();

    let files = collect_source_files(&CollectorConfig {
        root: root.clone(),
        include: cfg.include.clone(),
        exclude: cfg.exclude.clone(),
    })?;
    info!("Found {} source files", files.len());

    let records = parse_files(&files, cfg.aliases.as_ref());
    let unique = deduplicate(&records);
    info!("Extracted {} package imports ({} unique)", records.len(), unique.len());

    let cache = if cfg.no_cache {
        debug!("Cache disabled");
        None
    } else {
        match SizeCache::open(cfg.cache_path()?, cfg.cache_ttl()) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("{:#}; continuing without cache", e);
                None
            }
        }
    };

    // One slot per unique import keeps result order independent of cache hits
    let mut slots: Vec<Option<SizeResult>> = match &cache {
        Some(cache) => unique.par_iter().map(|import| cache.get(import, &root)).collect(),
        None => vec![None; unique.len()],
    };
    let misses: Vec<usize> =
        slots.iter().enumerate().filter(|(_, slot)| slot.is_none()).map(|(i, _)| i).collect();
    info!("{} cache hits, {} imports to measure", unique.len() - misses.len(), misses.len());

    let pending: Vec<ImportRecord> = misses.iter().map(|&i| unique[i].clone()).collect();
    let analyzer = SizeAnalyzer::new(bundler, resolution_roots(&root), cfg.concurrency);
    let measured = analyzer.analyze_many(&pending);

    for (slot, result) in misses.into_iter().zip(measured) {
        // Failed measurements are retried on the next run rather than cached
        if let Some(cache) = &cache
            && !result.size.is_zero()
        {
            cache.set(&result, &root);
        }
        slots[slot] = Some(result);
    }
    let imports: Vec<SizeResult> = slots.into_iter().flatten().collect();

    let unused_dependencies = if cfg.no_unused {
        None
    } else {
        read_declared_dependencies(&root).map(|declared| {
            let used: HashSet<String> =
                records.iter().map(|r| package_name(&r.source).to_string()).collect();
            find_unused_dependencies(&declared, &used)
        })
    };
    if let Some(unused) = &unused_dependencies {
        debug!("Found {} unused dependencies", unused.len());
    }

    let summary = summarize(&imports, start.elapsed().as_millis() as u64);
    info!(
        "Import cost analysis complete: {} packages, {} bytes gzipped",
        summary.total_packages, summary.total_gzipped
    );

    Ok(AnalysisResult { root, imports, summary, unused_dependencies })
}
