//! Bundle size cost of third-party imports in JavaScript/TypeScript projects.
//!
//! Every package import found in the project is bundled on its own (minified,
//! tree-shaken) and its gzipped size recorded. Measurements are cached per
//! package version, rolled up per package, and reported as a terminal table,
//! a JSON document or an HTML page. Declared dependencies that nothing imports
//! are reported as unused.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use usecost_analyzer::{Config, render, run_import_cost_analysis};
//! use std::io::BufWriter;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["usecost", "--cwd", "/path/to/project", "--format", "json"]);
//! let format = cfg.format;
//!
//! let result = run_import_cost_analysis(cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! render(&mut stdout, format, &result)?;
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod analyzer;
mod bundler;
mod cache;
mod checker;
mod config;
mod constants;
mod dedupe;
mod format;
mod reporter;
mod types;
mod unused;

// Re-export public API
pub use aggregate::{aggregate_by_package, summarize};
pub use analyzer::{SizeAnalyzer, synthesize_entry};
pub use bundler::{Bundler, EsbuildBundler, resolution_roots};
pub use cache::{SizeCache, fingerprint};
pub use checker::{run_import_cost_analysis, run_with_bundler};
pub use config::{Config, OutputFormat};
pub use dedupe::{deduplicate, unique_key};
pub use format::{SizeBand, format_bytes, format_duration};
pub use reporter::{print_table, render, write_html, write_json};
pub use types::{AnalysisResult, AnalysisSummary, PackageSize, Size, SizeResult};
pub use unused::{find_unused_dependencies, read_declared_dependencies};

pub use usecost_core::{ImportKind, ImportRecord};
