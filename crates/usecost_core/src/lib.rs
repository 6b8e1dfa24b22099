//! Core utilities for usecost tools.
//!
//! This crate provides shared functionality for analyzing JavaScript/TypeScript
//! projects, including:
//! - Collecting source files with include/exclude globs
//! - Extracting script blocks from Vue and Svelte components
//! - Parsing third-party import statements from JS/TS code
//! - Package utilities (top-level names, installed manifests)
//! - Configuration utilities (tsconfig/jsconfig path aliases)

mod collector;
mod config;
mod constants;
mod dialect;
mod package;
mod parser;
mod types;

// Re-export public API
pub use collector::{CollectorConfig, collect_source_files};
pub use config::load_alias_config;
pub use constants::{COMPONENT_EXTENSIONS, DEFAULT_EXCLUDES, DEFAULT_INCLUDES, JS_TS_EXTENSIONS};
pub use dialect::{ScriptDialect, ScriptSource};
pub use package::{is_local_import, package_name, resolve_package};
pub use parser::{extract_imports, imports_for, parse_files};
pub use types::{AliasConfig, ImportKind, ImportRecord, PackageInfo, PathAlias};
