//! Defaults for measurement, caching and reporting.

/// Cache directory, relative to the project root
pub const DEFAULT_CACHE_DIR: &str = ".usecost-cache";

/// Maximum number of bundler invocations in flight
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Ancestors of the project root whose `node_modules` also serve resolution
pub const RESOLUTION_ANCESTORS: usize = 2;

/// Gzipped size (KiB) below which a package is reported green
pub const GREEN_LIMIT_KIB: u64 = 50;

/// Gzipped size (KiB) below which a package is reported yellow; red above
pub const YELLOW_LIMIT_KIB: u64 = 200;
