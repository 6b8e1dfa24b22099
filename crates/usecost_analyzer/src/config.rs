use anyhow::{Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::{env, path::PathBuf, time::Duration};

use usecost_core::AliasConfig;

use crate::constants::{DEFAULT_CACHE_DIR, DEFAULT_CONCURRENCY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Html,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "usecost")]
#[command(about = "Analyze JavaScript/TypeScript imports and report their bundle size cost")]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable the size cache
    #[arg(long)]
    pub no_cache: bool,

    /// Cache directory; a relative path is resolved against --cwd, not the shell's directory
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// File patterns to include
    #[arg(long, num_args = 1..)]
    pub include: Vec<String>,

    /// File patterns to exclude
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Maximum number of concurrent bundler invocations
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Seconds before a bundler invocation counts as failed (0 waits forever)
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// Days a cached measurement stays valid
    #[arg(long, default_value = "7")]
    pub cache_ttl: u64,

    /// Path to the esbuild binary (defaults to node_modules/.bin, then PATH)
    #[arg(long)]
    pub esbuild: Option<PathBuf>,

    /// Skip unused dependency detection
    #[arg(long)]
    pub no_unused: bool,

    #[clap(skip)]
    pub root: Option<PathBuf>,

    #[clap(skip)]
    pub aliases: Option<AliasConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["usecost"])
    }
}

impl Config {
    /// Resolve the project root and load its path aliases
    pub fn initialize(&mut self) -> Result<()> {
        if self.concurrency == 0 {
            bail!("--concurrency must be at least 1");
        }

        let root = match self.cwd.clone() {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r.canonicalize().unwrap_or(r)
            }
            None => env::current_dir()?,
        };
        info!("Using root directory: {}", root.display());

        self.aliases = usecost_core::load_alias_config(&root);
        debug!(
            "Found {} path aliases",
            self.aliases.as_ref().map(|a| a.aliases.len()).unwrap_or(0)
        );

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn cache_path(&self) -> Result<PathBuf> {
        if self.cache_dir.is_absolute() {
            Ok(self.cache_dir.clone())
        } else {
            Ok(self.root()?.join(&self.cache_dir))
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl.saturating_mul(24 * 60 * 60))
    }

    pub fn bundler_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.format, OutputFormat::Table);
        assert!(cfg.output.is_none());
        assert!(!cfg.no_cache);
        assert_eq!(cfg.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert!(cfg.include.is_empty());
        assert_eq!(cfg.concurrency, 5);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(cfg.bundler_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_parse_flags() {
        let cfg = Config::parse_from([
            "usecost",
            "--format",
            "json",
            "--no-cache",
            "--include",
            "src/**/*.ts",
            "lib/**/*.js",
            "--exclude",
            "**/*.test.ts",
            "--timeout",
            "0",
        ]);
        assert_eq!(cfg.format, OutputFormat::Json);
        assert!(cfg.no_cache);
        assert_eq!(cfg.include, vec!["src/**/*.ts", "lib/**/*.js"]);
        assert_eq!(cfg.exclude, vec!["**/*.test.ts"]);
        assert_eq!(cfg.bundler_timeout(), None);
    }

    #[test]
    fn test_root_requires_initialize() {
        let cfg = Config::default();
        assert!(cfg.root().is_err());
    }

    #[test]
    fn test_initialize_resolves_cache_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = Config::parse_from([
            "usecost",
            "--cwd",
            temp_dir.path().to_str().unwrap(),
        ]);
        cfg.initialize().unwrap();

        let root = cfg.root().unwrap().clone();
        assert_eq!(root, temp_dir.path().canonicalize().unwrap());
        assert_eq!(cfg.cache_path().unwrap(), root.join(DEFAULT_CACHE_DIR));
        assert!(cfg.aliases.is_none());
    }

    #[test]
    fn test_relative_cache_dir_joins_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = Config::parse_from([
            "usecost",
            "--cwd",
            temp_dir.path().to_str().unwrap(),
            "--cache-dir",
            "tmp/cache",
        ]);
        cfg.initialize().unwrap();

        let root = cfg.root().unwrap().clone();
        assert_eq!(cfg.cache_path().unwrap(), root.join("tmp/cache"));
    }

    #[test]
    fn test_initialize_rejects_zero_concurrency() {
        let mut cfg = Config::parse_from(["usecost", "--concurrency", "0"]);
        assert!(cfg.initialize().is_err());
    }
}
