//! Bundler collaborator used to measure imports.
//!
//! The analyzer only needs "bundle this entry to that file and hand me the bytes",
//! so the contract is a small trait. [`EsbuildBundler`] shells out to the esbuild CLI.

use anyhow::{Context, Result, bail};
use log::{debug, trace};
use std::{
    env, fs,
    io::Read,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::constants::RESOLUTION_ANCESTORS;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub trait Bundler: Send + Sync {
    /// Bundles `entry` (minified, tree-shaken) into `outfile` and returns its bytes.
    ///
    /// Bare specifiers resolve against `resolution_roots`, a list of
    /// `node_modules` directories in priority order.
    fn bundle(&self, entry: &Path, outfile: &Path, resolution_roots: &[PathBuf])
    -> Result<Vec<u8>>;
}

/// `node_modules` of the project root and of up to two of its ancestors.
pub fn resolution_roots(root: &Path) -> Vec<PathBuf> {
    root.ancestors().take(1 + RESOLUTION_ANCESTORS).map(|dir| dir.join("node_modules")).collect()
}

#[derive(Debug, Clone, Default)]
pub struct EsbuildBundler {
    /// Explicit binary; otherwise `node_modules/.bin/esbuild`, then `PATH`
    pub binary: Option<PathBuf>,
    /// `None` waits for esbuild indefinitely
    pub timeout: Option<Duration>,
}

impl EsbuildBundler {
    pub fn new(binary: Option<PathBuf>, timeout: Option<Duration>) -> Self {
        Self { binary, timeout }
    }

    fn locate_binary(&self, resolution_roots: &[PathBuf]) -> PathBuf {
        if let Some(binary) = &self.binary {
            return binary.clone();
        }
        let name = if cfg!(windows) { "esbuild.cmd" } else { "esbuild" };
        resolution_roots
            .iter()
            .map(|root| root.join(".bin").join(name))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| PathBuf::from("esbuild"))
    }
}

impl Bundler for EsbuildBundler {
    fn bundle(
        &self,
        entry: &Path,
        outfile: &Path,
        resolution_roots: &[PathBuf],
    ) -> Result<Vec<u8>> {
        let binary = self.locate_binary(resolution_roots);
        trace!("Bundling {} with {}", entry.display(), binary.display());

        let node_path = env::join_paths(resolution_roots).context("Invalid resolution root")?;
        let mut child = Command::new(&binary)
            .arg(entry)
            .arg("--bundle")
            .arg("--minify")
            .arg("--tree-shaking=true")
            .arg("--format=esm")
            .arg("--platform=node")
            .arg("--log-level=error")
            .arg(format!("--outfile={}", outfile.display()))
            .env("NODE_PATH", node_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to run {}", binary.display()))?;

        // Drain stderr concurrently so a chatty child cannot block on a full pipe
        let stderr = child.stderr.take();
        let drain = thread::spawn(move || {
            let mut text = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut text);
            }
            text
        });

        let status = wait_with_deadline(&mut child, self.timeout)?;
        let stderr = drain.join().unwrap_or_default();

        if !status.success() {
            bail!("esbuild exited with {}: {}", status, stderr.trim());
        }

        let bytes = fs::read(outfile)
            .with_context(|| format!("Failed to read bundle {}", outfile.display()))?;
        debug!("Bundled {} into {} bytes", entry.display(), bytes.len());
        Ok(bytes)
    }
}

fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            bail!("esbuild timed out after {:?}", timeout);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
