//! Report rendering: colored terminal table, JSON document, standalone HTML page.

mod html;
mod json;
mod table;

use anyhow::Result;
use log::{debug, trace};
use std::{
    env,
    io::Write,
    path::{Component, Path, PathBuf},
};

use crate::{config::OutputFormat, types::AnalysisResult};

pub use html::write_html;
pub use json::write_json;
pub use table::print_table;

pub fn render<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    result: &AnalysisResult,
) -> Result<()> {
    debug!("Rendering {:?} report for {} imports", format, result.imports.len());
    match format {
        OutputFormat::Table => print_table(writer, result)?,
        OutputFormat::Json => write_json(writer, result)?,
        OutputFormat::Html => write_html(writer, result)?,
    }
    writer.flush()?;
    Ok(())
}

/// Project-relative path with forward slashes, for stable report output.
pub(crate) fn project_path(root: &Path, file: &Path) -> String {
    file.strip_prefix(root).unwrap_or(file).to_string_lossy().replace('\\', "/")
}

/// Relativize a file to the current working directory for clickable terminal links
pub(crate) fn relativize_to_cwd(file: &Path) -> String {
    let fallback = || file.to_string_lossy().to_string();
    let Ok(cwd) = env::current_dir() else {
        debug!("Failed to get current directory");
        return fallback();
    };
    trace!("Relativizing {:?} to cwd {:?}", file, cwd);

    match make_relative(file, &cwd) {
        Some(rel) => rel.to_string_lossy().to_string(),
        None => fallback(),
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = target_parts.iter().zip(&base_parts).take_while(|(t, b)| t == b).count();
    if common == 0 {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts[common..] {
        result.push("..");
    }
    for component in &target_parts[common..] {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}
