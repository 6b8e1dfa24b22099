use anyhow::Result;
use serde::Serialize;
use std::{collections::BTreeSet, env, io::Write};

use usecost_core::{ImportKind, package_name};

use crate::{
    reporter::project_path,
    types::{AnalysisResult, AnalysisSummary, Size},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    metadata: Metadata,
    summary: &'a AnalysisSummary,
    unused_dependencies: Option<&'a BTreeSet<String>>,
    imports: Vec<JsonImport<'a>>,
}

#[derive(Serialize)]
struct Metadata {
    timestamp: String,
    tool: &'static str,
    version: &'static str,
    platform: &'static str,
    arch: &'static str,
}

#[derive(Serialize)]
struct JsonImport<'a> {
    package: &'a str,
    source: &'a str,
    specifiers: &'a [String],
    #[serde(rename = "type")]
    kind: ImportKind,
    file: String,
    line: u32,
    size: Size,
    duration: u64,
}

pub fn write_json<W: Write>(writer: &mut W, result: &AnalysisResult) -> Result<()> {
    let report = JsonReport {
        metadata: Metadata {
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool: "usecost",
            version: env!("CARGO_PKG_VERSION"),
            platform: env::consts::OS,
            arch: env::consts::ARCH,
        },
        summary: &result.summary,
        unused_dependencies: result.unused_dependencies.as_ref(),
        imports: result
            .imports
            .iter()
            .map(|r| JsonImport {
                package: package_name(&r.import.source),
                source: &r.import.source,
                specifiers: &r.import.specifiers,
                kind: r.import.kind,
                file: project_path(&result.root, &r.import.file),
                line: r.import.line,
                size: r.size,
                duration: r.duration,
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
