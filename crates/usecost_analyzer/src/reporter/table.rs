use colored::Colorize;
use log::debug;
use std::{io, io::Write, path::Path};

use crate::{
    aggregate::aggregate_by_package,
    format::{SizeBand, format_bytes, format_duration},
    reporter::relativize_to_cwd,
    types::{AnalysisResult, SizeResult},
};

const SIZE_WIDTH: usize = 12;
const TOP_IMPORTS: usize = 5;

pub fn print_table<W: Write>(writer: &mut W, result: &AnalysisResult) -> io::Result<()> {
    let packages = aggregate_by_package(&result.imports);
    debug!("Printing table for {} packages", packages.len());

    if packages.is_empty() {
        writeln!(writer, "{} No package imports found", "✓".green().bold())?;
    } else {
        writeln!(
            writer,
            "{} Import cost ({} packages)\n",
            "📦".bold(),
            packages.len().to_string().cyan()
        )?;

        let name_width = packages.iter().map(|p| p.name.len()).max().unwrap_or(0).max(7);
        let w = SIZE_WIDTH;
        writeln!(
            writer,
            "{}",
            format!(
                "{:<name_width$}  {:>w$}  {:>w$}  {:>w$}  {:>7}",
                "Package", "Raw", "Minified", "Gzipped", "Imports"
            )
            .bold()
        )?;
        writeln!(writer, "{}", "─".repeat(name_width + 3 * (SIZE_WIDTH + 2) + 9).dimmed())?;

        for package in &packages {
            let band = SizeBand::for_gzipped(package.size.gzipped);
            // Pad before painting so escape codes don't skew alignment
            let row = format!(
                "{:<name_width$}  {:>w$}  {:>w$}  {:>w$}  {:>7}",
                package.name,
                format_bytes(package.size.raw),
                format_bytes(package.size.minified),
                format_bytes(package.size.gzipped),
                package.imports
            );
            writeln!(writer, "{}", band.paint(&row))?;
        }
        writeln!(writer)?;

        print_largest_imports(writer, &result.imports, &result.root)?;
    }

    print_summary(writer, result)?;
    print_unused(writer, result)?;
    writer.flush()?;
    Ok(())
}

fn print_largest_imports<W: Write>(
    writer: &mut W,
    imports: &[SizeResult],
    root: &Path,
) -> io::Result<()> {
    let mut largest: Vec<&SizeResult> = imports.iter().filter(|r| !r.size.is_zero()).collect();
    if largest.is_empty() {
        return Ok(());
    }
    largest.sort_by(|a, b| b.size.gzipped.cmp(&a.size.gzipped));
    largest.truncate(TOP_IMPORTS);

    writeln!(writer, "{}", "Largest imports".bold())?;
    for (idx, r) in largest.iter().enumerate() {
        let bindings = if r.import.specifiers.is_empty() {
            String::new()
        } else {
            format!(" {{ {} }}", r.import.specifiers.join(", "))
        };
        let location = format!("{}:{}", relativize_to_cwd(&root.join(&r.import.file)), r.import.line);
        writeln!(
            writer,
            "  {}. {}{} ({} gzipped) - {}",
            idx + 1,
            r.import.source,
            bindings.dimmed(),
            SizeBand::for_gzipped(r.size.gzipped).paint(&format_bytes(r.size.gzipped)),
            location.blue()
        )?;
    }
    writeln!(writer)?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, result: &AnalysisResult) -> io::Result<()> {
    let summary = &result.summary;
    let failed = result.imports.iter().filter(|r| r.size.is_zero()).count();

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Packages: {}", summary.total_packages.to_string().cyan())?;
    writeln!(writer, "  Imports analyzed: {}", result.imports.len().to_string().cyan())?;
    writeln!(writer, "  Total raw: {}", format_bytes(summary.total_raw))?;
    writeln!(writer, "  Total minified: {}", format_bytes(summary.total_minified))?;
    writeln!(
        writer,
        "  Total gzipped: {}",
        SizeBand::for_gzipped(summary.total_gzipped)
            .paint(&format_bytes(summary.total_gzipped))
            .bold()
    )?;
    writeln!(writer, "  Analysis time: {}", format_duration(summary.duration))?;
    if failed > 0 {
        writeln!(
            writer,
            "  {} {} imports could not be measured",
            "⚠".yellow(),
            failed.to_string().yellow()
        )?;
    }
    Ok(())
}

fn print_unused<W: Write>(writer: &mut W, result: &AnalysisResult) -> io::Result<()> {
    let Some(unused) = result.unused_dependencies.as_ref().filter(|u| !u.is_empty()) else {
        return Ok(());
    };

    writeln!(
        writer,
        "\n{} Unused dependencies ({}):",
        "⚠".yellow().bold(),
        unused.len().to_string().yellow()
    )?;
    for name in unused {
        writeln!(writer, "  - {}", name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisSummary, Size};
    use std::{collections::BTreeSet, path::PathBuf};
    use usecost_core::{ImportKind, ImportRecord};

    fn result(source: &str, gzipped: u64) -> SizeResult {
        SizeResult {
            import: ImportRecord {
                source: source.to_string(),
                specifiers: vec!["default".to_string()],
                kind: ImportKind::StaticImport,
                file: PathBuf::from("/project/src/index.ts"),
                line: 4,
            },
            size: Size { raw: gzipped * 3, minified: gzipped * 3, gzipped },
            duration: 10,
        }
    }

    fn render(analysis: &AnalysisResult) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_table(&mut out, analysis).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_lists_packages_heaviest_first() {
        let imports = vec![result("dayjs", 2048), result("lodash/map", 100 * 1024)];
        let analysis = AnalysisResult {
            root: PathBuf::from("/project"),
            summary: crate::aggregate::summarize(&imports, 1500),
            imports,
            unused_dependencies: Some(BTreeSet::new()),
        };
        let text = render(&analysis);

        let lodash = text.find("lodash ").unwrap();
        let dayjs = text.find("dayjs ").unwrap();
        assert!(lodash < dayjs);
        assert!(text.contains("100.0 KB"));
        assert!(text.contains("Packages: 2"));
        assert!(text.contains("Analysis time: 1.50s"));
        assert!(!text.contains("Unused dependencies"));
    }

    #[test]
    fn test_table_reports_unused_and_failures() {
        let imports = vec![result("react", 0)];
        let analysis = AnalysisResult {
            root: PathBuf::from("/project"),
            summary: crate::aggregate::summarize(&imports, 10),
            imports,
            unused_dependencies: Some(BTreeSet::from(["zod".to_string()])),
        };
        let text = render(&analysis);

        assert!(text.contains("1 imports could not be measured"));
        assert!(text.contains("Unused dependencies (1):"));
        assert!(text.contains("  - zod"));
        assert!(!text.contains("Largest imports"));
    }

    #[test]
    fn test_table_empty() {
        let analysis = AnalysisResult {
            root: PathBuf::from("/project"),
            imports: vec![],
            summary: AnalysisSummary::default(),
            unused_dependencies: None,
        };
        let text = render(&analysis);
        assert!(text.contains("No package imports found"));
    }
}
