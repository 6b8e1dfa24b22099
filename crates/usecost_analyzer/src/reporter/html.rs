use anyhow::Result;
use std::{fmt::Write as _, io::Write};

use crate::{
    aggregate::aggregate_by_package,
    format::{SizeBand, format_bytes, format_duration},
    reporter::project_path,
    types::AnalysisResult,
};

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem; color: #1f2328; }
h1 { font-size: 1.6rem; }
.cards { display: flex; gap: 1rem; margin-bottom: 2rem; }
.card { border: 1px solid #d0d7de; border-radius: 6px; padding: 0.75rem 1rem; min-width: 8rem; }
.card .label { color: #656d76; font-size: 0.8rem; }
.card .value { font-size: 1.3rem; font-weight: 600; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2rem; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #d0d7de; }
td.num, th.num { text-align: right; font-variant-numeric: tabular-nums; }
.green { color: #1a7f37; }
.yellow { color: #9a6700; }
.red { color: #cf222e; }
code { font-size: 0.85rem; }
"#;

pub fn write_html<W: Write>(writer: &mut W, result: &AnalysisResult) -> Result<()> {
    let mut page = String::new();
    let summary = &result.summary;

    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(page, "<title>Import cost report</title>\n<style>{}</style>\n</head>\n<body>", STYLE)?;
    writeln!(page, "<h1>Import cost report</h1>")?;

    writeln!(page, "<div class=\"cards\">")?;
    for (label, value) in [
        ("Packages", summary.total_packages.to_string()),
        ("Raw", format_bytes(summary.total_raw)),
        ("Minified", format_bytes(summary.total_minified)),
        ("Gzipped", format_bytes(summary.total_gzipped)),
        ("Analysis time", format_duration(summary.duration)),
    ] {
        writeln!(
            page,
            "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            label, value
        )?;
    }
    writeln!(page, "</div>")?;

    writeln!(page, "<h2>Packages</h2>\n<table>")?;
    writeln!(
        page,
        "<tr><th>Package</th><th class=\"num\">Raw</th><th class=\"num\">Minified</th><th class=\"num\">Gzipped</th><th class=\"num\">Imports</th></tr>"
    )?;
    for package in aggregate_by_package(&result.imports) {
        let band = SizeBand::for_gzipped(package.size.gzipped);
        writeln!(
            page,
            "<tr class=\"{}\"><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            band.css_class(),
            escape(&package.name),
            format_bytes(package.size.raw),
            format_bytes(package.size.minified),
            format_bytes(package.size.gzipped),
            package.imports
        )?;
    }
    writeln!(page, "</table>")?;

    writeln!(page, "<h2>Imports</h2>\n<table>")?;
    writeln!(
        page,
        "<tr><th>Source</th><th>Specifiers</th><th>Type</th><th>Location</th><th class=\"num\">Gzipped</th></tr>"
    )?;
    for r in &result.imports {
        writeln!(
            page,
            "<tr class=\"{}\"><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}:{}</td><td class=\"num\">{}</td></tr>",
            SizeBand::for_gzipped(r.size.gzipped).css_class(),
            escape(&r.import.source),
            escape(&r.import.specifiers.join(", ")),
            r.import.kind.as_str(),
            escape(&project_path(&result.root, &r.import.file)),
            r.import.line,
            format_bytes(r.size.gzipped)
        )?;
    }
    writeln!(page, "</table>")?;

    if let Some(unused) = result.unused_dependencies.as_ref().filter(|u| !u.is_empty()) {
        writeln!(page, "<h2>Unused dependencies</h2>\n<ul class=\"unused\">")?;
        for name in unused {
            writeln!(page, "<li><code>{}</code></li>", escape(name))?;
        }
        writeln!(page, "</ul>")?;
    }

    writeln!(page, "</body>\n</html>")?;
    writer.write_all(page.as_bytes())?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisSummary, Size, SizeResult};
    use std::{collections::BTreeSet, path::PathBuf};
    use usecost_core::{ImportKind, ImportRecord};

    fn analysis(unused: Option<BTreeSet<String>>) -> AnalysisResult {
        let imports = vec![SizeResult {
            import: ImportRecord {
                source: "<evil>".to_string(),
                specifiers: vec!["default".to_string()],
                kind: ImportKind::RequireCall,
                file: PathBuf::from("/project/src/a.js"),
                line: 7,
            },
            size: Size { raw: 300 * 1024, minified: 300 * 1024, gzipped: 250 * 1024 },
            duration: 3,
        }];
        AnalysisResult {
            root: PathBuf::from("/project"),
            summary: crate::aggregate::summarize(&imports, 12),
            imports,
            unused_dependencies: unused,
        }
    }

    fn render(analysis: &AnalysisResult) -> String {
        let mut out = Vec::new();
        write_html(&mut out, analysis).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_html_escapes_and_bands() {
        let html = render(&analysis(None));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;evil&gt;"));
        assert!(!html.contains("<evil>"));
        assert!(html.contains("<tr class=\"red\">"));
        assert!(html.contains("src/a.js:7"));
        assert!(html.contains("<td>require</td>"));
    }

    #[test]
    fn test_html_unused_section() {
        let html = render(&analysis(Some(BTreeSet::from(["moment".to_string()]))));
        assert!(html.contains("Unused dependencies"));
        assert!(html.contains("<li><code>moment</code></li>"));
    }

    #[test]
    fn test_html_omits_empty_unused_section() {
        assert!(!render(&analysis(Some(BTreeSet::new()))).contains("Unused dependencies"));
        assert!(!render(&analysis(None)).contains("Unused dependencies"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a&b<"c">'"#), "a&amp;b&lt;&quot;c&quot;&gt;&#39;");
    }
}
