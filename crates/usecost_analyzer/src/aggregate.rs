use std::collections::{HashMap, HashSet};

use usecost_core::package_name;

use crate::types::{AnalysisSummary, PackageSize, SizeResult};

/// Rolls results up per top-level package, heaviest gzipped first.
///
/// Packages with equal gzipped totals keep first-seen order.
pub fn aggregate_by_package(results: &[SizeResult]) -> Vec<PackageSize> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut packages: Vec<PackageSize> = Vec::new();

    for result in results {
        let name = package_name(&result.import.source);
        let slot = *index.entry(name).or_insert_with(|| {
            packages.push(PackageSize {
                name: name.to_string(),
                size: Default::default(),
                imports: 0,
            });
            packages.len() - 1
        });

        let package = &mut packages[slot];
        package.size.raw += result.size.raw;
        package.size.minified += result.size.minified;
        package.size.gzipped += result.size.gzipped;
        package.imports += 1;
    }

    // sort_by is stable
    packages.sort_by(|a, b| b.size.gzipped.cmp(&a.size.gzipped));
    packages
}

pub fn summarize(results: &[SizeResult], duration: u64) -> AnalysisSummary {
    let total_packages =
        results.iter().map(|r| package_name(&r.import.source)).collect::<HashSet<_>>().len();

    AnalysisSummary {
        total_packages,
        total_raw: results.iter().map(|r| r.size.raw).sum(),
        total_minified: results.iter().map(|r| r.size.minified).sum(),
        total_gzipped: results.iter().map(|r| r.size.gzipped).sum(),
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SizeBand;
    use crate::types::Size;
    use std::path::PathBuf;
    use usecost_core::{ImportKind, ImportRecord};

    fn result(source: &str, specifiers: &[&str], gzipped: u64) -> SizeResult {
        SizeResult {
            import: ImportRecord {
                source: source.to_string(),
                specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
                kind: ImportKind::StaticImport,
                file: PathBuf::from("src/index.ts"),
                line: 1,
            },
            size: Size { raw: gzipped * 3, minified: gzipped * 3, gzipped },
            duration: 5,
        }
    }

    #[test]
    fn test_same_package_rolls_up() {
        let results =
            vec![result("lodash", &["map"], 200), result("lodash/fp", &["filter"], 300)];
        let packages = aggregate_by_package(&results);

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "lodash");
        assert_eq!(packages[0].size.gzipped, 500);
        assert_eq!(packages[0].size.raw, 1500);
        assert_eq!(packages[0].imports, 2);
        // 500 bytes is well under the 50 KiB green band
        assert_eq!(SizeBand::for_gzipped(packages[0].size.gzipped), SizeBand::Green);
    }

    #[test]
    fn test_sorted_descending_by_gzipped() {
        let results = vec![
            result("a", &["default"], 10),
            result("b", &["default"], 300),
            result("@scope/c", &["x"], 50),
            result("@scope/c/sub", &["y"], 400),
            result("d", &[], 120),
        ];
        let packages = aggregate_by_package(&results);

        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["@scope/c", "b", "d", "a"]);
        assert!(packages.windows(2).all(|w| w[0].size.gzipped >= w[1].size.gzipped));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let results = vec![
            result("zeta", &["default"], 100),
            result("alpha", &["default"], 100),
            result("mid", &["default"], 100),
        ];
        let names: Vec<String> =
            aggregate_by_package(&results).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_summarize_totals() {
        let results = vec![
            result("react", &["default"], 100),
            result("react-dom/client", &["createRoot"], 200),
            result("react", &["useState"], 50),
        ];
        let summary = summarize(&results, 1234);

        assert_eq!(summary.total_packages, 2);
        assert_eq!(summary.total_gzipped, 350);
        assert_eq!(summary.total_raw, 1050);
        assert_eq!(summary.total_minified, 1050);
        assert_eq!(summary.duration, 1234);

        // summing is deterministic
        assert_eq!(summarize(&results, 1234), summary);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_by_package(&[]).is_empty());
        let summary = summarize(&[], 0);
        assert_eq!(summary, AnalysisSummary::default());
    }
}
