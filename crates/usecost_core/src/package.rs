use log::trace;
use std::{fs, path::Path};

use crate::types::{AliasConfig, PackageInfo};

/// Top-level package name of an import source.
///
/// - `@scope/pkg/sub` -> `@scope/pkg`
/// - `pkg/sub` -> `pkg`
pub fn package_name(source: &str) -> &str {
    let mut boundaries = source.match_indices('/').map(|(i, _)| i);
    let end = if source.starts_with('@') {
        boundaries.nth(1)
    } else {
        boundaries.next()
    };
    match end {
        Some(i) => &source[..i],
        None => source,
    }
}

/// Relative, absolute, and path-aliased requests are project code, not packages.
pub fn is_local_import(source: &str, aliases: Option<&AliasConfig>) -> bool {
    source.starts_with('.')
        || source.starts_with('/')
        || aliases.is_some_and(|cfg| cfg.matches(source))
}

/// Finds the installed manifest of `name`, walking up from `from` through
/// every ancestor's `node_modules`.
pub fn resolve_package(name: &str, from: &Path) -> Option<PackageInfo> {
    trace!("Walking up from {:?} to find node_modules for '{}'", from, name);
    let mut current_dir = Some(from);

    while let Some(dir) = current_dir {
        let install_path = dir.join("node_modules").join(name);
        let manifest = install_path.join("package.json");
        if manifest.is_file() {
            trace!("Found manifest at: {:?}", manifest);
            let json = fs::read_to_string(&manifest)
                .ok()
                .and_then(|txt| serde_json::from_str::<serde_json::Value>(&txt).ok())?;
            let field = |key: &str| json.get(key).and_then(|v| v.as_str()).map(str::to_string);

            return Some(PackageInfo {
                name: field("name").unwrap_or_else(|| name.to_string()),
                version: field("version").unwrap_or_else(|| "0.0.0".to_string()),
                install_path,
            });
        }
        current_dir = dir.parent();
    }

    trace!("Package '{}' not installed above {:?}", name, from);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathAlias;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_package_name_regular() {
        assert_eq!(package_name("react"), "react");
        assert_eq!(package_name("react/client"), "react");
        assert_eq!(package_name("lodash/fp/map"), "lodash");
    }

    #[test]
    fn test_package_name_scoped() {
        assert_eq!(package_name("@scope/pkg"), "@scope/pkg");
        assert_eq!(package_name("@scope/pkg/subpath"), "@scope/pkg");
        assert_eq!(package_name("@scope"), "@scope");
    }

    #[test]
    fn test_is_local_import() {
        assert!(is_local_import("./local", None));
        assert!(is_local_import("../parent", None));
        assert!(is_local_import("/absolute", None));
        assert!(!is_local_import("react", None));
        assert!(!is_local_import("@scope/pkg", None));
    }

    #[test]
    fn test_is_local_import_with_aliases() {
        let aliases = AliasConfig {
            base_url: PathBuf::from("/project"),
            aliases: vec![PathAlias { alias: "@".to_string(), paths: vec!["src".to_string()] }],
        };
        assert!(is_local_import("@/components/Button", Some(&aliases)));
        assert!(!is_local_import("@scope/pkg", Some(&aliases)));
    }

    #[test]
    fn test_resolve_package_reads_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "node_modules/react/package.json",
            r#"{ "name": "react", "version": "18.2.0" }"#,
        );

        let info = resolve_package("react", root).unwrap();
        assert_eq!(info.name, "react");
        assert_eq!(info.version, "18.2.0");
        assert_eq!(info.install_path, root.join("node_modules").join("react"));
    }

    #[test]
    fn test_resolve_package_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "node_modules/@scope/pkg/package.json",
            r#"{ "name": "@scope/pkg", "version": "1.0.0" }"#,
        );
        let nested = root.join("packages").join("app");
        fs::create_dir_all(&nested).unwrap();

        let info = resolve_package("@scope/pkg", &nested).unwrap();
        assert_eq!(info.name, "@scope/pkg");
        assert_eq!(info.version, "1.0.0");
    }

    #[test]
    fn test_resolve_package_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "node_modules/bare/package.json", "{}");

        let info = resolve_package("bare", root).unwrap();
        assert_eq!(info.name, "bare");
        assert_eq!(info.version, "0.0.0");
    }

    #[test]
    fn test_resolve_package_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(resolve_package("definitely-not-installed-pkg", temp_dir.path()).is_none());
    }

    #[test]
    fn test_resolve_package_invalid_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "node_modules/broken/package.json", "{ nope");
        assert!(resolve_package("broken", root).is_none());
    }
}
