//! Constants for file discovery and script dialects.
//!
//! ## Supported Extensions
//!
//! - **TypeScript**: `.ts`, `.tsx`, `.mts` (ES module), `.cts` (CommonJS)
//! - **JavaScript**: `.js`, `.jsx`, `.mjs` (ES module), `.cjs` (CommonJS)
//! - **Components**: `.vue`, `.svelte` (script blocks only)

/// File extensions for JavaScript/TypeScript files that should be analyzed
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// Single-file component extensions whose script blocks are analyzed
pub const COMPONENT_EXTENSIONS: &[&str] = &["vue", "svelte"];

/// Include patterns used when none are given
pub const DEFAULT_INCLUDES: &[&str] = &["**/*.{js,jsx,ts,tsx,mjs,cjs,vue,svelte}"];

/// Exclude patterns used when none are given
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.git/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.nuxt/**",
];

/// Project config files carrying `compilerOptions.paths`, in lookup order
pub const ALIAS_CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_ts_extensions_includes_all_variants() {
        for ext in ["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"] {
            assert!(JS_TS_EXTENSIONS.contains(&ext), "missing '{}'", ext);
        }
        assert_eq!(JS_TS_EXTENSIONS.len(), 8);
    }

    #[test]
    fn test_default_includes_cover_components() {
        assert!(DEFAULT_INCLUDES[0].contains("vue"));
        assert!(DEFAULT_INCLUDES[0].contains("svelte"));
        for ext in COMPONENT_EXTENSIONS {
            assert!(!JS_TS_EXTENSIONS.contains(ext));
        }
    }

    #[test]
    fn test_default_excludes_skip_dependencies() {
        assert!(DEFAULT_EXCLUDES.contains(&"**/node_modules/**"));
        assert!(DEFAULT_EXCLUDES.iter().all(|p| p.starts_with("**/")));
    }
}
