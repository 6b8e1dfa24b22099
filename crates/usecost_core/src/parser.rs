use anyhow::{Result, bail};
use log::{debug, trace, warn};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{ParseOptions, Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    dialect::ScriptDialect,
    package::is_local_import,
    types::{AliasConfig, ImportKind, ImportRecord},
};

/// Extracts third-party imports from `content`, using `path` only to pick the dialect.
///
/// Recognized forms, top-level statements only:
/// - `import ... from "pkg"` and `import "pkg"`
/// - `const x = require("pkg")`
/// - `import("pkg");` as a standalone statement
///
/// Non-literal sources are skipped. Fails if the script does not parse cleanly.
pub fn extract_imports(
    content: &str,
    path: &Path,
    aliases: Option<&AliasConfig>,
) -> Result<Vec<ImportRecord>> {
    let dialect = ScriptDialect::for_path(path);
    let (src, st) = match dialect.extract_script(content) {
        Some(script) => {
            let st = SourceType::default()
                .with_module(true)
                .with_typescript(script.typescript)
                .with_jsx(script.jsx);
            (script.text, st)
        }
        None => (content.to_string(), source_type_for(path)),
    };
    trace!("Parsing {} as {:?}", path.display(), dialect);

    let allocator = Allocator::default();
    let options =
        ParseOptions { allow_return_outside_function: st.is_script(), ..ParseOptions::default() };
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, &src, st).with_options(options).parse();
    if panicked || !errors.is_empty() {
        match errors.first() {
            Some(first) => bail!("{} syntax error(s), first: {}", errors.len(), first),
            None => bail!("parser aborted"),
        }
    }

    let lines = LineIndex::new(&src);
    let mut records: Vec<ImportRecord> = Vec::new();
    let mut push = |source: &str, specifiers: Vec<String>, kind: ImportKind, offset: u32| {
        if is_local_import(source, aliases) {
            trace!("Skipping local import: '{}'", source);
            return;
        }
        trace!("Found {:?}: '{}' in {}", kind, source, path.display());
        records.push(ImportRecord {
            source: source.to_string(),
            specifiers,
            kind,
            file: path.to_path_buf(),
            line: lines.line_of(offset),
        });
    };

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                // import type { Foo } from 'bar' has no runtime cost
                if decl.import_kind.is_type() {
                    continue;
                }
                let Some(specifiers) = runtime_specifiers(decl) else {
                    continue;
                };
                push(&decl.source.value, specifiers, ImportKind::StaticImport, decl.span.start);
            }
            Statement::VariableDeclaration(vd) => {
                for declarator in &vd.declarations {
                    if let Some(Expression::CallExpression(ce)) = &declarator.init
                        && let Expression::Identifier(callee) = &ce.callee
                        && callee.name.as_str() == "require"
                        && let Some(Expression::StringLiteral(sl)) =
                            ce.arguments.first().and_then(|arg| arg.as_expression())
                    {
                        push(&sl.value, Vec::new(), ImportKind::RequireCall, vd.span.start);
                    }
                }
            }
            Statement::ExpressionStatement(es) => {
                if let Expression::ImportExpression(ie) = &es.expression
                    && let Expression::StringLiteral(sl) = &ie.source
                {
                    push(&sl.value, Vec::new(), ImportKind::DynamicImport, es.span.start);
                }
            }
            _ => {}
        }
    }

    debug!("Found {} package imports in {}", records.len(), path.display());
    Ok(records)
}

/// Reads and parses one file. Unreadable or unparsable files yield no imports.
pub fn imports_for(file: &Path, aliases: Option<&AliasConfig>) -> Vec<ImportRecord> {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read {}: {}", file.display(), e);
            return Vec::new();
        }
    };

    match extract_imports(&content, file, aliases) {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to parse {}: {}", file.display(), e);
            Vec::new()
        }
    }
}

/// Parses files in parallel; output keeps file order, then in-file order.
pub fn parse_files(files: &[PathBuf], aliases: Option<&AliasConfig>) -> Vec<ImportRecord> {
    debug!("Parsing {} files", files.len());
    files.par_iter().map(|file| imports_for(file, aliases)).flatten_iter().collect()
}

/// `None` when every specifier is type-only (`import { type Foo } from 'bar'`).
fn runtime_specifiers(decl: &ImportDeclaration) -> Option<Vec<String>> {
    let Some(list) = &decl.specifiers else {
        // import 'side-effect'
        return Some(Vec::new());
    };

    let specifiers: Vec<String> = list
        .iter()
        .filter_map(|spec| match spec {
            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                (!s.import_kind.is_type()).then(|| s.imported.name().to_string())
            }
            ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => Some("default".to_string()),
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => Some("*".to_string()),
        })
        .collect();

    if specifiers.is_empty() && !list.is_empty() { None } else { Some(specifiers) }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());
    let typescript = matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts"));

    match ext {
        // CommonJS scripts: top-level `return` is allowed, static imports are not
        Some("cjs") | Some("cts") => SourceType::cjs().with_typescript(typescript),
        // JSX is allowed everywhere except plain TypeScript, where it clashes with `<T>x` casts
        _ => SourceType::default()
            .with_module(true)
            .with_typescript(typescript)
            .with_jsx(!matches!(ext, Some("ts") | Some("mts"))),
    }
}

struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(src: &str) -> Self {
        Self { newlines: src.match_indices('\n').map(|(i, _)| i).collect() }
    }

    fn line_of(&self, offset: u32) -> u32 {
        let offset = offset as usize;
        (self.newlines.partition_point(|&nl| nl < offset) + 1) as u32
    }
}
