use log::{debug, trace, warn};
use path_clean::clean;
use std::{fs, path::Path};

use crate::{
    constants::ALIAS_CONFIG_FILES,
    types::{AliasConfig, PathAlias},
};

/// Loads `compilerOptions.paths` from the project's `tsconfig.json` or `jsconfig.json`.
///
/// Returns `None` when neither file exists or neither declares path mappings.
pub fn load_alias_config(root: &Path) -> Option<AliasConfig> {
    debug!("Loading path aliases from root: {:?}", root);

    for name in ALIAS_CONFIG_FILES {
        let config_path = root.join(name);
        if !config_path.is_file() {
            trace!("No {} at {:?}", name, config_path);
            continue;
        }

        let content = match fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read {}: {}", config_path.display(), e);
                continue;
            }
        };

        let cleaned = strip_trailing_commas(&strip_json_comments(&content));
        let json = match serde_json::from_str::<serde_json::Value>(&cleaned) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse {}: {}", config_path.display(), e);
                continue;
            }
        };

        let Some(compiler_options) = json.get("compilerOptions") else {
            continue;
        };
        let Some(paths_obj) = compiler_options.get("paths").and_then(|p| p.as_object()) else {
            continue;
        };

        let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");
        let base_url = clean(root.join(base_url));

        let aliases: Vec<PathAlias> = paths_obj
            .iter()
            .filter_map(|(alias, targets)| {
                let targets = targets.as_array()?;
                Some(PathAlias {
                    alias: strip_glob_suffix(alias).to_string(),
                    paths: targets
                        .iter()
                        .filter_map(|t| t.as_str())
                        .map(|t| strip_glob_suffix(t).to_string())
                        .collect(),
                })
            })
            .collect();

        debug!("Loaded {} path aliases from {}", aliases.len(), name);
        return Some(AliasConfig { base_url, aliases });
    }

    None
}

// "@/*" -> "@", "src/**" -> "src"
fn strip_glob_suffix(s: &str) -> &str {
    s.trim_end_matches('*').trim_end_matches('/')
}

/// Removes `//` and `/* */` comments outside of string literals.
fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drops commas that directly precede `}` or `]`, which tsconfig files tolerate.
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 1;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}
