//! Script extraction for the file dialects the parser understands.
//!
//! Components keep their script blocks at their original line positions: every
//! line outside a `<script>` block becomes an empty line, so line numbers reported
//! from the extracted text match the component file. Bodies are always separated by
//! at least one line break, so two blocks sharing a line shift the second by one.

use regex::Regex;
use std::{path::Path, sync::LazyLock};

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("script block regex")
});

static LANG_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\blang\s*=\s*["']?([a-z]+)"#).expect("lang attribute regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    PlainScript,
    VueComponent,
    SvelteComponent,
}

/// Script text ready for the JS/TS parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    pub text: String,
    pub typescript: bool,
    pub jsx: bool,
}

impl ScriptDialect {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("vue") => ScriptDialect::VueComponent,
            Some("svelte") => ScriptDialect::SvelteComponent,
            _ => ScriptDialect::PlainScript,
        }
    }

    /// Returns `None` for plain scripts, whose content is parsed as-is.
    pub fn extract_script(self, content: &str) -> Option<ScriptSource> {
        match self {
            ScriptDialect::PlainScript => None,
            // <script> / <script setup> for Vue, instance / context="module" for Svelte
            ScriptDialect::VueComponent | ScriptDialect::SvelteComponent => {
                Some(extract_script_blocks(content))
            }
        }
    }
}

fn extract_script_blocks(content: &str) -> ScriptSource {
    let mut text = String::new();
    let mut typescript = false;
    let mut tsx = false;
    let mut cursor = 0;

    for caps in SCRIPT_BLOCK.captures_iter(content) {
        let (Some(attrs), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let lang = LANG_ATTR
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_ascii_lowercase());
        match lang.as_deref() {
            Some("ts") | Some("typescript") => typescript = true,
            Some("tsx") => {
                typescript = true;
                tsx = true;
            }
            _ => {}
        }

        // Blank out everything between the previous block and this body
        let skipped = &content[cursor..body.start()];
        let mut breaks = skipped.matches('\n').count();
        if !text.is_empty() {
            breaks = breaks.max(1);
        }
        text.extend(std::iter::repeat_n('\n', breaks));
        text.push_str(body.as_str());
        cursor = body.end();
    }

    // Plain JS blocks may carry JSX; TypeScript only with lang="tsx"
    ScriptSource { text, typescript, jsx: tsx || !typescript }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for_path() {
        assert_eq!(ScriptDialect::for_path(Path::new("a/App.vue")), ScriptDialect::VueComponent);
        assert_eq!(
            ScriptDialect::for_path(Path::new("Widget.svelte")),
            ScriptDialect::SvelteComponent
        );
        assert_eq!(ScriptDialect::for_path(Path::new("index.tsx")), ScriptDialect::PlainScript);
    }

    #[test]
    fn test_plain_script_is_passthrough() {
        assert!(ScriptDialect::PlainScript.extract_script("import a from 'b';").is_none());
    }

    #[test]
    fn test_vue_script_setup_and_template() {
        let content = r#"<template>
  <div>{{ msg }}</div>
</template>
<script setup lang="ts">
import { ref } from "vue";
</script>
"#;
        let src = ScriptDialect::VueComponent.extract_script(content).unwrap();
        assert!(src.typescript);
        assert!(src.text.contains(r#"import { ref } from "vue";"#));
        assert!(!src.text.contains("template"));
        // import sits on line 5 of the component
        let line = src.text.lines().position(|l| l.contains("import")).unwrap() + 1;
        assert_eq!(line, 5);
    }

    #[test]
    fn test_vue_two_script_blocks() {
        let content = "<script>\nimport a from 'a';\n</script>\n<script setup>\nimport b from 'b';\n</script>";
        let src = ScriptDialect::VueComponent.extract_script(content).unwrap();
        assert!(!src.typescript);
        assert!(src.text.contains("import a from 'a';"));
        assert!(src.text.contains("import b from 'b';"));
    }

    #[test]
    fn test_vue_tsx_script_enables_jsx() {
        let content = "<script setup lang=\"tsx\">\nimport { ref } from 'vue';\nconst el = <div>hi</div>;\n</script>\n";
        let src = ScriptDialect::VueComponent.extract_script(content).unwrap();
        assert!(src.typescript);
        assert!(src.jsx);
    }

    #[test]
    fn test_vue_ts_script_disables_jsx() {
        let src = ScriptDialect::VueComponent
            .extract_script("<script lang='ts'>\nconst n = <number>x;\n</script>")
            .unwrap();
        assert!(src.typescript);
        assert!(!src.jsx);
    }

    #[test]
    fn test_blocks_on_one_line_stay_separate() {
        let content = "<script>import a from 'a'</script><script setup>import b from 'b'</script>";
        let src = ScriptDialect::VueComponent.extract_script(content).unwrap();
        assert_eq!(src.text, "import a from 'a'\nimport b from 'b'");
    }

    #[test]
    fn test_svelte_module_and_instance_scripts() {
        let content = r#"<script context="module">
  import { writable } from 'svelte/store';
</script>
<script>
  import dayjs from 'dayjs';
</script>
<h1>Hello</h1>"#;
        let src = ScriptDialect::SvelteComponent.extract_script(content).unwrap();
        assert!(src.text.contains("svelte/store"));
        assert!(src.text.contains("dayjs"));
        assert!(!src.text.contains("<h1>"));
    }

    #[test]
    fn test_component_without_script() {
        let src = ScriptDialect::SvelteComponent.extract_script("<h1>hi</h1>").unwrap();
        assert!(src.text.trim().is_empty());
    }
}
