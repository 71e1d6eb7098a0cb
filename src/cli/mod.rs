//! Command line surface and the non-interactive outputs.

mod commands;

pub use commands::{Cli, OutputFormat};

use foldmap::mindmap::command::{DetachedView, replay};
use foldmap::parser::{build_mind_map, dialect};
use tracing::debug;

/// What `--normalize` prints for one document.
pub fn normalized_output(text: &str, name: &str) -> String {
    dialect::normalize(Some(text), name).unwrap_or_default()
}

/// What `--tree` prints for one document, after replaying `keys`.
pub fn tree_output(
    text: &str,
    name: &str,
    keys: Option<&str>,
    format: OutputFormat,
) -> serde_json::Result<String> {
    let mut map = build_mind_map(Some(text), name);
    if let (Some(map), Some(keys)) = (map.as_mut(), keys) {
        let applied = replay(keys, map, &mut DetachedView);
        debug!(keys, applied, "replayed command keys");
    }

    match format {
        OutputFormat::Plain => Ok(map.map(|m| m.render_box_tree()).unwrap_or_default()),
        OutputFormat::Json => serde_json::to_string_pretty(&map).map(|json| json + "\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "id:: 64b0\n- Alpha\n  - one\n  - two\n- Beta ^^hot^^\n";

    #[test]
    fn test_normalized_output() {
        let out = normalized_output(PAGE, "pages/My%20Page.md");
        assert!(out.starts_with("# pages/My Page <!-- fold recursively -->\n"));
        assert!(out.contains("Beta ==hot=="));
        assert!(!out.contains("id::"));
    }

    #[test]
    fn test_tree_starts_folded() {
        let out = tree_output(PAGE, "page.md", None, OutputFormat::Plain).unwrap();
        assert_eq!(out, "page [+]\n");
    }

    #[test]
    fn test_tree_after_keys() {
        let out = tree_output(PAGE, "page.md", Some(","), OutputFormat::Plain).unwrap();
        assert_eq!(out, "page\n├── Alpha\n│   ├── one\n│   └── two\n└── Beta hot\n");

        let out = tree_output(PAGE, "page.md", Some("2"), OutputFormat::Plain).unwrap();
        assert_eq!(out, "page\n├── Alpha [+]\n└── Beta hot\n");
    }

    #[test]
    fn test_tree_json() {
        let out = tree_output(PAGE, "page.md", Some(","), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["root"]["content"]["spans"][0]["text"], "page");
        assert_eq!(json["root"]["children"][1]["content"]["spans"][1]["style"]["highlight"], true);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(tree_output("  \n", "e.md", None, OutputFormat::Plain).unwrap(), "");
        assert_eq!(tree_output("", "e.md", None, OutputFormat::Json).unwrap(), "null\n");
    }
}
