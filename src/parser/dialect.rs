//! Logseq dialect normalization.
//!
//! Rewrites the markdown Logseq writes into plain markdown the outline
//! parser understands:
//!
//! 1. `^^highlight^^` becomes `==highlight==`
//! 2. `collapsed:: true` block properties are dropped
//! 3. `id:: <uuid>` block properties are dropped
//! 4. every heading gets an auto-fold directive, or a folded title heading is
//!    synthesized from the document name when there is no heading at all
//!
//! Markers that do not match exactly are left alone.

use regex::Regex;
use std::sync::OnceLock;

/// Comment the outline parser reads as "fold this node and its subtree".
pub const FOLD_DIRECTIVE: &str = "<!-- fold recursively -->";

const DIALECT_HIGHLIGHT: &str = "^^";
const STANDARD_HIGHLIGHT: &str = "==";
const UNTITLED: &str = "Untitled";

/// Normalize a Logseq document.
///
/// `display_name` is only used to synthesize a title heading. Absent text
/// stays absent and empty text stays empty.
///
/// # Examples
///
/// ```
/// use foldmap::parser::dialect::normalize;
///
/// let text = "id:: 3fa2-11\ncollapsed:: true\nhello ^^world^^";
/// let normalized = normalize(Some(text), "notes.md").unwrap();
/// assert_eq!(normalized, "# notes <!-- fold recursively -->\nhello ==world==");
/// ```
pub fn normalize(text: Option<&str>, display_name: &str) -> Option<String> {
    let text = text?;
    if text.is_empty() {
        return Some(String::new());
    }
    let adapted = adapt_dialect(text);
    Some(inject_fold_directives(&adapted, display_name))
}

/// Steps 1-3: highlight substitution and block property removal.
///
/// Repeated until nothing changes, since removing one marker can join its
/// neighbours into another (`^id:: ab^` leaves `^^`).
pub fn adapt_dialect(text: &str) -> String {
    let mut current = adapt_once(text);
    loop {
        let next = adapt_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn adapt_once(text: &str) -> String {
    let text = text.replace(DIALECT_HIGHLIGHT, STANDARD_HIGHLIGHT);

    static COLLAPSED_LINE: OnceLock<Regex> = OnceLock::new();
    static COLLAPSED: OnceLock<Regex> = OnceLock::new();
    static ID_LINE: OnceLock<Regex> = OnceLock::new();
    static ID: OnceLock<Regex> = OnceLock::new();

    let collapsed_line = COLLAPSED_LINE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*collapsed:: true[ \t]*(?:\r?\n|$)").expect("valid pattern")
    });
    let collapsed =
        COLLAPSED.get_or_init(|| Regex::new(r"\bcollapsed:: true\b").expect("valid pattern"));
    let id_line = ID_LINE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*id:: [0-9a-z-]+[ \t]*(?:\r?\n|$)").expect("valid pattern")
    });
    // the token must end the match, otherwise `id:: 3FA2` would lose its `3`
    let id = ID.get_or_init(|| {
        Regex::new(r"(?m)\bid:: [0-9a-z-]+(?P<rest>[^\w-]|$)").expect("valid pattern")
    });

    let text = collapsed_line.replace_all(&text, "");
    let text = collapsed.replace_all(&text, "");
    let text = id_line.replace_all(&text, "");
    id.replace_all(&text, "${rest}").into_owned()
}

/// Step 4: append [`FOLD_DIRECTIVE`] to every heading, or prepend a folded
/// title heading when the text has none.
pub fn inject_fold_directives(text: &str, display_name: &str) -> String {
    if !has_heading(text) {
        return format!(
            "# {} {}\n{}",
            display_title(display_name),
            FOLD_DIRECTIVE,
            text
        );
    }

    let mut out = String::with_capacity(text.len() + 64);
    for line in scan_lines(text) {
        if line.heading && !line.content.contains(FOLD_DIRECTIVE) {
            // the directive goes before an ATX closing sequence so `##` stays markup
            let (body, closing) = split_closing_sequence(line.content);
            out.push_str(body);
            out.push(' ');
            out.push_str(FOLD_DIRECTIVE);
            out.push_str(closing);
        } else {
            out.push_str(line.content);
        }
        out.push_str(line.ending);
    }
    out
}

fn split_closing_sequence(line: &str) -> (&str, &str) {
    static CLOSING: OnceLock<Regex> = OnceLock::new();
    let closing = CLOSING.get_or_init(|| {
        Regex::new(r"^(?P<body>.*?\S)(?P<closing>[ \t]+#+[ \t]*)$").expect("valid pattern")
    });
    match closing.captures(line) {
        Some(caps) => {
            let split = caps["body"].len();
            line.split_at(split)
        }
        None => (line, ""),
    }
}

/// Whether any line outside fenced code is a heading.
pub fn has_heading(text: &str) -> bool {
    scan_lines(text).any(|line| line.heading)
}

/// Check a single line for heading syntax: optional indentation, an optional
/// list bullet, 1-6 `#`, whitespace and a non-space token.
///
/// Without a bullet, four columns of indentation make the line indented
/// code rather than a heading.
///
/// # Examples
///
/// ```
/// use foldmap::parser::dialect::is_heading_line;
///
/// assert!(is_heading_line("## Section"));
/// assert!(is_heading_line("\t- ### Logseq heading"));
/// assert!(!is_heading_line("#hashtag"));
/// assert!(!is_heading_line("####### too deep"));
/// assert!(!is_heading_line("    # shell comment"));
/// ```
pub fn is_heading_line(line: &str) -> bool {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    let heading = HEADING.get_or_init(|| {
        Regex::new(r"^(?P<indent>[ \t]*)(?P<bullet>[-*+][ \t]+)?#{1,6}[ \t]+\S")
            .expect("valid pattern")
    });
    let Some(caps) = heading.captures(line) else {
        return false;
    };
    caps.name("bullet").is_some() || indent_columns(&caps["indent"]) < CODE_INDENT
}

const CODE_INDENT: usize = 4;

/// Width of leading whitespace, tabs advancing to the next multiple of four.
fn indent_columns(indent: &str) -> usize {
    indent.chars().fold(0, |columns, c| match c {
        '\t' => columns + CODE_INDENT - columns % CODE_INDENT,
        _ => columns + 1,
    })
}

/// Title for a document without headings: the display name with its
/// extension removed, percent-decoded.
///
/// # Examples
///
/// ```
/// use foldmap::parser::dialect::display_title;
///
/// assert_eq!(display_title("Daily%20Notes.md"), "Daily Notes");
/// assert_eq!(display_title("projects/plan.v2.md"), "projects/plan.v2");
/// ```
pub fn display_title(display_name: &str) -> String {
    let (dir, file) = match display_name.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, display_name),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => file,
    };
    let raw = match dir {
        Some(dir) => format!("{dir}/{stem}"),
        None => stem.to_string(),
    };

    let decoded = match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.clone(),
    };
    let title = decoded.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

struct ScannedLine<'a> {
    content: &'a str,
    ending: &'a str,
    heading: bool,
}

/// Split text into lines, flagging headings outside fenced code blocks.
fn scan_lines(text: &str) -> impl Iterator<Item = ScannedLine<'_>> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"^[ \t]*(?:[-*+][ \t]+)?(?P<fence>`{3,}|~{3,})").expect("valid pattern")
    });

    let mut open_fence: Option<String> = None;
    text.split_inclusive('\n').map(move |raw| {
        let (content, ending) = if let Some(stripped) = raw.strip_suffix("\r\n") {
            (stripped, "\r\n")
        } else if let Some(stripped) = raw.strip_suffix('\n') {
            (stripped, "\n")
        } else {
            (raw, "")
        };

        if let Some(caps) = fence.captures(content) {
            let marker = &caps["fence"];
            match &open_fence {
                None => open_fence = Some(marker.to_string()),
                Some(open) if closes(open, marker) => open_fence = None,
                Some(_) => {}
            }
            return ScannedLine {
                content,
                ending,
                heading: false,
            };
        }

        ScannedLine {
            content,
            ending,
            heading: open_fence.is_none() && is_heading_line(content),
        }
    })
}

fn closes(open: &str, marker: &str) -> bool {
    marker.chars().next() == open.chars().next() && marker.len() >= open.len()
}
