//! Utility functions for outline parsing.
//!
//! Inline helpers shared by the outline builder: fold directive detection,
//! `==highlight==` splitting and span bookkeeping.

use crate::mindmap::{InlineSpan, InlineStyle};
use regex::Regex;
use std::sync::OnceLock;

/// Fold directive carried by an HTML comment on an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldDirective {
    /// `<!-- fold -->` hides the entry's children
    Fold,
    /// `<!-- fold recursively -->` or `<!-- foldAll -->` folds the whole subtree
    Recursive,
}

/// Recognize a fold directive comment.
///
/// Accepts the bare forms and the `markmap:` prefixed ones.
///
/// # Examples
///
/// ```
/// # use foldmap::parser::utils::{FoldDirective, parse_fold_directive};
/// assert_eq!(parse_fold_directive("<!-- fold -->"), Some(FoldDirective::Fold));
/// assert_eq!(
///     parse_fold_directive("<!-- markmap: foldAll -->"),
///     Some(FoldDirective::Recursive)
/// );
/// assert_eq!(parse_fold_directive("<!-- folded -->"), None);
/// ```
pub fn parse_fold_directive(html: &str) -> Option<FoldDirective> {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    let directive = DIRECTIVE.get_or_init(|| {
        Regex::new(r"^<!--\s*(?:markmap:\s*)?(?P<kind>fold recursively|foldAll|fold)\s*-->$")
            .expect("valid pattern")
    });

    let caps = directive.captures(html.trim())?;
    match &caps["kind"] {
        "fold" => Some(FoldDirective::Fold),
        _ => Some(FoldDirective::Recursive),
    }
}

/// Split `text` on `==marked==` runs, giving the marked parts a highlight.
///
/// Unpaired markers stay literal.
pub fn split_highlights(text: &str, style: InlineStyle) -> Vec<InlineSpan> {
    static HIGHLIGHT: OnceLock<Regex> = OnceLock::new();
    let highlight =
        HIGHLIGHT.get_or_init(|| Regex::new(r"==(?P<inner>[^=]+)==").expect("valid pattern"));

    let mut spans = Vec::new();
    let mut last = 0;
    for caps in highlight.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.name("inner")) else {
            continue;
        };
        if whole.start() > last {
            spans.push(InlineSpan::styled(&text[last..whole.start()], style));
        }
        let marked = InlineStyle {
            highlight: true,
            ..style
        };
        spans.push(InlineSpan::styled(inner.as_str(), marked));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(InlineSpan::styled(&text[last..], style));
    }
    spans
}

/// Append a span, merging it into the previous one when the styles match.
pub fn push_span(spans: &mut Vec<InlineSpan>, span: InlineSpan) {
    if span.text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == span.style => last.text.push_str(&span.text),
        _ => spans.push(span),
    }
}

/// Trim outer whitespace of a label and drop spans left empty.
pub fn trim_spans(spans: &mut Vec<InlineSpan>) {
    if let Some(first) = spans.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    spans.retain(|span| !span.text.is_empty());
    // a span emptied by trimming can expose whitespace on its neighbour
    if spans
        .first()
        .is_some_and(|s| s.text.starts_with(char::is_whitespace))
        || spans
            .last()
            .is_some_and(|s| s.text.ends_with(char::is_whitespace))
    {
        trim_spans(spans);
    }
}

/// Byte offsets where each line of `text` starts.
pub fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// 1-indexed line containing byte `offset`.
pub fn line_of(starts: &[usize], offset: usize) -> usize {
    match starts.binary_search(&offset) {
        Ok(i) => i + 1,
        Err(i) => i,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_forms() {
        assert_eq!(
            parse_fold_directive("<!-- fold recursively -->"),
            Some(FoldDirective::Recursive)
        );
        assert_eq!(
            parse_fold_directive("<!--markmap: fold-->"),
            Some(FoldDirective::Fold)
        );
        assert_eq!(
            parse_fold_directive("  <!-- foldAll -->\n"),
            Some(FoldDirective::Recursive)
        );
        assert_eq!(parse_fold_directive("<!-- note -->"), None);
        assert_eq!(parse_fold_directive("<b>fold</b>"), None);
    }

    #[test]
    fn test_split_highlights() {
        let spans = split_highlights("a ==b== c", InlineStyle::default());
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "a ");
        assert!(!spans[0].style.highlight);
        assert_eq!(spans[1].text, "b");
        assert!(spans[1].style.highlight);
        assert_eq!(spans[2].text, " c");
    }

    #[test]
    fn test_unpaired_highlight_marker_is_literal() {
        let spans = split_highlights("x == y", InlineStyle::default());
        assert_eq!(spans, [InlineSpan::plain("x == y")]);
    }

    #[test]
    fn test_highlight_keeps_outer_style() {
        let strong = InlineStyle {
            strong: true,
            ..InlineStyle::default()
        };
        let spans = split_highlights("==hot==", strong);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].style.strong && spans[0].style.highlight);
    }

    #[test]
    fn test_push_span_merges_same_style() {
        let mut spans = Vec::new();
        push_span(&mut spans, InlineSpan::plain("a"));
        push_span(&mut spans, InlineSpan::plain("b"));
        push_span(&mut spans, InlineSpan::plain(""));
        assert_eq!(spans, [InlineSpan::plain("ab")]);
    }

    #[test]
    fn test_trim_spans() {
        let code = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        let mut spans = vec![
            InlineSpan::plain("  "),
            InlineSpan::styled("x", code),
            InlineSpan::plain(" tail  "),
        ];
        trim_spans(&mut spans);
        assert_eq!(
            spans,
            [InlineSpan::styled("x", code), InlineSpan::plain(" tail")]
        );
    }

    #[test]
    fn test_line_of() {
        let starts = line_starts("ab\ncd\n\nef");
        assert_eq!(line_of(&starts, 0), 1);
        assert_eq!(line_of(&starts, 1), 1);
        assert_eq!(line_of(&starts, 3), 2);
        assert_eq!(line_of(&starts, 6), 3);
        assert_eq!(line_of(&starts, 8), 4);
    }
}
