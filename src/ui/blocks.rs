//! Terminal rendering of a single block's markdown.
//!
//! Walks the comrak AST and produces styled, width-wrapped lines. A rendered
//! line always occupies exactly one terminal row, which the layout relies on
//! to map rows back to blocks.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, parse_document};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::style::{InlineStyle, LineKind, style_for_inline, style_for_line};
use crate::render::{Render, markdown_options};

const CODE_RIGHT_PADDING: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyledText {
    text: String,
    style: InlineStyle,
}

impl StyledText {
    fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    fn width(&self) -> usize {
        self.text.width()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyledLine {
    kind: LineKind,
    spans: Vec<StyledText>,
}

impl StyledLine {
    fn new(kind: LineKind, spans: Vec<StyledText>) -> Self {
        Self { kind, spans }
    }

    fn plain(text: impl Into<String>, kind: LineKind) -> Self {
        Self::new(kind, vec![StyledText::plain(text)])
    }

    fn empty() -> Self {
        Self::new(LineKind::Empty, Vec::new())
    }

    fn into_line(self) -> Line<'static> {
        let base = style_for_line(self.kind);
        Line::from(
            self.spans
                .into_iter()
                .map(|span| Span::styled(span.text, style_for_inline(base, span.style)))
                .collect::<Vec<_>>(),
        )
    }
}

/// Renders markdown as styled terminal lines no wider than `width` columns
/// (except for single words that cannot be broken).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalRenderer {
    width: usize,
}

impl TerminalRenderer {
    pub const fn new(width: usize) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    fn styled_lines(&self, markdown: &str) -> Vec<StyledLine> {
        let arena = Arena::new();
        let options = markdown_options();
        let root = parse_document(&arena, markdown, &options);

        let mut lines = Vec::new();
        for (index, child) in root.children().enumerate() {
            if index > 0 {
                lines.push(StyledLine::empty());
            }
            render_node(child, &mut lines, self.width, 0, None);
        }
        if lines.is_empty() {
            lines.push(StyledLine::empty());
        }
        lines
    }
}

impl Render for TerminalRenderer {
    type Output = Vec<Line<'static>>;

    fn render(&self, markdown: &str) -> Self::Output {
        self.styled_lines(markdown)
            .into_iter()
            .map(StyledLine::into_line)
            .collect()
    }
}

fn render_node<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<StyledLine>,
    width: usize,
    depth: usize,
    list_marker: Option<String>,
) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let prefix = format!("{} ", "#".repeat(heading.level as usize));
            let spans = collect_inline_spans(node);
            push_wrapped(
                lines,
                &spans,
                width,
                &prefix,
                &" ".repeat(prefix.len()),
                LineKind::Heading(heading.level),
            );
        }

        NodeValue::Paragraph => {
            let spans = collect_inline_spans(node);
            push_wrapped(lines, &spans, width, "", "", LineKind::Paragraph);
        }

        NodeValue::CodeBlock(code_block) => {
            render_code_block(&code_block.info, &code_block.literal, lines, width);
        }

        NodeValue::HtmlBlock(html) => {
            for raw_line in html.literal.lines() {
                lines.push(StyledLine::plain(raw_line, LineKind::Html));
            }
        }

        NodeValue::List(list) => {
            let delimiter = match list.delimiter {
                ListDelimType::Paren => ')',
                ListDelimType::Period => '.',
            };
            let max_number = list.start + node.children().count().saturating_sub(1);
            let number_width = max_number.to_string().len();

            for (index, child) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => format!(
                        "{:>number_width$}{delimiter} ",
                        list.start + index
                    ),
                };
                render_node(child, lines, width, depth + 1, Some(marker));
            }
        }

        NodeValue::Item(_) => {
            let marker = list_marker.unwrap_or_else(|| "• ".to_string());
            render_item(node, lines, width, depth, &marker);
        }

        NodeValue::TaskItem(symbol) => {
            let marker = if symbol.is_some() { "✓ " } else { "□ " };
            render_item(node, lines, width, depth, marker);
        }

        NodeValue::BlockQuote => {
            render_blockquote(node, lines, width, 1);
        }

        NodeValue::ThematicBreak => {
            lines.push(StyledLine::plain("─".repeat(width), LineKind::Rule));
        }

        NodeValue::Table(_) => {
            for row in render_table(node, width) {
                lines.push(StyledLine::plain(row, LineKind::Table));
            }
        }

        NodeValue::FootnoteDefinition(def) => {
            let label = format!("[^{}]: ", def.name);
            let spans = collect_inline_spans(node);
            push_wrapped(
                lines,
                &spans,
                width,
                &label,
                &" ".repeat(label.width()),
                LineKind::Paragraph,
            );
        }

        _ => {
            for child in node.children() {
                render_node(child, lines, width, depth, list_marker.clone());
            }
        }
    }
}

fn render_item<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<StyledLine>,
    width: usize,
    depth: usize,
    marker: &str,
) {
    let indent = "  ".repeat(depth.saturating_sub(1));
    let prefix_first = format!("{indent}{marker}");
    let prefix_next = format!("{indent}{}", " ".repeat(marker.width()));
    let mut rendered_any = false;

    for child in node.children() {
        if matches!(child.data.borrow().value, NodeValue::Paragraph) {
            let prefix = if rendered_any {
                &prefix_next
            } else {
                &prefix_first
            };
            let spans = collect_inline_spans(child);
            push_wrapped(lines, &spans, width, prefix, &prefix_next, LineKind::ListItem);
            rendered_any = true;
        } else {
            render_node(child, lines, width, depth, None);
        }
    }

    if !rendered_any {
        lines.push(StyledLine::plain(prefix_first, LineKind::ListItem));
    }
}

fn render_blockquote<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<StyledLine>,
    width: usize,
    quote_depth: usize,
) {
    let prefix = quote_prefix(quote_depth);
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(child);
                push_wrapped(lines, &spans, width, &prefix, &prefix, LineKind::BlockQuote);
            }
            NodeValue::BlockQuote => {
                render_blockquote(child, lines, width, quote_depth + 1);
            }
            _ => {
                for raw_line in extract_text(child).lines() {
                    let spans = [StyledText::plain(raw_line)];
                    push_wrapped(lines, &spans, width, &prefix, &prefix, LineKind::BlockQuote);
                }
            }
        }
    }
}

fn quote_prefix(depth: usize) -> String {
    let mut prefix = String::from("  ");
    for _ in 0..depth {
        prefix.push_str("│ ");
    }
    prefix
}

fn render_code_block(info: &str, literal: &str, lines: &mut Vec<StyledLine>, width: usize) {
    let language = info.split_whitespace().next().unwrap_or("code");
    let content_width = literal
        .lines()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
        .min(width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1));
    let inner_width = content_width + 2 + CODE_RIGHT_PADDING;
    let label: String = format!(" {language} ").chars().take(inner_width).collect();
    lines.push(StyledLine::plain(
        format!(
            "┌{label}{}┐",
            "─".repeat(inner_width.saturating_sub(label.width()))
        ),
        LineKind::CodeBlock,
    ));

    let code_style = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    for raw_line in literal.lines() {
        let visible = truncate_to_width(raw_line, content_width);
        let padding = " ".repeat(content_width.saturating_sub(visible.width()) + CODE_RIGHT_PADDING);
        lines.push(StyledLine::new(
            LineKind::CodeBlock,
            vec![
                StyledText::plain("│ "),
                StyledText::new(visible, code_style),
                StyledText::plain(format!("{padding} │")),
            ],
        ));
    }

    lines.push(StyledLine::plain(
        format!("└{}┘", "─".repeat(inner_width)),
        LineKind::CodeBlock,
    ));
}

fn render_table<'a>(table: &'a AstNode<'a>, width: usize) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;
    for row in table.children() {
        if let NodeValue::TableRow(header) = row.data.borrow().value {
            has_header |= header && rows.is_empty();
            rows.push(
                row.children()
                    .map(|cell| extract_text(cell).trim().to_string())
                    .collect(),
            );
        }
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.width());
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, &w)| {
                let cell = row.get(col).map_or("", String::as_str);
                format!("{cell}{}", " ".repeat(w.saturating_sub(cell.width())))
            })
            .collect();
        out.push(truncate_to_width(&format!("│ {} │", cells.join(" │ ")), width));
        if index == 0 && has_header {
            let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
            out.push(truncate_to_width(&format!("├─{}─┤", rule.join("─┼─")), width));
        }
    }
    out
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.to_string().width();
        if used + ch_width > max_width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::CodeBlock(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<StyledText> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<StyledText>,
) {
    let nested = |next: InlineStyle, spans: &mut Vec<StyledText>| {
        for child in node.children() {
            collect_inline_spans_recursive(child, next, spans);
        }
    };
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => {}
        NodeValue::Text(t) => spans.push(StyledText::new(t.clone(), style)),
        NodeValue::HtmlInline(html) => spans.push(StyledText::new(html.clone(), style)),
        NodeValue::Code(code) => spans.push(StyledText::new(
            code.literal.clone(),
            InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            },
        )),
        NodeValue::Emph => nested(
            InlineStyle {
                emphasis: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strong => nested(
            InlineStyle {
                strong: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strikethrough => nested(
            InlineStyle {
                strikethrough: true,
                ..style
            },
            spans,
        ),
        NodeValue::Link(_) | NodeValue::Image(_) => nested(
            InlineStyle {
                link: true,
                ..style
            },
            spans,
        ),
        NodeValue::FootnoteReference(reference) => {
            spans.push(StyledText::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => spans.push(StyledText::new(" ", style)),
        _ => nested(style, spans),
    }
}

fn push_wrapped(
    lines: &mut Vec<StyledLine>,
    spans: &[StyledText],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
    kind: LineKind,
) {
    for line_spans in wrap_spans(spans, width, prefix_first, prefix_next) {
        lines.push(StyledLine::new(kind, line_spans));
    }
}

/// Greedy word wrap by display width. Whitespace at a line break is dropped
/// and a word wider than the line keeps its own line.
fn wrap_spans(
    spans: &[StyledText],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<StyledText>> {
    let tokens = spans.iter().flat_map(split_inline_tokens);

    let start_line = |prefix: &str| -> (Vec<StyledText>, usize) {
        if prefix.is_empty() {
            (Vec::new(), 0)
        } else {
            (vec![StyledText::plain(prefix)], prefix.width())
        }
    };

    let mut lines = Vec::new();
    let (mut current, mut current_width) = start_line(prefix_first);
    let mut has_word = false;
    let mut pending_ws: Option<StyledText> = None;

    for token in tokens {
        if token.text.chars().all(char::is_whitespace) {
            if has_word {
                pending_ws = Some(token);
            }
            continue;
        }

        let ws_width = pending_ws.as_ref().map_or(0, StyledText::width);
        if has_word && current_width + ws_width + token.width() > width {
            lines.push(std::mem::take(&mut current));
            (current, current_width) = start_line(prefix_next);
            pending_ws = None;
        } else if let Some(ws) = pending_ws.take() {
            current_width += ws_width;
            current.push(ws);
        }
        current_width += token.width();
        current.push(token);
        has_word = true;
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &StyledText) -> Vec<StyledText> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_ws: Option<bool> = None;

    for ch in span.text.chars() {
        let is_ws = ch.is_whitespace();
        if in_ws.is_some_and(|state| state != is_ws) {
            out.push(StyledText::new(std::mem::take(&mut buf), span.style));
        }
        buf.push(ch);
        in_ws = Some(is_ws);
    }
    if !buf.is_empty() {
        out.push(StyledText::new(buf, span.style));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn texts(markdown: &str, width: usize) -> Vec<String> {
        TerminalRenderer::new(width)
            .render(markdown)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_empty_block_is_one_blank_line() {
        assert_eq!(texts("", 40), vec![String::new()]);
        assert_eq!(texts("   ", 40), vec![String::new()]);
    }

    #[test]
    fn test_heading_keeps_hash_prefix_and_style() {
        let lines = TerminalRenderer::new(40).render("## Section");
        assert_eq!(lines.len(), 1);
        let heading = &lines[0].spans[1];
        assert_eq!(heading.content, "Section");
        assert_eq!(heading.style.fg, Some(Color::Green));
        assert!(heading.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(texts("## Section", 40), vec!["## Section".to_string()]);
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        let lines = texts("one two three four five", 10);
        assert_eq!(lines, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_soft_breaks_join_lines() {
        assert_eq!(texts("first\nsecond", 40), vec!["first second"]);
    }

    #[test]
    fn test_children_separated_by_blank_line() {
        let lines = texts("# Title\nbody text", 40);
        assert_eq!(lines, vec!["# Title", "", "body text"]);
    }

    #[test]
    fn test_bullet_and_task_lists() {
        let lines = texts("- apple\n- [x] done\n- [ ] todo", 40);
        assert_eq!(lines, vec!["• apple", "✓ done", "□ todo"]);
    }

    #[test]
    fn test_ordered_list_numbers_align() {
        let source = (1..=10).map(|n| format!("{n}. item")).collect::<Vec<_>>().join("\n");
        let lines = texts(&source, 40);
        assert_eq!(lines[0], " 1. item");
        assert_eq!(lines[9], "10. item");
    }

    #[test]
    fn test_code_block_is_framed() {
        let lines = texts("```rust\nfn main() {}\n```", 40);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("┌ rust "));
        assert!(lines[1].starts_with("│ fn main() {}"));
        assert!(lines[2].starts_with('└'));
    }

    #[test]
    fn test_blockquote_prefix() {
        assert_eq!(texts("> quoted", 40), vec!["  │ quoted"]);
    }

    #[test]
    fn test_table_rows_and_header_rule() {
        let lines = texts("| a | bb |\n|---|---|\n| 1 | 2 |", 40);
        assert_eq!(lines, vec!["│ a │ bb │", "├───┼────┤", "│ 1 │ 2  │"]);
    }

    #[test]
    fn test_inline_code_and_link_styles() {
        let lines = TerminalRenderer::new(40).render("see `x` at [site](https://a.b)");
        let spans = &lines[0].spans;
        let code = spans.iter().find(|s| s.content == "x").unwrap();
        assert_eq!(code.style.fg, Some(Color::Red));
        let link = spans.iter().find(|s| s.content == "site").unwrap();
        assert!(link.style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_wide_characters_wrap_by_display_width() {
        let lines = texts("日本 語語", 5);
        assert_eq!(lines, vec!["日本", "語語"]);
    }

    #[test]
    fn test_long_word_keeps_own_line() {
        let lines = texts("a supercalifragilistic b", 8);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }
}
