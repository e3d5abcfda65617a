//! Colors and modifiers for rendered blocks and the editing chrome.
//!
//! Uses plain ANSI colors so the terminal palette decides the actual shades.

use ratatui::style::{Color, Modifier, Style};

/// What kind of markdown construct a rendered line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    CodeBlock,
    BlockQuote,
    ListItem,
    Rule,
    Table,
    Html,
    Empty,
}

/// Inline emphasis collected while walking a block's inline nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub link: bool,
    pub strikethrough: bool,
}

pub fn style_for_line(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(5) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        LineKind::CodeBlock => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),
        LineKind::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        LineKind::Rule | LineKind::Html => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),
        LineKind::ListItem | LineKind::Table | LineKind::Paragraph | LineKind::Empty => {
            Style::default()
        }
    }
}

/// Merge inline emphasis into a line's base style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style
            .fg(Color::Red)
            .remove_modifier(Modifier::DIM)
            .add_modifier(Modifier::BOLD);
    }
    style
}

/// Bar drawn left of the block being edited.
pub fn gutter_style() -> Style {
    Style::default().fg(Color::Blue)
}

/// Raw markdown text of the block being edited.
pub fn editing_text_style() -> Style {
    Style::default()
}

pub fn caret_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_are_bold() {
        for level in 1..=6 {
            let style = style_for_line(LineKind::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_paragraph_is_unstyled() {
        assert_eq!(style_for_line(LineKind::Paragraph), Style::default());
    }

    #[test]
    fn test_inline_code_clears_dim() {
        let base = style_for_line(LineKind::CodeBlock);
        let style = style_for_inline(
            base,
            InlineStyle {
                code: true,
                ..InlineStyle::default()
            },
        );
        assert!(!style.add_modifier.contains(Modifier::DIM));
        assert_eq!(style.fg, Some(Color::Red));
    }

    #[test]
    fn test_inline_modifiers_stack() {
        let style = style_for_inline(
            Style::default(),
            InlineStyle {
                emphasis: true,
                strong: true,
                strikethrough: true,
                ..InlineStyle::default()
            },
        );
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }
}
