//! Laying the block sequence out as terminal rows.
//!
//! Rendered blocks go through [`TerminalRenderer`]; the active block shows its
//! raw text hard-wrapped the same way the edit controller counts visual rows,
//! so moving down off the last row lands where the user sees it.

use std::ops::Range;

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use super::blocks::TerminalRenderer;
use super::style::{caret_style, editing_text_style, gutter_style};
use crate::document::{Block, DocumentController};
use crate::editor::{BlockEditController, WRAP_SLACK};

/// Marks the rows of the block being edited.
pub const EDIT_GUTTER: &str = "▎ ";
const GUTTER_WIDTH: usize = 2;

/// The whole document as styled rows, with each block's row range.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    lines: Vec<Line<'static>>,
    block_rows: Vec<Range<usize>>,
    caret_row: Option<usize>,
}

impl DocumentLayout {
    /// Lay out `document` for a text area `width` columns wide.
    ///
    /// Blocks are separated by one blank row.
    pub fn build(document: &DocumentController, width: usize) -> Self {
        let inner = width.saturating_sub(GUTTER_WIDTH).max(1);
        let renderer = TerminalRenderer::new(inner);
        let mut layout = Self::default();

        for (index, block) in document.blocks().iter().enumerate() {
            if index > 0 {
                layout.lines.push(Line::default());
            }
            let start = layout.lines.len();
            match block {
                Block::Edit(editor) => {
                    let (rows, caret) = edit_rows(editor, inner);
                    layout.caret_row = Some(start + caret);
                    layout.lines.extend(rows.into_iter().map(|mut spans| {
                        spans.insert(0, Span::styled(EDIT_GUTTER, gutter_style()));
                        Line::from(spans)
                    }));
                }
                Block::Rendered(rendered) => {
                    layout
                        .lines
                        .extend(rendered.render(&renderer).into_iter().map(|mut line| {
                            line.spans.insert(0, Span::raw(" ".repeat(GUTTER_WIDTH)));
                            line
                        }));
                }
            }
            layout.block_rows.push(start..layout.lines.len());
        }
        layout
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Rows occupied by block `index`.
    pub fn block_rows(&self, index: usize) -> Option<Range<usize>> {
        self.block_rows.get(index).cloned()
    }

    /// The block drawn on `row`; separator rows belong to no block.
    pub fn block_at_row(&self, row: usize) -> Option<usize> {
        let index = self.block_rows.partition_point(|range| range.end <= row);
        self.block_rows
            .get(index)
            .filter(|range| range.contains(&row))
            .map(|_| index)
    }

    /// Document row holding the caret, when a block is being edited.
    pub const fn caret_row(&self) -> Option<usize> {
        self.caret_row
    }
}

/// Raw text rows of the active block and the caret's row within them.
///
/// A logical line of display width `w` spans `w / wrap + 1` rows, matching
/// the controller's visual row count.
fn edit_rows(editor: &BlockEditController, width: usize) -> (Vec<Vec<Span<'static>>>, usize) {
    let wrap = editor
        .line_length()
        .saturating_sub(WRAP_SLACK)
        .min(width)
        .max(1);
    let cursor = editor.cursor();
    let text = editor.text();

    let mut rows = Vec::new();
    let mut caret_row = 0;
    for (line_idx, line) in text.split('\n').enumerate() {
        let first_row = rows.len();
        let mut chunks: Vec<String> = Vec::new();
        let mut caret_at = None;
        let mut used = 0;

        for (col, ch) in line.chars().enumerate() {
            let row = used / wrap;
            if line_idx == cursor.line && col == cursor.col {
                caret_at = Some((row, chunk_len(&chunks, row)));
            }
            push_char(&mut chunks, row, ch);
            used += ch.width().unwrap_or(0);
        }
        let row_total = used / wrap + 1;
        chunks.resize_with(row_total.max(chunks.len()), String::new);
        if line_idx == cursor.line && caret_at.is_none() {
            caret_at = Some((used / wrap, chunk_len(&chunks, used / wrap)));
        }

        for (row, chunk) in chunks.into_iter().enumerate() {
            match caret_at {
                Some((caret_chunk, at)) if caret_chunk == row => {
                    caret_row = first_row + row;
                    rows.push(caret_spans(&chunk, at));
                }
                _ => rows.push(vec![Span::styled(chunk, editing_text_style())]),
            }
        }
    }
    (rows, caret_row)
}

fn chunk_len(chunks: &[String], row: usize) -> usize {
    chunks.get(row).map_or(0, |chunk| chunk.chars().count())
}

fn push_char(chunks: &mut Vec<String>, row: usize, ch: char) {
    if chunks.len() <= row {
        chunks.resize_with(row + 1, String::new);
    }
    chunks[row].push(ch);
}

/// Split `chunk` around the char at `at`, drawing that char (or a trailing
/// space) as the caret.
fn caret_spans(chunk: &str, at: usize) -> Vec<Span<'static>> {
    let before: String = chunk.chars().take(at).collect();
    let mut rest = chunk.chars().skip(at);
    let under = rest.next().map_or_else(|| " ".to_string(), String::from);
    let after: String = rest.collect();

    let mut spans = vec![
        Span::styled(before, editing_text_style()),
        Span::styled(under, caret_style()),
    ];
    if !after.is_empty() {
        spans.push(Span::styled(after, editing_text_style()));
    }
    spans
}
