use ratatui::prelude::*;
use ratatui::widgets::{Padding, Paragraph};

use crate::app::Model;

use super::{DOCUMENT_LEFT_PADDING, overlays, status};

/// Columns available to the document once padding is taken off.
pub fn document_content_width(total_width: u16) -> usize {
    total_width.saturating_sub(DOCUMENT_LEFT_PADDING).max(1) as usize
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let doc_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let footer_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    render_document(model, frame, doc_area);
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, footer_area);
    } else {
        status::render_status_bar(model, frame, footer_area);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let lines = model
        .layout
        .lines()
        .get(model.viewport.visible_range())
        .map(<[Line<'static>]>::to_vec)
        .unwrap_or_default();
    let paragraph = Paragraph::new(lines).block(
        ratatui::widgets::Block::default().padding(Padding::left(DOCUMENT_LEFT_PADDING)),
    );
    frame.render_widget(paragraph, area);
}
