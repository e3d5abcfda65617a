use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, SaveState, ToastLevel};

pub fn status_text(model: &Model) -> String {
    let position = model.document.active().map_or_else(
        || format!("{} blocks", model.document.len()),
        |index| format!("block {}/{}", index + 1, model.document.len()),
    );
    let save = match model.save_state {
        SaveState::Clean => "",
        SaveState::Unsaved => "  [unsaved]",
        SaveState::Saved => "  [saved]",
        SaveState::Failed => "  [save failed]",
    };
    format!(" blockdown  {position}{save}  F1:help")
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status_bar = Paragraph::new(status_text(model))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
