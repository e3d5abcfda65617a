use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let show_path = |path: Option<&std::path::Path>, missing: &str| {
        path.map_or_else(|| missing.to_string(), |p| p.display().to_string())
    };
    let global_cfg = show_path(model.config_global_path.as_deref(), "<unknown>");
    let local_cfg = show_path(model.config_local_path.as_deref(), "<none>");
    let state = show_path(model.state_path.as_deref(), "<none>");

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = vec![
        Line::styled("Editing", section_style),
        Line::raw("  Type                Edit the highlighted block"),
        Line::raw("  Enter               New line, or new block at either edge"),
        Line::raw("  Backspace at start  Previous block (removes an empty one)"),
        Line::raw("  Up / Down at edge   Move to the neighboring block"),
        Line::raw("  Tab / Shift-Tab     Indent / outdent the line"),
        Line::raw("  Ctrl+Left/Right     Word movement"),
        Line::raw("  Click               Edit the clicked block"),
        Line::raw(""),
        Line::styled("View", section_style),
        Line::raw("  PageUp / PageDown   Scroll"),
        Line::raw("  Mouse wheel         Scroll"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  Ctrl-s              Export to a markdown file"),
        Line::raw("  Ctrl-q / Ctrl-c     Quit (saves first)"),
        Line::raw("  F1                  Toggle help"),
        Line::raw(""),
        Line::styled("Files", section_style),
        Line::raw(format!("  Global config: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
        Line::raw(format!("  Saved link: {state}")),
    ];
    if let Some(link) = &model.share_link {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Share link", section_style));
        lines.push(Line::raw(format!("  {link}")));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Any key closes", dim_style));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
