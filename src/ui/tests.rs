use super::*;
use crate::app::{Model, SaveState, ToastLevel};
use crate::document::{DocumentController, DocumentOptions};
use crate::event::EditKey;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::style::Modifier;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(60, 12);
    Terminal::new(backend).unwrap()
}

fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

fn draw(model: &Model) -> Terminal<TestBackend> {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

fn model_for(content: &str) -> Model {
    Model::new(
        DocumentController::from_content(content, DocumentOptions::default()),
        (60, 12),
    )
}

#[test]
fn test_rendered_blocks_show_formatted_text() {
    let model = model_for("# Title\n\nSome **bold** text");
    let rows = screen(&draw(&model));
    assert!(rows[0].starts_with("    # Title"), "got {:?}", rows[0]);
    assert!(rows[1].trim().is_empty());
    assert!(rows[2].starts_with("    Some bold text"), "got {:?}", rows[2]);
}

#[test]
fn test_active_block_shows_raw_markdown_with_gutter() {
    let mut model = model_for("# Title\n\nSome **bold** text");
    model.document.activate(1);
    model.relayout();
    let rows = screen(&draw(&model));
    assert!(rows[2].starts_with("  ▎ Some **bold** text"), "got {:?}", rows[2]);
}

#[test]
fn test_caret_cell_is_reversed() {
    let mut model = Model::new(
        DocumentController::new(DocumentOptions::default()),
        (60, 12),
    );
    model.document.handle_key(EditKey::Char('a'), 0);
    model.relayout();
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    // padding 2 + gutter 2 + "a"
    let caret = &buffer[(5, 0)];
    assert!(caret.modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_status_bar_on_last_row() {
    let mut model = model_for("a\n\nb");
    model.document.activate(1);
    model.relayout();
    let rows = screen(&draw(&model));
    assert!(rows[11].contains("block 2/2"), "got {:?}", rows[11]);
    assert!(rows[11].contains("F1:help"));
}

#[test]
fn test_status_text_reflects_save_state() {
    let mut model = model_for("a");
    assert_eq!(status_text(&model), " blockdown  1 blocks  F1:help");
    model.save_state = SaveState::Unsaved;
    assert!(status_text(&model).contains("[unsaved]"));
    model.save_state = SaveState::Failed;
    assert!(status_text(&model).contains("[save failed]"));
}

#[test]
fn test_toast_replaces_status_bar() {
    let mut model = model_for("a");
    model.show_toast(ToastLevel::Warning, "something odd");
    let rows = screen(&draw(&model));
    assert!(rows[11].starts_with("[warn] something odd"), "got {:?}", rows[11]);
}

#[test]
fn test_help_overlay_lists_keys() {
    let mut model = model_for("a");
    model.help_visible = true;
    model.share_link = Some("https://example.com/?q=abc".to_string());
    let content = screen(&draw(&model)).join("\n");
    assert!(content.contains("Help"));
    assert!(content.contains("Editing"));
    assert!(content.contains("Enter"));
}

#[test]
fn test_scrolled_viewport_renders_later_rows() {
    let content = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n\n");
    let mut model = model_for(&content);
    model.viewport.scroll_down(10);
    let rows = screen(&draw(&model));
    assert!(rows[0].starts_with("    line 5"), "got {:?}", rows[0]);
}
