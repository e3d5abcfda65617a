use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::debug;

use crate::app::{Message, Model};
use crate::event::EditKey;

use super::event_loop::ResizeDebouncer;

const WHEEL_ROWS: usize = 3;

pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    now_ms: u64,
    resize_debouncer: &mut ResizeDebouncer,
) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Resize(width, height) => {
            debug!(width, height, "resize queued");
            resize_debouncer.queue(*width, *height, now_ms);
            None
        }
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
        KeyCode::Char('s') if ctrl => return Some(Message::Export),
        KeyCode::F(1) => return Some(Message::ToggleHelp),
        _ => {}
    }
    if model.help_visible {
        return Some(Message::HideHelp);
    }

    match key.code {
        KeyCode::PageUp => return Some(Message::PageUp),
        KeyCode::PageDown => return Some(Message::PageDown),
        _ => {}
    }

    if model.document.active().is_none() {
        return match key.code {
            KeyCode::Enter | KeyCode::Down => Some(Message::ActivateFirst),
            KeyCode::Up => Some(Message::ActivateLast),
            _ => None,
        };
    }

    let edit = match key.code {
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(ch) => EditKey::Char(ch),
        KeyCode::Enter => EditKey::Enter,
        KeyCode::Backspace => EditKey::Backspace,
        KeyCode::Delete => EditKey::Delete,
        KeyCode::Tab => EditKey::Tab,
        KeyCode::BackTab => EditKey::BackTab,
        KeyCode::Up => EditKey::Up,
        KeyCode::Down => EditKey::Down,
        KeyCode::Left if ctrl => EditKey::WordLeft,
        KeyCode::Right if ctrl => EditKey::WordRight,
        KeyCode::Left => EditKey::Left,
        KeyCode::Right => EditKey::Right,
        KeyCode::Home => EditKey::Home,
        KeyCode::End => EditKey::End,
        _ => return None,
    };
    Some(Message::Key(edit))
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return None;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let row = model.viewport.row_at(mouse.row)?;
            model.layout.block_at_row(row).map(Message::ActivateBlock)
        }
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_ROWS)),
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_ROWS)),
        _ => None,
    }
}
