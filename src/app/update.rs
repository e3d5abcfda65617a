use crate::app::Model;
use crate::app::model::SaveState;
use crate::event::EditKey;

/// All possible events and actions in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Key for the active block
    Key(EditKey),
    /// Put block `n` into edit mode
    ActivateBlock(usize),
    /// Edit the first block
    ActivateFirst,
    /// Edit the last block
    ActivateLast,

    // Scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,

    // Application
    /// Write the content to a timestamped markdown file
    Export,
    ToggleHelp,
    HideHelp,
    /// Terminal resized (after debounce)
    Resize(u16, u16),
    Quit,
}

/// Pure state transition. Side effects for a message run after this returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Key(key) => {
            model.document.handle_key(key, model.now_ms);
            if model.document.persist_pending() {
                model.save_state = SaveState::Unsaved;
            }
            model.relayout();
            model.follow_caret();
        }
        Message::ActivateBlock(index) => activate(&mut model, index),
        Message::ActivateFirst => activate(&mut model, 0),
        Message::ActivateLast => {
            let last = model.document.len().saturating_sub(1);
            activate(&mut model, last);
        }

        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),

        Message::Export => {}
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => model.should_quit = true,
    }
    model
}

fn activate(model: &mut Model, index: usize) {
    model.document.activate(index);
    model.relayout();
    model.follow_caret();
}
