use crossterm::event::KeyEvent;

use crate::model::mode::SearchMode;

/// All possible messages that drive state transitions.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Key(KeyEvent),
    Resize(u16, u16),

    // -- Selection
    SetSearchMode(SearchMode),

    // -- Query lifecycle
    SubmitQuery(String),

    // -- System
    Quit,
}
