//! Keyboard bindings for the demo binary.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Domain actions the demo can perform on the page deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    /// Navigate to the next page.
    NextPage,
    /// Navigate to the previous page.
    PrevPage,
    /// Navigate to the first page.
    FirstPage,
    /// Navigate to the last page.
    LastPage,
    /// Drag the viewport forward without navigating.
    ScrollForward,
    /// Drag the viewport backward without navigating.
    ScrollBack,
    /// Insert a fresh page after the current one.
    InsertAfterCurrent,
    /// Delete the current page.
    DeleteCurrent,
    /// Move the current page one position forward.
    MoveCurrentForward,
    /// Move the current page one position back.
    MoveCurrentBack,
    /// Swap between the linear and stacked layouters.
    SwapLayouter,
    /// Re-sync against the source.
    Reload,
    /// Toggle rest snapping.
    TogglePaging,
    /// Leave the demo.
    Quit,
}

/// Maps keyboard events to pager actions.
///
/// Provides default vim-style bindings; a config override hook exists in
/// the config file format but is not wired up yet.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, PagerAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<PagerAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Vim-style navigation plus arrows.
        bindings.insert(
            KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE),
            PagerAction::NextPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE),
            PagerAction::PrevPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
            PagerAction::NextPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            PagerAction::PrevPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE),
            PagerAction::FirstPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
            PagerAction::LastPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Home, KeyModifiers::NONE),
            PagerAction::FirstPage,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::End, KeyModifiers::NONE),
            PagerAction::LastPage,
        );

        // Raw viewport drags, to exercise the reported-scroll path.
        bindings.insert(
            KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE),
            PagerAction::ScrollForward,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE),
            PagerAction::ScrollBack,
        );

        // Structural mutations.
        bindings.insert(
            KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE),
            PagerAction::InsertAfterCurrent,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE),
            PagerAction::DeleteCurrent,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE),
            PagerAction::MoveCurrentForward,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT),
            PagerAction::MoveCurrentBack,
        );

        // Mode toggles.
        bindings.insert(
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE),
            PagerAction::SwapLayouter,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE),
            PagerAction::Reload,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE),
            PagerAction::TogglePaging,
        );

        bindings.insert(
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            PagerAction::Quit,
        );
        bindings.insert(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            PagerAction::Quit,
        );

        Self { bindings }
    }
}
