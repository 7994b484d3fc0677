use ratatui::layout::Rect;

use crate::app::dialog::{DialogDescriptor, DialogKind};
use crate::app::state::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogFocus {
    #[default]
    Confirm,
    Cancel,
}

/// Screen areas of the last drawn dialog, for mouse handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogHitAreas {
    pub dialog: Rect,
    pub confirm: Rect,
    pub cancel: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTransition {
    Unchanged,
    Opened,
    Replaced,
    Closed,
}

/// Renderer-local state for the open dialog.
#[derive(Debug, Default)]
pub struct DialogUiState {
    pub shown: Option<DialogDescriptor>,
    pub input: InputState,
    pub focus: DialogFocus,
    pub hit: Option<DialogHitAreas>,
}

impl DialogUiState {
    /// Adopts the coordinator's open descriptor. Edit state resets whenever a
    /// different dialog appears, so prompt input always starts empty.
    pub fn sync(&mut self, active: Option<DialogDescriptor>) -> DialogTransition {
        let previous = self.shown.as_ref().map(|shown| shown.id);
        let next = active.as_ref().map(|descriptor| descriptor.id);
        if previous == next {
            self.shown = active;
            return DialogTransition::Unchanged;
        }
        self.input.clear();
        self.focus = DialogFocus::Confirm;
        self.hit = None;
        self.shown = active;
        match (previous, next) {
            (None, Some(_)) => DialogTransition::Opened,
            (Some(_), None) => DialogTransition::Closed,
            _ => DialogTransition::Replaced,
        }
    }

    pub fn is_open(&self) -> bool {
        self.shown.is_some()
    }

    pub fn kind(&self) -> Option<DialogKind> {
        self.shown.as_ref().map(|shown| shown.kind)
    }

    pub fn toggle_focus(&mut self) {
        if !self.kind().is_some_and(DialogKind::has_cancel) {
            self.focus = DialogFocus::Confirm;
            return;
        }
        self.focus = match self.focus {
            DialogFocus::Confirm => DialogFocus::Cancel,
            DialogFocus::Cancel => DialogFocus::Confirm,
        };
    }
}
