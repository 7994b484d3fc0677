mod dialogs;

pub use dialogs::{DialogFocus, DialogHitAreas, DialogTransition, DialogUiState};
