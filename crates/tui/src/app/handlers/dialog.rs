use crate::app::dialog::{DialogCoordinator, DialogKind, InputKind};
use crate::app::state::{DialogFocus, InputState};
use crate::app::AppState;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKeyAction {
    Confirm,
    Cancel,
    ToggleFocus,
    Edit,
    Ignore,
}

fn dialog_key_action(
    kind: DialogKind,
    focus: DialogFocus,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> DialogKeyAction {
    match (key, kind) {
        (KeyCode::Esc, _) => DialogKeyAction::Cancel,
        (KeyCode::Char('c'), _) if modifiers.contains(KeyModifiers::CONTROL) => {
            DialogKeyAction::Cancel
        }
        (KeyCode::Enter, _) => match focus {
            DialogFocus::Confirm => DialogKeyAction::Confirm,
            DialogFocus::Cancel => DialogKeyAction::Cancel,
        },
        (KeyCode::Tab | KeyCode::BackTab, _) => DialogKeyAction::ToggleFocus,
        (_, DialogKind::Prompt) => DialogKeyAction::Edit,
        (KeyCode::Left | KeyCode::Right, _) => DialogKeyAction::ToggleFocus,
        (KeyCode::Char('y') | KeyCode::Char('Y'), DialogKind::Confirm) => {
            DialogKeyAction::Confirm
        }
        (KeyCode::Char('n') | KeyCode::Char('N'), DialogKind::Confirm) => {
            DialogKeyAction::Cancel
        }
        _ => DialogKeyAction::Ignore,
    }
}

fn handle_prompt_edit_key(
    input: &mut InputState,
    input_kind: InputKind,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    match (key, modifiers) {
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => input.clear(),
        (KeyCode::Char('k'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.kill_to_end()
        }
        (KeyCode::Char('w'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.delete_word_back()
        }
        (KeyCode::Char('a'), mods) if mods.contains(KeyModifiers::CONTROL) => input.move_home(),
        (KeyCode::Char('e'), mods) if mods.contains(KeyModifiers::CONTROL) => input.move_end(),
        (KeyCode::Left, _) => input.move_left(),
        (KeyCode::Right, _) => input.move_right(),
        (KeyCode::Home, _) => input.move_home(),
        (KeyCode::End, _) => input.move_end(),
        (KeyCode::Delete, _) => input.delete(),
        (KeyCode::Backspace, _) => input.backspace(),
        (KeyCode::Char(ch), mods) => {
            if mods.contains(KeyModifiers::CONTROL) || mods.contains(KeyModifiers::ALT) {
                return false;
            }
            if !input_kind.accepts(ch) {
                return false;
            }
            input.insert_char(ch);
        }
        _ => return false,
    }
    true
}

// The renderer may be a tick behind the coordinator; never settle a dialog the
// user has not seen.
fn shown_is_active(app: &mut AppState, coordinator: &DialogCoordinator) -> bool {
    let shown = app.dialog.shown.as_ref().map(|shown| shown.id);
    let active = coordinator.active().map(|active| active.id);
    if shown.is_some() && shown == active {
        return true;
    }
    app.sync_dialog(coordinator);
    false
}

fn confirm_dialog(app: &mut AppState, coordinator: &DialogCoordinator) {
    if !shown_is_active(app, coordinator) {
        return;
    }
    let input = (app.dialog.kind() == Some(DialogKind::Prompt)).then(|| app.dialog.input.current());
    coordinator.resolve_active(input);
    app.sync_dialog(coordinator);
}

fn cancel_dialog(app: &mut AppState, coordinator: &DialogCoordinator) {
    if !shown_is_active(app, coordinator) {
        return;
    }
    coordinator.dismiss_active();
    app.sync_dialog(coordinator);
}

/// Keys go to the open dialog first. `None` means no dialog is open; otherwise the
/// key is consumed and the flag says whether to redraw.
pub fn handle_dialog_key(
    app: &mut AppState,
    coordinator: &DialogCoordinator,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Option<bool> {
    let kind = app.dialog.kind()?;
    match dialog_key_action(kind, app.dialog.focus, key, modifiers) {
        DialogKeyAction::Confirm => confirm_dialog(app, coordinator),
        DialogKeyAction::Cancel => cancel_dialog(app, coordinator),
        DialogKeyAction::ToggleFocus => app.dialog.toggle_focus(),
        DialogKeyAction::Edit => {
            let input_kind = app
                .dialog
                .shown
                .as_ref()
                .and_then(|shown| shown.input.as_ref())
                .map(|input| input.kind)
                .unwrap_or_default();
            return Some(handle_prompt_edit_key(
                &mut app.dialog.input,
                input_kind,
                key,
                modifiers,
            ));
        }
        DialogKeyAction::Ignore => return Some(false),
    }
    Some(true)
}

pub fn handle_dialog_paste(app: &mut AppState, text: &str) -> Option<bool> {
    if app.dialog.kind()? != DialogKind::Prompt {
        return Some(false);
    }
    let input_kind = app
        .dialog
        .shown
        .as_ref()
        .and_then(|shown| shown.input.as_ref())
        .map(|input| input.kind)
        .unwrap_or_default();
    let accepted: String = text.chars().filter(|ch| input_kind.accepts(*ch)).collect();
    app.dialog.input.insert_str(&accepted);
    Some(!accepted.is_empty())
}

/// Left clicks on the buttons act on them; a click outside the dialog box is a
/// backdrop click and cancels.
pub fn handle_dialog_mouse(
    app: &mut AppState,
    coordinator: &DialogCoordinator,
    mouse: MouseEvent,
) -> Option<bool> {
    app.dialog.kind()?;
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Some(false);
    }
    let Some(hit) = app.dialog.hit else {
        return Some(false);
    };
    let position = Position::new(mouse.column, mouse.row);
    if hit.confirm.contains(position) {
        app.dialog.focus = DialogFocus::Confirm;
        confirm_dialog(app, coordinator);
    } else if hit.cancel.is_some_and(|cancel| cancel.contains(position)) {
        app.dialog.focus = DialogFocus::Cancel;
        cancel_dialog(app, coordinator);
    } else if !hit.dialog.contains(position) {
        cancel_dialog(app, coordinator);
    } else {
        return Some(false);
    }
    Some(true)
}
