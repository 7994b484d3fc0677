use crate::app::AppState;
use ratatui::text::{Line, Span};

use super::style::dim;
use crate::app::util::text::truncate_to_width;

pub(super) fn build_status_line(app: &AppState, queued: usize, width: usize) -> Line<'static> {
    let mut segments = Vec::new();
    if app.dialog.is_open() {
        if app.dialog.shown.as_ref().is_some_and(|shown| shown.cancel_label.is_some()) {
            segments.push("Enter confirm · Esc cancel · Tab switch".to_string());
        } else {
            segments.push("Enter/Esc close".to_string());
        }
    } else {
        segments.push("↑↓ select · Tab/1-3 switch · ? about · q quit".to_string());
    }
    if queued > 0 {
        segments.push(format!("dialogs waiting: {queued}"));
    }
    if app.is_scroll_locked() {
        segments.push("scroll locked".to_string());
    } else if app.scroll_from_bottom > 0 {
        segments.push(format!("scrolled: {}", app.scroll_from_bottom));
    }
    Line::from(Span::styled(
        truncate_to_width(&segments.join(" | "), width),
        dim(),
    ))
}
