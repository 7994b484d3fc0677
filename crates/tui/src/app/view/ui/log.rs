use crate::app::state::LogLine;
use crate::app::util::text::wrap_line;
use crate::app::AppState;
use ratatui::text::{Line, Span};

use super::style::style_for_kind;

fn wrap_log_lines(lines: &[LogLine], width: usize) -> Vec<LogLine> {
    let mut out = Vec::new();
    for line in lines {
        if line.plain_text().is_empty() {
            out.push(line.clone());
            continue;
        }
        out.extend(
            wrap_line(line.plain_text(), width)
                .into_iter()
                .map(|wrapped| LogLine::new(line.kind, wrapped)),
        );
    }
    out
}

/// Visible slice of the wrapped log, `scroll_from_bottom` rows up from the end.
pub(super) fn visible_log_lines(app: &mut AppState, height: usize, width: usize) -> Vec<Line<'static>> {
    app.last_log_viewport_height = height;
    if height == 0 || width == 0 {
        return Vec::new();
    }
    let wrapped = wrap_log_lines(&app.log, width);
    let max_scroll = wrapped.len().saturating_sub(height);
    let scroll = app.scroll_from_bottom.min(max_scroll);
    let end = wrapped.len() - scroll;
    let start = end.saturating_sub(height);
    wrapped[start..end]
        .iter()
        .map(|line| Line::from(Span::styled(line.text.clone(), style_for_kind(line.kind))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::visible_log_lines;
    use crate::app::state::{LogKind, Vault};
    use crate::app::AppState;

    fn text(line: &ratatui::text::Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn window_follows_scroll_offset() {
        let mut app = AppState::new(Vault::sample());
        for idx in 0..6 {
            app.push_line(LogKind::Status, format!("event {idx}"));
        }
        let lines = visible_log_lines(&mut app, 3, 40);
        assert_eq!(text(&lines[2]), "event 5");
        assert_eq!(app.last_log_viewport_height, 3);

        app.scroll_up(2);
        let lines = visible_log_lines(&mut app, 3, 40);
        assert_eq!(text(&lines[0]), "event 1");
        assert_eq!(text(&lines[2]), "event 3");
    }

    #[test]
    fn long_lines_wrap_to_width() {
        let mut app = AppState::new(Vault::sample());
        app.push_line(LogKind::Error, "abcdefghij");
        let lines = visible_log_lines(&mut app, 5, 4);
        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[2]), "ij");
    }
}
