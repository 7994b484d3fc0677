mod constants;
mod dialog;
mod lists;
mod log;
mod status;
mod style;

use crate::app::AppState;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use self::constants::LOG_HEIGHT;
use self::dialog::{build_dialog_view, render_dialog};
use self::lists::{build_list_lines, build_list_view, build_tab_line};
use self::log::visible_log_lines;
use self::status::build_status_line;
use self::style::dim;

/// Draws the vault screen, then the open dialog on top. `queued` is the number
/// of dialogs waiting behind the open one.
pub fn draw_ui(f: &mut Frame<'_>, app: &mut AppState, queued: usize) {
    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }
    f.render_widget(Clear, size);

    let log_height = LOG_HEIGHT.min(size.height.saturating_sub(3) / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(log_height),
            Constraint::Length(1),
        ])
        .split(size);
    let (tabs_area, list_area, log_area, status_area) = (chunks[0], chunks[1], chunks[2], chunks[3]);
    let width = size.width as usize;

    f.render_widget(Paragraph::new(build_tab_line(app)), tabs_area);

    let list = build_list_view(app);
    f.render_widget(
        Paragraph::new(build_list_lines(&list, list_area.height as usize, width)),
        list_area,
    );

    let log_block = Block::default()
        .borders(Borders::TOP)
        .border_style(dim())
        .title(" Activity ");
    let log_inner = log_block.inner(log_area);
    f.render_widget(log_block, log_area);
    let log_lines = visible_log_lines(app, log_inner.height as usize, log_inner.width as usize);
    f.render_widget(Paragraph::new(log_lines), log_inner);

    f.render_widget(
        Paragraph::new(build_status_line(app, queued, width)),
        status_area,
    );

    app.dialog.hit = None;
    if let Some(descriptor) = app.dialog.shown.as_ref() {
        let view = build_dialog_view(descriptor, &app.dialog);
        let hit = render_dialog(f, size, &view);
        app.dialog.hit = Some(hit);
    }
}

#[cfg(test)]
mod tests {
    use super::draw_ui;
    use crate::app::dialog::{ConfirmRequest, DialogCoordinator};
    use crate::app::state::{LogKind, Vault};
    use crate::app::AppState;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_vault_and_records_dialog_hit_areas() {
        let coordinator = DialogCoordinator::default();
        let _mount = coordinator.mount();
        let mut app = AppState::new(Vault::sample());
        app.push_line(LogKind::System, "vault loaded");
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| draw_ui(f, &mut app, 0)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Documents (3)"));
        assert!(text.contains("> Attention Is All You Need"));
        assert!(text.contains("vault loaded"));
        assert!(app.dialog.hit.is_none());

        let _leave = coordinator
            .confirm(ConfirmRequest::new("Leave Discussion", "Are you sure?").unwrap())
            .unwrap();
        app.sync_dialog(&coordinator);
        terminal.draw(|f| draw_ui(f, &mut app, 0)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Are you sure?"));
        assert!(text.contains("scroll locked"));
        assert!(app.dialog.hit.is_some());
    }
}
