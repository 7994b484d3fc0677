use crate::app::state::{FriendStatus, VaultTab};
use crate::app::util::text::truncate_to_width;
use crate::app::AppState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::constants::SELECTED_BG;
use super::style::dim;

pub(super) struct ListView {
    pub header: String,
    pub rows: Vec<String>,
    pub selected: Option<usize>,
}

pub(super) fn build_list_view(app: &AppState) -> ListView {
    let (header, rows): (&str, Vec<String>) = match app.tab {
        VaultTab::Documents => (
            "d delete · r rename · t tag · Enter details",
            app.vault
                .documents
                .iter()
                .map(|doc| {
                    let tags = doc
                        .tags
                        .iter()
                        .map(|tag| format!("#{tag}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("{} ({}) {}", doc.title, doc.year, tags)
                        .trim_end()
                        .to_string()
                })
                .collect(),
        ),
        VaultTab::Discussions => (
            "l leave",
            app.vault
                .discussions
                .iter()
                .map(|thread| format!("{} · {} members", thread.title, thread.members))
                .collect(),
        ),
        VaultTab::Friends => (
            "Enter review request · x decline",
            app.vault
                .friends
                .iter()
                .map(|friend| {
                    let status = match friend.status {
                        FriendStatus::Accepted => "connected",
                        FriendStatus::Pending => "pending",
                    };
                    format!("{} · {} [{status}]", friend.name, friend.affiliation)
                })
                .collect(),
        ),
    };
    let selected = (!rows.is_empty()).then(|| app.selected.min(rows.len() - 1));
    ListView {
        header: header.to_string(),
        rows,
        selected,
    }
}

pub(super) fn build_tab_line(app: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " AcademVault ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for (idx, tab) in VaultTab::ALL.iter().enumerate() {
        let label = format!(" {} {} ({}) ", idx + 1, tab.label(), app.vault.len(*tab));
        let style = if *tab == app.tab {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            dim()
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

/// Rows that fit in `height`, scrolled so the selection stays visible.
pub(super) fn build_list_lines(view: &ListView, height: usize, width: usize) -> Vec<Line<'static>> {
    if height == 0 {
        return Vec::new();
    }
    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&view.header, width),
        dim(),
    ))];
    let capacity = height.saturating_sub(1);
    if view.rows.is_empty() {
        if capacity > 0 {
            lines.push(Line::from(Span::styled("  (empty)", dim())));
        }
        return lines;
    }
    let selected = view.selected.unwrap_or(0);
    let start = (selected + 1).saturating_sub(capacity);
    for (idx, row) in view.rows.iter().enumerate().skip(start).take(capacity) {
        let is_selected = view.selected == Some(idx);
        let marker = if is_selected { "> " } else { "  " };
        let text = truncate_to_width(&format!("{marker}{row}"), width);
        let style = if is_selected {
            Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines
}
