use crate::app::dialog::{DialogDescriptor, DialogKind};
use crate::app::state::{DialogFocus, DialogHitAreas, DialogUiState};
use crate::app::util::text::{tail_to_width, truncate_to_width, visual_width, wrap_line};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::constants::{
    BUTTON_GAP, DIALOG_MARGIN, DIALOG_MAX_WIDTH, DIALOG_PADDING_X, INPUT_BG, PASSWORD_MASK,
};
use super::style::{dim, variant_accent, variant_icon};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DialogInputView {
    pub text: String,
    /// Characters before the cursor.
    pub cursor: usize,
    pub is_hint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DialogView {
    pub title: String,
    pub icon: &'static str,
    pub accent: Color,
    pub body: Vec<String>,
    pub input: Option<DialogInputView>,
    pub confirm_label: String,
    pub cancel_label: Option<String>,
    pub focus: DialogFocus,
}

pub(super) fn build_dialog_view(descriptor: &DialogDescriptor, ui: &DialogUiState) -> DialogView {
    let mut body: Vec<String> = descriptor.message.lines().map(str::to_string).collect();
    if let Some(payload) = descriptor.payload.as_ref() {
        if !body.is_empty() {
            body.push(String::new());
        }
        body.extend(payload.lines().iter().cloned());
    }

    let input = (descriptor.kind == DialogKind::Prompt).then(|| {
        let spec = descriptor.input.clone().unwrap_or_default();
        if ui.input.is_empty() {
            return DialogInputView {
                text: spec.hint().unwrap_or_default().to_string(),
                cursor: 0,
                is_hint: true,
            };
        }
        let shown = if spec.kind.is_masked() {
            ui.input.masked_clone(PASSWORD_MASK)
        } else {
            ui.input.clone()
        };
        DialogInputView {
            text: shown.current(),
            cursor: shown.cursor,
            is_hint: false,
        }
    });

    let focus = if descriptor.cancel_label.is_some() {
        ui.focus
    } else {
        DialogFocus::Confirm
    };

    DialogView {
        title: descriptor.title.clone(),
        icon: variant_icon(descriptor.variant),
        accent: variant_accent(descriptor.variant),
        body,
        input,
        confirm_label: descriptor.confirm_label.clone(),
        cancel_label: descriptor.cancel_label.clone(),
        focus,
    }
}

fn button_label(label: &str) -> String {
    format!("[ {label} ]")
}

fn content_width(dialog_width: u16) -> usize {
    dialog_width.saturating_sub(2 + DIALOG_PADDING_X * 2).max(1) as usize
}

/// Centered box sized to the wrapped body, clamped to the screen.
pub(super) fn dialog_area(screen: Rect, view: &DialogView) -> Rect {
    let width = screen
        .width
        .saturating_sub(DIALOG_MARGIN * 2)
        .min(DIALOG_MAX_WIDTH)
        .max(screen.width.min(12));
    let inner_width = content_width(width);
    let body_rows: usize = view
        .body
        .iter()
        .map(|line| wrap_line(line, inner_width).len())
        .sum();
    let input_rows = if view.input.is_some() { 2 } else { 0 };
    let height = u16::try_from(body_rows + input_rows + 2 + 2)
        .unwrap_or(u16::MAX)
        .min(screen.height);
    Rect {
        x: screen.x + screen.width.saturating_sub(width) / 2,
        y: screen.y + screen.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn button_style(accent: Color, focused: bool, primary: bool) -> Style {
    match (focused, primary) {
        (true, _) => Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().fg(accent),
        (false, false) => Style::default().fg(Color::Gray),
    }
}

fn render_input(f: &mut Frame<'_>, area: Rect, input: &DialogInputView) {
    let width = area.width as usize;
    let (line, cursor_x) = if input.is_hint {
        let hint = Span::styled(
            truncate_to_width(&input.text, width),
            dim().add_modifier(Modifier::ITALIC),
        );
        (Line::from(hint), 0)
    } else {
        let split = input
            .text
            .char_indices()
            .nth(input.cursor)
            .map_or(input.text.len(), |(idx, _)| idx);
        let (before, after) = input.text.split_at(split);
        let shown_before = tail_to_width(before, width.saturating_sub(1));
        let cursor_x = visual_width(&shown_before);
        let rest = width.saturating_sub(cursor_x);
        let line = Line::from(vec![
            Span::raw(shown_before),
            Span::raw(truncate_to_width(after, rest)),
        ]);
        (line, cursor_x)
    };
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(INPUT_BG)),
        area,
    );
    f.set_cursor_position(Position::new(area.x + cursor_x as u16, area.y));
}

/// Draws the dialog over `screen` and returns where its parts landed.
pub(super) fn render_dialog(f: &mut Frame<'_>, screen: Rect, view: &DialogView) -> DialogHitAreas {
    let area = dialog_area(screen, view);
    f.render_widget(Clear, area);

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", view.icon),
            Style::default()
                .fg(view.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", view.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(view.accent))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let content = Rect {
        x: inner.x + DIALOG_PADDING_X.min(inner.width / 2),
        width: inner.width.saturating_sub(DIALOG_PADDING_X * 2).max(1),
        ..inner
    };
    let reserved = if view.input.is_some() { 4 } else { 2 };
    let body_height = content.height.saturating_sub(reserved);
    let body_lines: Vec<Line> = view
        .body
        .iter()
        .flat_map(|line| wrap_line(line, content.width as usize))
        .take(body_height as usize)
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(body_lines),
        Rect {
            height: body_height,
            ..content
        },
    );

    let buttons_y = content.bottom().saturating_sub(1);
    if let Some(input) = view.input.as_ref() {
        let input_area = Rect {
            y: buttons_y.saturating_sub(2),
            height: 1,
            ..content
        };
        render_input(f, input_area, input);
    }

    let confirm_text = button_label(&view.confirm_label);
    let confirm_width = (visual_width(&confirm_text) as u16).min(content.width);
    let confirm = Rect {
        x: content.right().saturating_sub(confirm_width),
        y: buttons_y,
        width: confirm_width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            confirm_text,
            button_style(view.accent, view.focus == DialogFocus::Confirm, true),
        )),
        confirm,
    );

    let cancel = view.cancel_label.as_ref().map(|label| {
        let text = button_label(label);
        let width = (visual_width(&text) as u16).min(confirm.x.saturating_sub(content.x));
        let rect = Rect {
            x: confirm.x.saturating_sub(BUTTON_GAP + width).max(content.x),
            y: buttons_y,
            width,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                text,
                button_style(view.accent, view.focus == DialogFocus::Cancel, false),
            )),
            rect,
        );
        rect
    });

    DialogHitAreas {
        dialog: area,
        confirm,
        cancel,
    }
}
