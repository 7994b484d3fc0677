use crate::app::dialog::DialogVariant;
use crate::app::state::LogKind;
use ratatui::style::{Color, Modifier, Style};

pub(super) fn style_for_kind(kind: LogKind) -> Style {
    match kind {
        LogKind::System => Style::default().fg(Color::Cyan),
        LogKind::Status => Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        LogKind::Dialog => Style::default().fg(Color::LightBlue),
        LogKind::Runtime => Style::default().fg(Color::DarkGray),
        LogKind::Space => Style::default().fg(Color::White),
        LogKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

pub(super) fn variant_accent(variant: DialogVariant) -> Color {
    match variant {
        DialogVariant::Default => Color::Cyan,
        DialogVariant::Success => Color::Green,
        DialogVariant::Warning => Color::Yellow,
        DialogVariant::Danger => Color::Red,
    }
}

pub(super) fn variant_icon(variant: DialogVariant) -> &'static str {
    match variant {
        DialogVariant::Default => "i",
        DialogVariant::Success => "✓",
        DialogVariant::Warning => "!",
        DialogVariant::Danger => "✗",
    }
}

pub(super) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}
