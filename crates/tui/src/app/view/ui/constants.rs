use ratatui::style::Color;

pub(super) const INPUT_BG: Color = Color::Rgb(40, 40, 40);
pub(super) const SELECTED_BG: Color = Color::Rgb(48, 56, 70);
pub(super) const DIALOG_MAX_WIDTH: u16 = 64;
pub(super) const DIALOG_MARGIN: u16 = 2;
pub(super) const DIALOG_PADDING_X: u16 = 2;
pub(super) const BUTTON_GAP: u16 = 2;
pub(super) const LOG_HEIGHT: u16 = 8;
pub(super) const PASSWORD_MASK: char = '•';
