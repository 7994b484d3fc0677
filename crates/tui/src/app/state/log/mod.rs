use crate::app::util::text::sanitize_for_tui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    System,
    Status,
    Dialog,
    Runtime,
    Space,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LogKind,
    pub text: String,
}

impl LogLine {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        let raw = text.into();
        Self {
            kind,
            text: sanitize_for_tui(&raw),
        }
    }

    pub fn plain_text(&self) -> &str {
        &self.text
    }
}
