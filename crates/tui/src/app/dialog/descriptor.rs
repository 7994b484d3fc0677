use std::fmt;

use futures::channel::oneshot;

use super::error::DialogError;
use super::request::{CustomPayload, DialogKind, DialogVariant, InputSpec, OnClose, RequestParts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the renderer sees of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogDescriptor {
    pub id: DialogId,
    pub kind: DialogKind,
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: Option<String>,
    pub variant: DialogVariant,
    pub input: Option<InputSpec>,
    pub payload: Option<CustomPayload>,
}

pub(super) type FlagResult = Result<bool, DialogError>;
pub(super) type TextResult = Result<Option<String>, DialogError>;

pub(super) enum Sender {
    Flag(oneshot::Sender<FlagResult>),
    Text(oneshot::Sender<TextResult>),
}

/// Settle-once half of a dialog's deferred result.
pub(super) struct Responder {
    id: DialogId,
    kind: DialogKind,
    sender: Sender,
    on_close: Option<OnClose>,
}

impl Responder {
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Confirm action. Prompt input is trimmed.
    pub fn resolve(self, input: Option<String>) {
        match self.sender {
            Sender::Flag(tx) => {
                let _ = tx.send(Ok(true));
            }
            Sender::Text(tx) => {
                let value = input.unwrap_or_default().trim().to_string();
                let _ = tx.send(Ok(Some(value)));
            }
        }
    }

    /// Cancel, Esc or backdrop. Runs `on_close`.
    pub fn dismiss(self) {
        match self.sender {
            Sender::Flag(tx) => {
                let _ = tx.send(Ok(self.kind == DialogKind::Alert));
            }
            Sender::Text(tx) => {
                let _ = tx.send(Ok(None));
            }
        }
        if let Some(on_close) = self.on_close {
            on_close();
        }
    }

    /// Settles with `error`. A dialog closed this way was not confirmed, so
    /// `on_close` runs as well.
    pub fn reject(self, error: DialogError) {
        match self.sender {
            Sender::Flag(tx) => {
                let _ = tx.send(Err(error));
            }
            Sender::Text(tx) => {
                let _ = tx.send(Err(error));
            }
        }
        if let Some(on_close) = self.on_close {
            on_close();
        }
    }
}

pub(super) fn build(
    id: DialogId,
    parts: RequestParts,
    sender: Sender,
) -> (DialogDescriptor, Responder) {
    let descriptor = DialogDescriptor {
        id,
        kind: parts.kind,
        is_open: true,
        title: parts.text.title,
        message: parts.text.message,
        confirm_label: parts.text.confirm_label,
        cancel_label: parts.text.cancel_label,
        variant: parts.text.variant,
        input: parts.input,
        payload: parts.payload,
    };
    let responder = Responder {
        id,
        kind: parts.kind,
        sender,
        on_close: parts.on_close,
    };
    (descriptor, responder)
}
