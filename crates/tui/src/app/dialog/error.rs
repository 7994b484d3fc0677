use thiserror::Error;

use super::descriptor::DialogId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("dialog coordinator unavailable: no renderer is mounted")]
    Unavailable,

    #[error("dialog {id} was superseded by dialog {by}")]
    Superseded { id: DialogId, by: DialogId },

    #[error("invalid dialog request: {0}")]
    InvalidRequest(String),

    #[error("dialog {0} was dropped before it settled")]
    Dropped(DialogId),
}

impl DialogError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    /// JSON-RPC error code used when the failure is reported to the runtime.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::InvalidRequest(_) => -32602,
            _ => -32000,
        }
    }
}
