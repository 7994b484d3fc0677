mod bridge;
mod client;
mod parser;

pub use bridge::{RuntimeBridge, RuntimeReply};
pub(crate) use client::split_args;
pub use client::{
    dialog_response_message, send_dialog_response, spawn_runtime, DialogResponse,
    RuntimeProcess, RuntimeStdin,
};
pub use parser::{parse_runtime_line, RuntimeMessage, RuntimeParseError};
