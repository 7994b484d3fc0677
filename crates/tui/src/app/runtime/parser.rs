use crate::app::dialog::{
    AlertRequest, ConfirmRequest, CustomPayload, CustomRequest, DialogError, DialogRequest,
    DialogVariant, InputKind, InputSpec, PromptRequest,
};
use crate::app::state::{LogKind, LogLine};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const METHOD_ALERT: &str = "ui.alert.request";
pub const METHOD_CONFIRM: &str = "ui.confirm.request";
pub const METHOD_PROMPT: &str = "ui.prompt.request";
pub const METHOD_CUSTOM: &str = "ui.custom.request";

const RUNTIME_TAG: &str = "[runtime]";

#[derive(Debug, Error)]
pub enum RuntimeParseError {
    #[error("invalid params: {0}")]
    Params(#[from] serde_json::Error),

    #[error(transparent)]
    Request(#[from] DialogError),
}

impl RuntimeParseError {
    /// JSON-RPC code reported back to the runtime.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::Request(error) => error.rpc_code(),
            _ => -32602,
        }
    }
}

#[derive(Debug)]
pub enum RuntimeMessage {
    /// A dialog request the runtime is waiting on.
    Dialog { id: Value, request: DialogRequest },
    /// A dialog request that could not be built; the runtime still needs a reply.
    Rejected { id: Value, error: RuntimeParseError },
    Log(LogLine),
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DialogParams {
    title: String,
    message: String,
    confirm_label: Option<String>,
    cancel_label: Option<String>,
    variant: Option<String>,
    input: Option<InputParams>,
    lines: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InputParams {
    placeholder: Option<String>,
    kind: Option<String>,
    initial_value: Option<String>,
}

fn is_dialog_method(method: &str) -> bool {
    matches!(
        method,
        METHOD_ALERT | METHOD_CONFIRM | METHOD_PROMPT | METHOD_CUSTOM
    )
}

fn parse_variant(value: Option<&str>) -> Result<DialogVariant, RuntimeParseError> {
    Ok(value
        .map(str::parse::<DialogVariant>)
        .transpose()?
        .unwrap_or_default())
}

fn parse_input(params: Option<InputParams>) -> Result<InputSpec, RuntimeParseError> {
    let Some(params) = params else {
        return Ok(InputSpec::default());
    };
    let kind = params
        .kind
        .as_deref()
        .map(str::parse::<InputKind>)
        .transpose()?
        .unwrap_or_default();
    Ok(InputSpec {
        placeholder: params.placeholder,
        kind,
        initial_value: params.initial_value,
    })
}

fn build_request(method: &str, params: Value) -> Result<DialogRequest, RuntimeParseError> {
    let params: DialogParams = if params.is_null() {
        DialogParams::default()
    } else {
        serde_json::from_value(params)?
    };
    let variant = parse_variant(params.variant.as_deref())?;
    let confirm_label = params.confirm_label.unwrap_or_default();
    let cancel_label = params.cancel_label.unwrap_or_default();

    let request = match method {
        METHOD_ALERT => AlertRequest::new(params.title, params.message)?
            .with_confirm_label(confirm_label)
            .with_variant(variant)
            .into(),
        METHOD_CONFIRM => ConfirmRequest::new(params.title, params.message)?
            .with_confirm_label(confirm_label)
            .with_cancel_label(cancel_label)
            .with_variant(variant)
            .into(),
        METHOD_PROMPT => PromptRequest::new(params.title, params.message)?
            .with_confirm_label(confirm_label)
            .with_cancel_label(cancel_label)
            .with_variant(variant)
            .with_input(parse_input(params.input)?)
            .into(),
        _ => CustomRequest::new(params.title, CustomPayload::new(params.lines))?
            .with_message(params.message)
            .with_confirm_label(confirm_label)
            .with_cancel_label(cancel_label)
            .with_variant(variant)
            .into(),
    };
    Ok(request)
}

fn parse_runtime_log_line(line: &str) -> LogLine {
    let Some(rest) = line.strip_prefix(RUNTIME_TAG) else {
        return LogLine::new(LogKind::Runtime, line);
    };
    let rest = rest.trim_start();
    if rest.starts_with("Error") || rest.starts_with("error") {
        LogLine::new(LogKind::Error, rest)
    } else {
        LogLine::new(LogKind::Runtime, line)
    }
}

/// Classifies one line of runtime output.
pub fn parse_runtime_line(raw: &str) -> Option<RuntimeMessage> {
    let trimmed = raw.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(envelope) = serde_json::from_str::<RpcEnvelope>(trimmed) else {
        return Some(RuntimeMessage::Log(parse_runtime_log_line(trimmed)));
    };
    let (Some(id), Some(method)) = (envelope.id, envelope.method) else {
        return Some(RuntimeMessage::Log(LogLine::new(LogKind::Runtime, trimmed)));
    };
    if !is_dialog_method(&method) {
        return Some(RuntimeMessage::Log(LogLine::new(
            LogKind::Runtime,
            format!("unhandled request {method}"),
        )));
    }
    Some(match build_request(&method, envelope.params) {
        Ok(request) => RuntimeMessage::Dialog { id, request },
        Err(error) => RuntimeMessage::Rejected { id, error },
    })
}
