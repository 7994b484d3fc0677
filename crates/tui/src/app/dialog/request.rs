use std::fmt;
use std::str::FromStr;

use super::error::DialogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogVariant {
    #[default]
    Default,
    Success,
    Warning,
    Danger,
}

impl DialogVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl FromStr for DialogVariant {
    type Err = DialogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "info" => Ok(Self::Default),
            "success" => Ok(Self::Success),
            "warning" | "warn" => Ok(Self::Warning),
            "danger" | "error" => Ok(Self::Danger),
            other => Err(DialogError::invalid(format!("unknown variant `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
    Custom,
}

impl DialogKind {
    /// Alerts only offer a single acknowledge action.
    pub fn has_cancel(self) -> bool {
        !matches!(self, Self::Alert)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Url,
    Number,
    Password,
}

impl InputKind {
    pub fn accepts(self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self {
            Self::Number => ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'),
            Self::Email | Self::Url => !ch.is_whitespace(),
            Self::Text | Self::Password => true,
        }
    }

    pub fn is_masked(self) -> bool {
        matches!(self, Self::Password)
    }
}

impl FromStr for InputKind {
    type Err = DialogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "url" => Ok(Self::Url),
            "number" => Ok(Self::Number),
            "password" | "secret" => Ok(Self::Password),
            other => Err(DialogError::invalid(format!("unknown input kind `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSpec {
    pub placeholder: Option<String>,
    pub kind: InputKind,
    /// Carried for display only; prompt input always opens empty.
    pub initial_value: Option<String>,
}

impl InputSpec {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Text shown in the empty input field.
    pub fn hint(&self) -> Option<&str> {
        self.placeholder
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                self.initial_value
                    .as_deref()
                    .filter(|value| !value.trim().is_empty())
            })
    }
}

/// Renderable body of a custom dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomPayload {
    lines: Vec<String>,
}

impl CustomPayload {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

pub type OnClose = Box<dyn FnOnce()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogText {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: Option<String>,
    pub variant: DialogVariant,
}

impl DialogText {
    fn new(
        title: String,
        message: String,
        confirm_label: &str,
        cancel_label: Option<&str>,
    ) -> Result<Self, DialogError> {
        if title.trim().is_empty() {
            return Err(DialogError::invalid("title must not be empty"));
        }
        Ok(Self {
            title,
            message,
            confirm_label: confirm_label.to_string(),
            cancel_label: cancel_label.map(str::to_string),
            variant: DialogVariant::Default,
        })
    }

    fn set_confirm_label(&mut self, label: String) {
        if !label.trim().is_empty() {
            self.confirm_label = label;
        }
    }

    fn set_cancel_label(&mut self, label: String) {
        if label.trim().is_empty() {
            return;
        }
        if let Some(cancel) = self.cancel_label.as_mut() {
            *cancel = label;
        }
    }
}

macro_rules! text_builders {
    ($ty:ty) => {
        impl $ty {
            /// Blank labels keep the default.
            pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
                self.text.set_confirm_label(label.into());
                self
            }

            pub fn with_variant(mut self, variant: DialogVariant) -> Self {
                self.text.variant = variant;
                self
            }

            pub fn text(&self) -> &DialogText {
                &self.text
            }
        }
    };
    ($ty:ty, cancel) => {
        text_builders!($ty);

        impl $ty {
            /// Blank labels keep the default.
            pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
                self.text.set_cancel_label(label.into());
                self
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRequest {
    text: DialogText,
}

impl AlertRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Result<Self, DialogError> {
        Ok(Self {
            text: DialogText::new(title.into(), message.into(), "OK", None)?,
        })
    }
}

text_builders!(AlertRequest);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    text: DialogText,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Result<Self, DialogError> {
        Ok(Self {
            text: DialogText::new(title.into(), message.into(), "Confirm", Some("Cancel"))?,
        })
    }
}

text_builders!(ConfirmRequest, cancel);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    text: DialogText,
    input: InputSpec,
}

impl PromptRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Result<Self, DialogError> {
        Ok(Self {
            text: DialogText::new(title.into(), message.into(), "Submit", Some("Cancel"))?,
            input: InputSpec::default(),
        })
    }

    pub fn with_input(mut self, input: InputSpec) -> Self {
        self.input = input;
        self
    }

    pub fn input(&self) -> &InputSpec {
        &self.input
    }
}

text_builders!(PromptRequest, cancel);

pub struct CustomRequest {
    text: DialogText,
    payload: CustomPayload,
    on_close: Option<OnClose>,
}

impl CustomRequest {
    pub fn new(title: impl Into<String>, payload: CustomPayload) -> Result<Self, DialogError> {
        if payload.is_empty() {
            return Err(DialogError::invalid("custom dialog payload must not be empty"));
        }
        Ok(Self {
            text: DialogText::new(title.into(), String::new(), "Confirm", Some("Cancel"))?,
            payload,
            on_close: None,
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.text.message = message.into();
        self
    }

    /// Runs when the dialog ends without being confirmed, including when it is
    /// replaced or the renderer goes away.
    pub fn on_close(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn payload(&self) -> &CustomPayload {
        &self.payload
    }
}

text_builders!(CustomRequest, cancel);

impl fmt::Debug for CustomRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRequest")
            .field("text", &self.text)
            .field("payload", &self.payload)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum DialogRequest {
    Alert(AlertRequest),
    Confirm(ConfirmRequest),
    Prompt(PromptRequest),
    Custom(CustomRequest),
}

pub(super) struct RequestParts {
    pub kind: DialogKind,
    pub text: DialogText,
    pub input: Option<InputSpec>,
    pub payload: Option<CustomPayload>,
    pub on_close: Option<OnClose>,
}

impl DialogRequest {
    pub fn kind(&self) -> DialogKind {
        match self {
            Self::Alert(_) => DialogKind::Alert,
            Self::Confirm(_) => DialogKind::Confirm,
            Self::Prompt(_) => DialogKind::Prompt,
            Self::Custom(_) => DialogKind::Custom,
        }
    }

    pub fn text(&self) -> &DialogText {
        match self {
            Self::Alert(request) => &request.text,
            Self::Confirm(request) => &request.text,
            Self::Prompt(request) => &request.text,
            Self::Custom(request) => &request.text,
        }
    }

    pub(super) fn into_parts(self) -> RequestParts {
        let kind = self.kind();
        match self {
            Self::Alert(AlertRequest { text }) | Self::Confirm(ConfirmRequest { text }) => {
                RequestParts {
                    kind,
                    text,
                    input: None,
                    payload: None,
                    on_close: None,
                }
            }
            Self::Prompt(PromptRequest { text, input }) => RequestParts {
                kind,
                text,
                input: Some(input),
                payload: None,
                on_close: None,
            },
            Self::Custom(CustomRequest {
                text,
                payload,
                on_close,
            }) => RequestParts {
                kind,
                text,
                input: None,
                payload: Some(payload),
                on_close,
            },
        }
    }
}

impl From<AlertRequest> for DialogRequest {
    fn from(request: AlertRequest) -> Self {
        Self::Alert(request)
    }
}

impl From<ConfirmRequest> for DialogRequest {
    fn from(request: ConfirmRequest) -> Self {
        Self::Confirm(request)
    }
}

impl From<PromptRequest> for DialogRequest {
    fn from(request: PromptRequest) -> Self {
        Self::Prompt(request)
    }
}

impl From<CustomRequest> for DialogRequest {
    fn from(request: CustomRequest) -> Self {
        Self::Custom(request)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AlertRequest, ConfirmRequest, CustomPayload, CustomRequest, DialogKind, DialogRequest,
        DialogVariant, InputKind, InputSpec, PromptRequest,
    };
    use crate::app::dialog::DialogError;

    #[test]
    fn alert_defaults_to_ok_without_cancel() {
        let alert = AlertRequest::new("Saved", "Document stored").unwrap();
        assert_eq!(alert.text().confirm_label, "OK");
        assert_eq!(alert.text().cancel_label, None);
        assert_eq!(alert.text().variant, DialogVariant::Default);
    }

    #[test]
    fn blank_title_is_rejected_at_construction() {
        let error = ConfirmRequest::new("   ", "Are you sure?").unwrap_err();
        assert!(matches!(error, DialogError::InvalidRequest(_)));
    }

    #[test]
    fn blank_labels_keep_defaults() {
        let confirm = ConfirmRequest::new("Leave Discussion", "Are you sure?")
            .unwrap()
            .with_confirm_label("Leave")
            .with_cancel_label("  ");
        assert_eq!(confirm.text().confirm_label, "Leave");
        assert_eq!(confirm.text().cancel_label.as_deref(), Some("Cancel"));
    }

    #[test]
    fn custom_requires_payload() {
        let error = CustomRequest::new("Friend request", CustomPayload::new(["", " "])).unwrap_err();
        assert!(matches!(error, DialogError::InvalidRequest(_)));
    }

    #[test]
    fn variant_parses_aliases() {
        assert_eq!("danger".parse::<DialogVariant>().unwrap(), DialogVariant::Danger);
        assert_eq!("Warn".parse::<DialogVariant>().unwrap(), DialogVariant::Warning);
        assert_eq!("".parse::<DialogVariant>().unwrap(), DialogVariant::Default);
        assert!("loud".parse::<DialogVariant>().is_err());
    }

    #[test]
    fn number_input_filters_letters() {
        assert!(InputKind::Number.accepts('4'));
        assert!(!InputKind::Number.accepts('a'));
        assert!(!InputKind::Email.accepts(' '));
        assert!(InputKind::Text.accepts(' '));
    }

    #[test]
    fn hint_prefers_placeholder_then_initial_value() {
        let spec = InputSpec::default().with_initial_value("draft.pdf");
        assert_eq!(spec.hint(), Some("draft.pdf"));
        let spec = spec.with_placeholder("File name");
        assert_eq!(spec.hint(), Some("File name"));
    }

    #[test]
    fn request_conversions_keep_kind() {
        let prompt: DialogRequest = PromptRequest::new("Rename", "").unwrap().into();
        assert_eq!(prompt.kind(), DialogKind::Prompt);
        let custom: DialogRequest = CustomRequest::new("Profile", CustomPayload::from_text("Ada"))
            .unwrap()
            .into();
        assert_eq!(custom.kind(), DialogKind::Custom);
    }
}
