use crate::app::dialog::SupersedePolicy;
use crate::app::runtime::split_args;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const ENV_DIALOG_POLICY: &str = "ACADEMVAULT_DIALOG_POLICY";
pub const ENV_LOG_FILE: &str = "ACADEMVAULT_LOG_FILE";
pub const ENV_RUNTIME_CMD: &str = "ACADEMVAULT_RUNTIME_CMD";
pub const ENV_RUNTIME_ARGS: &str = "ACADEMVAULT_RUNTIME_ARGS";
pub const ENV_TICK_MS: &str = "ACADEMVAULT_TICK_MS";
pub const ENV_KEY_DEBUG: &str = "ACADEMVAULT_TUI_KEY_DEBUG";

const DEFAULT_TICK_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("{0} expects a value")]
    MissingValue(String),

    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCommand {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dialog_policy: SupersedePolicy,
    pub log_file: Option<PathBuf>,
    pub runtime: Option<RuntimeCommand>,
    pub tick: Duration,
    pub key_debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialog_policy: SupersedePolicy::default(),
            log_file: None,
            runtime: None,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            key_debug: false,
        }
    }
}

fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Reads the process environment and command line.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(|key| env::var(key).ok(), env::args().skip(1))
    }

    /// Environment first, then flags on top.
    pub fn from_sources<F, I, S>(lookup: F, args: I) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(lookup(ENV_DIALOG_POLICY)) {
            config.dialog_policy = value
                .parse()
                .map_err(|reason: String| invalid(ENV_DIALOG_POLICY, reason))?;
        }
        config.log_file = non_empty(lookup(ENV_LOG_FILE)).map(PathBuf::from);
        if let Some(value) = non_empty(lookup(ENV_TICK_MS)) {
            let millis: u64 = value
                .trim()
                .parse()
                .map_err(|error| invalid(ENV_TICK_MS, format!("{error}")))?;
            if millis == 0 {
                return Err(invalid(ENV_TICK_MS, "must be greater than zero"));
            }
            config.tick = Duration::from_millis(millis);
        }
        if let Some(value) = non_empty(lookup(ENV_KEY_DEBUG)) {
            config.key_debug = parse_bool_like(&value)
                .ok_or_else(|| invalid(ENV_KEY_DEBUG, format!("expected a boolean, got `{value}`")))?;
        }

        let runtime_args = non_empty(lookup(ENV_RUNTIME_ARGS));
        match non_empty(lookup(ENV_RUNTIME_CMD)) {
            Some(program) => {
                config.runtime = Some(RuntimeCommand {
                    program: program.trim().to_string(),
                    args: runtime_args.as_deref().map(split_args).unwrap_or_default(),
                });
            }
            None if runtime_args.is_some() => {
                return Err(invalid(
                    ENV_RUNTIME_ARGS,
                    format!("set {ENV_RUNTIME_CMD} as well"),
                ));
            }
            None => {}
        }

        config.apply_args(args)?;
        info!(
            policy = ?config.dialog_policy,
            runtime = config.runtime.is_some(),
            tick_ms = config.tick.as_millis() as u64,
            "config loaded"
        );
        Ok(config)
    }

    fn apply_args<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value.to_string())),
                None => (arg, None),
            };
            match flag {
                "--queue-dialogs" => {
                    let enabled = match inline {
                        Some(value) => parse_bool_like(&value).ok_or_else(|| {
                            invalid(flag, format!("expected a boolean, got `{value}`"))
                        })?,
                        None => true,
                    };
                    self.dialog_policy = if enabled {
                        SupersedePolicy::Queue
                    } else {
                        SupersedePolicy::RejectPending
                    };
                }
                "--key-debug" => self.key_debug = true,
                "--log-file" => {
                    let value = inline
                        .or_else(|| args.next().map(|next| next.as_ref().to_string()))
                        .and_then(|value| non_empty(Some(value)))
                        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
                    self.log_file = Some(PathBuf::from(value));
                }
                _ => return Err(ConfigError::UnknownArgument(arg.to_string())),
            }
        }
        Ok(())
    }
}
