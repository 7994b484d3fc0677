use crate::config::RuntimeCommand;
use serde_json::{json, Value};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{debug, warn};

pub type RuntimeStdin = BufWriter<ChildStdin>;

pub(crate) fn split_args(value: &str) -> Vec<String> {
    match shell_words::split(value) {
        Ok(parts) => parts.into_iter().filter(|part| !part.is_empty()).collect(),
        Err(error) => {
            warn!(%error, "runtime args parse warning; falling back to whitespace split");
            value
                .split_whitespace()
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect()
        }
    }
}

fn json_line(value: Value) -> String {
    value.to_string() + "\n"
}

fn spawn_reader<T: io::Read + Send + 'static>(
    reader: T,
    prefix: Option<&'static str>,
    tx: mpsc::Sender<String>,
) {
    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim_end();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let output = match prefix {
                        Some(tag) if !trimmed.starts_with(tag) => format!("{tag} {trimmed}"),
                        _ => trimmed.to_string(),
                    };
                    if tx.send(output).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

/// A running runtime process and its line-oriented pipes.
pub struct RuntimeProcess {
    pub child: Child,
    pub stdin: RuntimeStdin,
    pub lines: Receiver<String>,
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, format!("runtime {name} missing"))
}

pub fn spawn_runtime(command: &RuntimeCommand) -> io::Result<RuntimeProcess> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdin = BufWriter::new(child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?);
    let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;
    let (tx, lines) = mpsc::channel::<String>();
    spawn_reader(stdout, None, tx.clone());
    spawn_reader(stderr, Some("[runtime]"), tx);
    debug!(program = %command.program, args = ?command.args, "runtime spawned");

    Ok(RuntimeProcess {
        child,
        stdin,
        lines,
    })
}

/// Reply to a dialog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    Flag(bool),
    Text(Option<String>),
    Error { code: i64, message: String },
}

pub fn dialog_response_message(id: &Value, response: &DialogResponse) -> Value {
    match response {
        DialogResponse::Flag(ok) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": { "ok": ok }
        }),
        DialogResponse::Text(value) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": { "value": value }
        }),
        DialogResponse::Error { code, message } => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    }
}

pub fn send_dialog_response<W: Write>(
    writer: &mut W,
    id: &Value,
    response: &DialogResponse,
) -> io::Result<()> {
    writer.write_all(json_line(dialog_response_message(id, response)).as_bytes())?;
    writer.flush()?;
    Ok(())
}
