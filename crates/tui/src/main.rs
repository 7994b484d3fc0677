use academvault_tui::app::dialog::DialogCoordinator;
use academvault_tui::app::handlers::{
    apply_vault_action, handle_dialog_key, handle_dialog_mouse, handle_dialog_paste,
    handle_vault_key, VaultAction, VaultCommands,
};
use academvault_tui::app::runtime::{
    send_dialog_response, spawn_runtime, RuntimeBridge, RuntimeProcess, RuntimeReply,
};
use academvault_tui::app::state::{LogKind, Vault};
use academvault_tui::app::view::draw_ui;
use academvault_tui::app::AppState;
use academvault_tui::config::Config;
use academvault_tui::logging::init_logging;
use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::executor::LocalPool;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::sync::mpsc::TryRecvError;
use tracing::{debug, info, warn};

const MAX_RUNTIME_LINES_PER_TICK: usize = 256;
const MOUSE_SCROLL_LINES: usize = 3;

struct TerminalRestoreGuard;

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableBracketedPaste);
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

fn drain_vault_actions(app: &mut AppState, actions: &mut UnboundedReceiver<VaultAction>) -> bool {
    let mut changed = false;
    while let Ok(Some(action)) = actions.try_next() {
        apply_vault_action(app, action);
        changed = true;
    }
    changed
}

/// Returns (redraw, runtime output closed).
fn process_runtime_lines(
    app: &mut AppState,
    bridge: &RuntimeBridge,
    process: &RuntimeProcess,
) -> (bool, bool) {
    let mut changed = false;
    for _ in 0..MAX_RUNTIME_LINES_PER_TICK {
        match process.lines.try_recv() {
            Ok(line) => {
                if let Some(log) = bridge.handle_line(&line) {
                    app.push_line(log.kind, log.text);
                }
                changed = true;
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return (changed, true),
        }
    }
    (changed, false)
}

fn flush_runtime_replies(
    app: &mut AppState,
    runtime: Option<&mut RuntimeProcess>,
    replies: &mut UnboundedReceiver<RuntimeReply>,
) -> bool {
    let mut changed = false;
    let mut runtime = runtime;
    while let Ok(Some((id, response))) = replies.try_next() {
        let Some(process) = runtime.as_mut() else {
            debug!(%id, "runtime gone; reply dropped");
            continue;
        };
        if let Err(error) = send_dialog_response(&mut process.stdin, &id, &response) {
            app.push_error_report("runtime reply error", error.to_string());
            changed = true;
        }
    }
    changed
}

fn shut_down_runtime(mut process: RuntimeProcess) {
    let _ = process.child.kill();
    let _ = process.child.wait();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(config.log_file.as_deref())?;
    let mut runtime = match config.runtime.as_ref() {
        Some(command) => Some(spawn_runtime(command)?),
        None => None,
    };

    let mut pool = LocalPool::new();
    let coordinator = DialogCoordinator::new(config.dialog_policy);
    let (action_tx, mut action_rx) = mpsc::unbounded();
    let (reply_tx, mut reply_rx) = mpsc::unbounded();
    let commands = VaultCommands::new(coordinator.clone(), pool.spawner(), action_tx);
    let bridge = RuntimeBridge::new(coordinator.clone(), pool.spawner(), reply_tx);

    let mut stdout = std::io::stdout();
    let _restore_guard = TerminalRestoreGuard;
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    // Multi-line paste arrives as Event::Paste instead of a stream of keys.
    let _ = stdout.execute(EnableBracketedPaste);
    let _ = stdout.execute(EnableMouseCapture);
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = AppState::new(Vault::sample());
    app.push_line(
        LogKind::System,
        "AcademVault ready. ? about, q quit, Tab or 1-3 switch lists.",
    );
    if let Some(command) = config.runtime.as_ref() {
        app.push_line(LogKind::Runtime, format!("runtime started: {}", command.program));
    }
    if config.key_debug {
        app.push_line(LogKind::Status, "Key debug logging enabled");
    }

    let mount = coordinator.mount();
    info!(policy = ?coordinator.policy(), "dialog renderer ready");
    let mut needs_redraw = true;

    loop {
        pool.run_until_stalled();
        if drain_vault_actions(&mut app, &mut action_rx) {
            needs_redraw = true;
        }

        let mut runtime_closed = false;
        if let Some(process) = runtime.as_mut() {
            let (changed, closed) = process_runtime_lines(&mut app, &bridge, process);
            needs_redraw |= changed;
            runtime_closed = closed;
            if let Ok(Some(status)) = process.child.try_wait() {
                app.push_line(LogKind::Runtime, format!("runtime exited: {status}"));
                runtime_closed = true;
            }
        }
        // Requests forwarded above may already have replies waiting.
        pool.run_until_stalled();
        if flush_runtime_replies(&mut app, runtime.as_mut(), &mut reply_rx) {
            needs_redraw = true;
        }
        if runtime_closed {
            warn!("runtime output closed");
            if let Some(process) = runtime.take() {
                shut_down_runtime(process);
            }
            let withdrawn = bridge.withdraw_all();
            if withdrawn > 0 {
                app.push_line(
                    LogKind::Runtime,
                    format!("runtime gone; closed {withdrawn} of its dialogs"),
                );
            }
            needs_redraw = true;
        }

        if app.sync_dialog(&coordinator) {
            needs_redraw = true;
        }
        if app.should_exit {
            break;
        }

        if needs_redraw {
            let queued = coordinator.queued_len();
            terminal.draw(|f| draw_ui(f, &mut app, queued))?;
            needs_redraw = false;
        }

        if !event::poll(config.tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if config.key_debug {
                    info!(code = ?key.code, modifiers = ?key.modifiers, "key");
                }
                if let Some(redraw) =
                    handle_dialog_key(&mut app, &coordinator, key.code, key.modifiers)
                {
                    needs_redraw |= redraw;
                } else if handle_vault_key(&mut app, &commands, key.code, key.modifiers) {
                    needs_redraw = true;
                }
            }
            Event::Paste(text) => {
                if let Some(redraw) = handle_dialog_paste(&mut app, &text) {
                    needs_redraw |= redraw;
                }
            }
            Event::Mouse(mouse) => {
                if let Some(redraw) = handle_dialog_mouse(&mut app, &coordinator, mouse) {
                    needs_redraw |= redraw;
                } else {
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_LINES),
                        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_LINES),
                        _ => continue,
                    }
                    needs_redraw = true;
                }
            }
            Event::Resize(_, _) => needs_redraw = true,
            _ => {}
        }
    }

    // Unmounting rejects whatever is still open or queued; tell the runtime.
    drop(mount);
    pool.run_until_stalled();
    flush_runtime_replies(&mut app, runtime.as_mut(), &mut reply_rx);
    if let Some(process) = runtime {
        shut_down_runtime(process);
    }
    Ok(())
}
