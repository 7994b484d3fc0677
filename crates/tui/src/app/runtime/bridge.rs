use crate::app::dialog::{DialogCoordinator, DialogError, DialogId, DialogReply, DialogRequest};
use crate::app::state::LogLine;
use futures::channel::mpsc::UnboundedSender;
use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use super::client::DialogResponse;
use super::parser::{parse_runtime_line, RuntimeMessage, RuntimeParseError};

/// Reply waiting to be written to the runtime.
pub type RuntimeReply = (Value, DialogResponse);

impl From<&DialogError> for DialogResponse {
    fn from(error: &DialogError) -> Self {
        Self::Error {
            code: error.rpc_code(),
            message: error.to_string(),
        }
    }
}

impl From<&RuntimeParseError> for DialogResponse {
    fn from(error: &RuntimeParseError) -> Self {
        Self::Error {
            code: error.rpc_code(),
            message: error.to_string(),
        }
    }
}

/// Routes runtime dialog requests through the coordinator and queues the
/// answers for the runtime.
#[derive(Clone)]
pub struct RuntimeBridge {
    coordinator: DialogCoordinator,
    spawner: LocalSpawner,
    replies: UnboundedSender<RuntimeReply>,
    // Dialogs opened for the runtime and not yet answered.
    owned: Rc<RefCell<Vec<DialogId>>>,
}

impl RuntimeBridge {
    pub fn new(
        coordinator: DialogCoordinator,
        spawner: LocalSpawner,
        replies: UnboundedSender<RuntimeReply>,
    ) -> Self {
        Self {
            coordinator,
            spawner,
            replies,
            owned: Rc::default(),
        }
    }

    /// Dismisses every dialog the runtime still waits on. Used once the runtime
    /// is gone and nobody can read the answers.
    pub fn withdraw_all(&self) -> usize {
        let owned = std::mem::take(&mut *self.owned.borrow_mut());
        owned
            .into_iter()
            .filter(|id| self.coordinator.withdraw(*id))
            .count()
    }

    /// Handles one runtime output line; returns what should go to the log.
    pub fn handle_line(&self, raw: &str) -> Option<LogLine> {
        match parse_runtime_line(raw)? {
            RuntimeMessage::Dialog { id, request } => {
                self.forward(id, request);
                None
            }
            RuntimeMessage::Rejected { id, error } => {
                warn!(%id, %error, "runtime dialog request rejected");
                self.reply(id, DialogResponse::from(&error));
                None
            }
            RuntimeMessage::Log(line) => Some(line),
        }
    }

    fn reply(&self, id: Value, response: DialogResponse) {
        let _ = self.replies.unbounded_send((id, response));
    }

    fn forward(&self, id: Value, request: DialogRequest) {
        let reply = match self.coordinator.request(request) {
            Ok(reply) => reply,
            Err(error) => {
                self.reply(id, DialogResponse::from(&error));
                return;
            }
        };
        let dialog = reply.id();
        debug!(%id, %dialog, "runtime dialog opened");
        self.owned.borrow_mut().push(dialog);
        let owned = self.owned.clone();
        let replies = self.replies.clone();
        let task = async move {
            let settled = match reply {
                DialogReply::Flag(decision) => decision.await.map(DialogResponse::Flag),
                DialogReply::Text(value) => value.await.map(DialogResponse::Text),
            };
            owned.borrow_mut().retain(|open| *open != dialog);
            let response = settled.unwrap_or_else(|error| DialogResponse::from(&error));
            let _ = replies.unbounded_send((id, response));
        };
        if let Err(error) = self.spawner.spawn_local(task) {
            warn!(%error, "failed to spawn runtime dialog task");
        }
    }
}
