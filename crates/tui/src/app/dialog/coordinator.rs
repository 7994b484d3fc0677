use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::str::FromStr;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::FutureExt;
use tracing::{debug, warn};

use super::descriptor::{build, DialogDescriptor, DialogId, Responder, Sender};
use super::error::DialogError;
use super::request::{AlertRequest, ConfirmRequest, CustomRequest, DialogRequest, PromptRequest};
use super::slot::{DialogSlot, Entry};

/// What happens to an open dialog when another request arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupersedePolicy {
    /// The new dialog replaces the open one, whose caller gets `DialogError::Superseded`.
    #[default]
    RejectPending,
    /// The new dialog waits until the open one settles.
    Queue,
}

impl FromStr for SupersedePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" | "replace" => Ok(Self::RejectPending),
            "queue" => Ok(Self::Queue),
            other => Err(format!("expected `reject` or `queue`, got `{other}`")),
        }
    }
}

/// Deferred result of a dialog request.
#[must_use = "dialog futures do nothing unless awaited"]
pub struct DialogFuture<T> {
    id: DialogId,
    receiver: oneshot::Receiver<Result<T, DialogError>>,
}

impl<T> DialogFuture<T> {
    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl<T> Future for DialogFuture<T> {
    type Output = Result<T, DialogError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        self.receiver
            .poll_unpin(cx)
            .map(|settled| settled.unwrap_or(Err(DialogError::Dropped(id))))
    }
}

/// Deferred returned by the untyped [`DialogCoordinator::request`].
pub enum DialogReply {
    Flag(DialogFuture<bool>),
    Text(DialogFuture<Option<String>>),
}

impl DialogReply {
    pub fn id(&self) -> DialogId {
        match self {
            Self::Flag(future) => future.id(),
            Self::Text(future) => future.id(),
        }
    }
}

struct Inner {
    slot: DialogSlot,
    policy: SupersedePolicy,
    mounts: usize,
    next_id: u64,
}

/// Turns "ask the user" calls into awaitable results.
///
/// Cheap to clone; every clone drives the same dialog slot. Single-threaded by
/// construction: call sites run as local tasks on the UI thread.
#[derive(Clone)]
pub struct DialogCoordinator {
    inner: Rc<RefCell<Inner>>,
}

impl Default for DialogCoordinator {
    fn default() -> Self {
        Self::new(SupersedePolicy::default())
    }
}

impl DialogCoordinator {
    pub fn new(policy: SupersedePolicy) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                slot: DialogSlot::default(),
                policy,
                mounts: 0,
                next_id: 0,
            })),
        }
    }

    pub fn policy(&self) -> SupersedePolicy {
        self.inner.borrow().policy
    }

    /// Registers a renderer. Requests fail with `Unavailable` until one is mounted;
    /// dropping the last mount rejects whatever is still pending.
    pub fn mount(&self) -> RendererMount {
        self.inner.borrow_mut().mounts += 1;
        debug!("dialog renderer mounted");
        RendererMount {
            coordinator: self.clone(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().mounts > 0
    }

    pub fn alert(&self, request: AlertRequest) -> Result<DialogFuture<bool>, DialogError> {
        self.open_flag(request.into())
    }

    pub fn confirm(&self, request: ConfirmRequest) -> Result<DialogFuture<bool>, DialogError> {
        self.open_flag(request.into())
    }

    pub fn prompt(
        &self,
        request: PromptRequest,
    ) -> Result<DialogFuture<Option<String>>, DialogError> {
        self.open_text(request.into())
    }

    pub fn custom(&self, request: CustomRequest) -> Result<DialogFuture<bool>, DialogError> {
        self.open_flag(request.into())
    }

    pub fn request(&self, request: DialogRequest) -> Result<DialogReply, DialogError> {
        match request {
            DialogRequest::Prompt(_) => self.open_text(request).map(DialogReply::Text),
            _ => self.open_flag(request).map(DialogReply::Flag),
        }
    }

    fn open_flag(&self, request: DialogRequest) -> Result<DialogFuture<bool>, DialogError> {
        let (tx, receiver) = oneshot::channel();
        let id = self.open(request, Sender::Flag(tx))?;
        Ok(DialogFuture { id, receiver })
    }

    fn open_text(
        &self,
        request: DialogRequest,
    ) -> Result<DialogFuture<Option<String>>, DialogError> {
        let (tx, receiver) = oneshot::channel();
        let id = self.open(request, Sender::Text(tx))?;
        Ok(DialogFuture { id, receiver })
    }

    fn open(&self, request: DialogRequest, sender: Sender) -> Result<DialogId, DialogError> {
        let (id, displaced) = {
            let mut inner = self.inner.borrow_mut();
            if inner.mounts == 0 {
                warn!(title = %request.text().title, "dialog requested with no renderer mounted");
                return Err(DialogError::Unavailable);
            }
            inner.next_id += 1;
            let id = DialogId(inner.next_id);
            let (descriptor, responder) = build(id, request.into_parts(), sender);
            debug!(dialog = %id, kind = ?descriptor.kind, title = %descriptor.title, "dialog requested");
            let entry = Entry::new(descriptor, responder);
            let policy = inner.policy;
            let displaced = match policy {
                SupersedePolicy::RejectPending => inner.slot.open(entry),
                SupersedePolicy::Queue => {
                    if !inner.slot.enqueue(entry) {
                        debug!(dialog = %id, queued = inner.slot.queued_len(), "dialog queued");
                    }
                    None
                }
            };
            (id, displaced)
        };

        if let Some(responder) = displaced.and_then(|entry| entry.responder) {
            let superseded = responder.id();
            warn!(dialog = %superseded, by = %id, "pending dialog superseded");
            responder.reject(DialogError::Superseded { id: superseded, by: id });
        }
        Ok(id)
    }

    /// Last descriptor shown, open or not.
    pub fn current(&self) -> Option<DialogDescriptor> {
        self.inner.borrow().slot.current().cloned()
    }

    pub fn active(&self) -> Option<DialogDescriptor> {
        self.inner.borrow().slot.active().cloned()
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().slot.is_open()
    }

    pub fn queued_len(&self) -> usize {
        self.inner.borrow().slot.queued_len()
    }

    /// Changes whenever the visible dialog state changes.
    pub fn version(&self) -> u64 {
        self.inner.borrow().slot.version()
    }

    /// Confirm action on the open dialog: settles it and closes it.
    ///
    /// `input` is the prompt text and is ignored for other kinds. Returns false if
    /// nothing was open.
    pub fn resolve_active(&self, input: Option<String>) -> bool {
        let Some(responder) = self.take_and_close() else {
            return false;
        };
        debug!(dialog = %responder.id(), "dialog confirmed");
        responder.resolve(input);
        true
    }

    /// Cancel, Esc or backdrop on the open dialog.
    pub fn dismiss_active(&self) -> bool {
        let Some(responder) = self.take_and_close() else {
            return false;
        };
        debug!(dialog = %responder.id(), "dialog dismissed");
        responder.dismiss();
        true
    }

    /// Closes the open dialog. A dialog closed before it was answered counts as
    /// dismissed. Calling this with nothing open does nothing.
    pub fn close(&self) -> bool {
        let closed = self.inner.borrow_mut().slot.close();
        match closed {
            None => false,
            Some(unsettled) => {
                if let Some(responder) = unsettled {
                    debug!(dialog = %responder.id(), "dialog closed unanswered");
                    responder.dismiss();
                }
                true
            }
        }
    }

    /// Dismisses dialog `id` whether it is open or still queued. Returns false
    /// if it was already settled.
    pub fn withdraw(&self, id: DialogId) -> bool {
        let responder = self.inner.borrow_mut().slot.withdraw(id);
        let Some(responder) = responder else {
            return false;
        };
        debug!(dialog = %id, "dialog withdrawn");
        responder.dismiss();
        true
    }

    // Settlement runs after the borrow ends so callbacks may call back in.
    fn take_and_close(&self) -> Option<Responder> {
        let mut inner = self.inner.borrow_mut();
        let responder = inner.slot.take_active_responder()?;
        let _ = inner.slot.close();
        Some(responder)
    }

    fn unmount(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            inner.mounts = inner.mounts.saturating_sub(1);
            if inner.mounts > 0 {
                return;
            }
            inner.slot.drain()
        };
        debug!(pending = pending.len(), "dialog renderer unmounted");
        for responder in pending {
            responder.reject(DialogError::Unavailable);
        }
    }
}

/// Keeps the coordinator available while alive.
pub struct RendererMount {
    coordinator: DialogCoordinator,
}

impl Drop for RendererMount {
    fn drop(&mut self) {
        self.coordinator.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogCoordinator, DialogReply, SupersedePolicy};
    use crate::app::dialog::{
        AlertRequest, ConfirmRequest, CustomPayload, CustomRequest, DialogError, DialogKind,
        InputSpec, PromptRequest,
    };
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use futures::FutureExt;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn mounted(policy: SupersedePolicy) -> (DialogCoordinator, super::RendererMount) {
        let coordinator = DialogCoordinator::new(policy);
        let mount = coordinator.mount();
        (coordinator, mount)
    }

    fn leave_discussion() -> ConfirmRequest {
        ConfirmRequest::new("Leave Discussion", "Are you sure?").unwrap()
    }

    #[test]
    fn request_without_renderer_fails_fast() {
        let coordinator = DialogCoordinator::default();
        let error = coordinator.confirm(leave_discussion()).err();
        assert_eq!(error, Some(DialogError::Unavailable));
        assert!(!coordinator.is_open());
    }

    #[test]
    fn alert_resolves_true_only_after_acknowledge() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let mut alert = coordinator
            .alert(AlertRequest::new("Saved", "Upload complete").unwrap())
            .unwrap();
        assert!((&mut alert).now_or_never().is_none());

        assert!(coordinator.resolve_active(None));
        assert_eq!(block_on(alert), Ok(true));
        assert!(!coordinator.resolve_active(None));
    }

    #[test]
    fn alert_dismissal_still_acknowledges() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let alert = coordinator
            .alert(AlertRequest::new("Heads up", "Quota at 90%").unwrap())
            .unwrap();
        coordinator.dismiss_active();
        assert_eq!(block_on(alert), Ok(true));
    }

    #[test]
    fn leave_discussion_cancel_resolves_false_and_closes() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let confirm = coordinator.confirm(leave_discussion()).unwrap();
        let shown = coordinator.active().unwrap();
        assert_eq!(shown.kind, DialogKind::Confirm);
        assert_eq!(shown.title, "Leave Discussion");

        assert!(coordinator.dismiss_active());
        assert_eq!(block_on(confirm), Ok(false));
        assert!(!coordinator.is_open());
    }

    #[test]
    fn confirm_settles_once() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let confirm = coordinator.confirm(leave_discussion()).unwrap();
        assert!(coordinator.resolve_active(None));
        assert!(!coordinator.dismiss_active());
        assert_eq!(block_on(confirm), Ok(true));
    }

    #[test]
    fn prompt_returns_trimmed_text_or_none() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let request = PromptRequest::new("Rename", "New title")
            .unwrap()
            .with_input(InputSpec::default().with_initial_value("Old title"));
        let prompt = coordinator.prompt(request.clone()).unwrap();
        coordinator.resolve_active(Some("  Graph Neural Nets  ".to_string()));
        assert_eq!(block_on(prompt), Ok(Some("Graph Neural Nets".to_string())));

        let prompt = coordinator.prompt(request).unwrap();
        coordinator.dismiss_active();
        assert_eq!(block_on(prompt), Ok(None));
    }

    #[test]
    fn second_request_supersedes_first() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let first = coordinator.confirm(leave_discussion()).unwrap();
        let first_id = first.id();
        let second = coordinator
            .alert(AlertRequest::new("Saved", "Done").unwrap())
            .unwrap();
        let second_id = second.id();

        assert_eq!(coordinator.active().map(|d| d.id), Some(second_id));
        assert_eq!(
            block_on(first),
            Err(DialogError::Superseded {
                id: first_id,
                by: second_id
            })
        );
        coordinator.resolve_active(None);
        assert_eq!(block_on(second), Ok(true));
    }

    #[test]
    fn queue_policy_waits_for_the_open_dialog() {
        let (coordinator, _mount) = mounted(SupersedePolicy::Queue);
        let first = coordinator.confirm(leave_discussion()).unwrap();
        let mut second = coordinator
            .alert(AlertRequest::new("Next", "Queued").unwrap())
            .unwrap();
        assert_eq!(coordinator.queued_len(), 1);
        assert_eq!(coordinator.active().map(|d| d.id), Some(first.id()));

        coordinator.resolve_active(None);
        assert_eq!(block_on(first), Ok(true));
        assert_eq!(coordinator.active().map(|d| d.id), Some(second.id()));
        assert!((&mut second).now_or_never().is_none());

        coordinator.resolve_active(None);
        assert_eq!(block_on(second), Ok(true));
    }

    #[test]
    fn close_twice_is_a_noop_and_dismisses_unanswered() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let confirm = coordinator.confirm(leave_discussion()).unwrap();
        let version = coordinator.version();

        assert!(coordinator.close());
        let closed = coordinator.version();
        assert!(closed > version);
        assert!(!coordinator.close());
        assert_eq!(coordinator.version(), closed);
        assert_eq!(block_on(confirm), Ok(false));
        assert_eq!(
            coordinator.current().map(|d| d.title),
            Some("Leave Discussion".to_string())
        );
    }

    #[test]
    fn custom_runs_on_close_unless_confirmed() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let closed = Rc::new(Cell::new(0));

        let counter = closed.clone();
        let request = CustomRequest::new("Friend request", CustomPayload::from_text("Ada Lovelace"))
            .unwrap()
            .on_close(move || counter.set(counter.get() + 1));
        let accepted = coordinator.custom(request).unwrap();
        coordinator.resolve_active(None);
        assert_eq!(block_on(accepted), Ok(true));
        assert_eq!(closed.get(), 0);

        let counter = closed.clone();
        let request = CustomRequest::new("Friend request", CustomPayload::from_text("Alan Turing"))
            .unwrap()
            .on_close(move || counter.set(counter.get() + 1));
        let declined = coordinator.custom(request).unwrap();
        coordinator.dismiss_active();
        assert_eq!(block_on(declined), Ok(false));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn replaced_or_unmounted_custom_still_runs_on_close() {
        let (coordinator, mount) = mounted(SupersedePolicy::RejectPending);
        let closed = Rc::new(Cell::new(0));

        let counter = closed.clone();
        let request = CustomRequest::new("Friend request", CustomPayload::from_text("Ada Lovelace"))
            .unwrap()
            .on_close(move || counter.set(counter.get() + 1));
        let replaced = coordinator.custom(request).unwrap();
        let _saved = coordinator
            .alert(AlertRequest::new("Saved", "Done").unwrap())
            .unwrap();
        assert!(matches!(
            block_on(replaced),
            Err(DialogError::Superseded { .. })
        ));
        assert_eq!(closed.get(), 1);

        let counter = closed.clone();
        let request = CustomRequest::new("Friend request", CustomPayload::from_text("Alan Turing"))
            .unwrap()
            .on_close(move || counter.set(counter.get() + 1));
        let pending = coordinator.custom(request).unwrap();
        drop(mount);
        assert_eq!(block_on(pending), Err(DialogError::Unavailable));
        assert_eq!(closed.get(), 2);
    }

    #[test]
    fn on_close_may_reenter_the_coordinator() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let seen_open = Rc::new(Cell::new(true));

        let handle = coordinator.clone();
        let flag = seen_open.clone();
        let request = CustomRequest::new("Invite", CustomPayload::from_text("Join thread?"))
            .unwrap()
            .on_close(move || flag.set(handle.is_open()));
        let _declined = coordinator.custom(request).unwrap();
        coordinator.dismiss_active();
        assert!(!seen_open.get());
    }

    #[test]
    fn withdraw_dismisses_only_the_named_dialog() {
        let (coordinator, _mount) = mounted(SupersedePolicy::Queue);
        let first = coordinator.confirm(leave_discussion()).unwrap();
        let second = coordinator.confirm(leave_discussion()).unwrap();
        let second_id = second.id();

        assert!(coordinator.withdraw(second_id));
        assert!(!coordinator.withdraw(second_id));
        assert_eq!(block_on(second), Ok(false));
        assert_eq!(coordinator.queued_len(), 0);
        assert!(coordinator.is_open());

        let first_id = first.id();
        assert!(coordinator.withdraw(first_id));
        assert_eq!(block_on(first), Ok(false));
        assert!(!coordinator.is_open());
    }

    #[test]
    fn unmount_rejects_pending_dialogs() {
        let (coordinator, mount) = mounted(SupersedePolicy::Queue);
        let first = coordinator.confirm(leave_discussion()).unwrap();
        let second = coordinator.confirm(leave_discussion()).unwrap();
        drop(mount);

        assert_eq!(block_on(first), Err(DialogError::Unavailable));
        assert_eq!(block_on(second), Err(DialogError::Unavailable));
        assert!(!coordinator.is_mounted());
        assert_eq!(
            coordinator.confirm(leave_discussion()).err(),
            Some(DialogError::Unavailable)
        );
    }

    #[test]
    fn untyped_request_picks_reply_shape() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let reply = coordinator
            .request(PromptRequest::new("Tag", "").unwrap().into())
            .unwrap();
        assert!(matches!(reply, DialogReply::Text(_)));
        let reply = coordinator
            .request(leave_discussion().into())
            .unwrap();
        assert!(matches!(reply, DialogReply::Flag(_)));
    }

    #[test]
    fn local_task_resumes_after_user_action() {
        let (coordinator, _mount) = mounted(SupersedePolicy::RejectPending);
        let mut pool = LocalPool::new();
        let outcome = Rc::new(RefCell::new(None));

        let confirm = coordinator.confirm(leave_discussion()).unwrap();
        let slot = outcome.clone();
        pool.spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(confirm.await);
            })
            .unwrap();

        pool.run_until_stalled();
        assert!(outcome.borrow().is_none());
        assert!(coordinator.is_open());

        coordinator.resolve_active(None);
        pool.run_until_stalled();
        assert_eq!(*outcome.borrow(), Some(Ok(true)));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            "queue".parse::<SupersedePolicy>(),
            Ok(SupersedePolicy::Queue)
        );
        assert_eq!(
            "Reject".parse::<SupersedePolicy>(),
            Ok(SupersedePolicy::RejectPending)
        );
        assert!("stack".parse::<SupersedePolicy>().is_err());
    }
}
