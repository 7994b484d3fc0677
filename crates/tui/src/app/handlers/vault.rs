use crate::app::dialog::{
    AlertRequest, ConfirmRequest, CustomPayload, CustomRequest, DialogCoordinator, DialogError,
    DialogFuture, DialogVariant, InputSpec, PromptRequest,
};
use crate::app::state::{Discussion, Document, Friend, FriendStatus, LogKind, VaultTab};
use crate::app::AppState;
use crossterm::event::{KeyCode, KeyModifiers};
use futures::channel::mpsc::UnboundedSender;
use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use tracing::{debug, warn};

/// Vault change decided by the user through a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultAction {
    DeleteDocument(u64),
    RenameDocument { id: u64, title: String },
    TagDocument { id: u64, tag: String },
    LeaveDiscussion(u64),
    AcceptFriend(u64),
    DeclineFriend(u64),
    Note(String),
    Failed {
        action: &'static str,
        error: DialogError,
    },
    Quit,
}

/// Call sites that ask the user before touching the vault. Each one opens a
/// dialog and awaits the answer on the UI task pool.
#[derive(Clone)]
pub struct VaultCommands {
    coordinator: DialogCoordinator,
    spawner: LocalSpawner,
    actions: UnboundedSender<VaultAction>,
}

impl VaultCommands {
    pub fn new(
        coordinator: DialogCoordinator,
        spawner: LocalSpawner,
        actions: UnboundedSender<VaultAction>,
    ) -> Self {
        Self {
            coordinator,
            spawner,
            actions,
        }
    }

    pub fn coordinator(&self) -> &DialogCoordinator {
        &self.coordinator
    }

    fn follow<T: 'static>(
        &self,
        label: &'static str,
        decision: DialogFuture<T>,
        decide: impl FnOnce(T) -> Option<VaultAction> + 'static,
    ) {
        let actions = self.actions.clone();
        let dialog = decision.id();
        let task = async move {
            let action = match decision.await {
                Ok(value) => decide(value),
                Err(error) => Some(VaultAction::Failed {
                    action: label,
                    error,
                }),
            };
            if let Some(action) = action {
                debug!(%dialog, ?action, "dialog decided");
                let _ = actions.unbounded_send(action);
            }
        };
        if let Err(error) = self.spawner.spawn_local(task) {
            warn!(%error, action = label, "failed to spawn dialog task");
        }
    }

    pub fn show_document(&self, document: &Document) -> Result<(), DialogError> {
        let mut details = vec![
            format!("Authors: {}", document.authors.join(", ")),
            format!("Year: {}", document.year),
        ];
        if !document.tags.is_empty() {
            details.push(format!("Tags: {}", document.tags.join(", ")));
        }
        let request = AlertRequest::new(document.title.clone(), details.join("\n"))?;
        self.follow("document details", self.coordinator.alert(request)?, |_| None);
        Ok(())
    }

    pub fn delete_document(&self, document: &Document) -> Result<(), DialogError> {
        let request = ConfirmRequest::new(
            "Delete document",
            format!(
                "\"{}\" will be removed from your vault. This cannot be undone.",
                document.title
            ),
        )?
        .with_confirm_label("Delete")
        .with_variant(DialogVariant::Danger);
        let id = document.id;
        self.follow(
            "delete document",
            self.coordinator.confirm(request)?,
            move |ok| ok.then_some(VaultAction::DeleteDocument(id)),
        );
        Ok(())
    }

    pub fn rename_document(&self, document: &Document) -> Result<(), DialogError> {
        let request = PromptRequest::new(
            "Rename document",
            format!("Current title: {}", document.title),
        )?
        .with_confirm_label("Rename")
        .with_input(InputSpec::default().with_placeholder("New title"));
        let id = document.id;
        self.follow(
            "rename document",
            self.coordinator.prompt(request)?,
            move |title: Option<String>| {
                title
                    .filter(|title| !title.is_empty())
                    .map(|title| VaultAction::RenameDocument { id, title })
            },
        );
        Ok(())
    }

    pub fn tag_document(&self, document: &Document) -> Result<(), DialogError> {
        let request = PromptRequest::new("Add tag", format!("Tag \"{}\"", document.title))?
            .with_confirm_label("Add")
            .with_input(InputSpec::default().with_placeholder("e.g. methodology"));
        let id = document.id;
        self.follow(
            "tag document",
            self.coordinator.prompt(request)?,
            move |tag: Option<String>| {
                tag.filter(|tag| !tag.is_empty())
                    .map(|tag| VaultAction::TagDocument { id, tag })
            },
        );
        Ok(())
    }

    pub fn leave_discussion(&self, discussion: &Discussion) -> Result<(), DialogError> {
        let request = ConfirmRequest::new("Leave Discussion", "Are you sure?")?
            .with_confirm_label("Leave")
            .with_variant(DialogVariant::Warning);
        let id = discussion.id;
        self.follow(
            "leave discussion",
            self.coordinator.confirm(request)?,
            move |ok| ok.then_some(VaultAction::LeaveDiscussion(id)),
        );
        Ok(())
    }

    pub fn review_friend_request(&self, friend: &Friend) -> Result<(), DialogError> {
        let payload = CustomPayload::new([
            friend.name.clone(),
            friend.affiliation.clone(),
            format!("Field: {}", friend.field),
        ]);
        let actions = self.actions.clone();
        let name = friend.name.clone();
        let request = CustomRequest::new("Friend request", payload)?
            .with_message(format!("{} wants to connect.", friend.name))
            .with_confirm_label("Accept")
            .with_cancel_label("Later")
            .on_close(move || {
                let _ = actions.unbounded_send(VaultAction::Note(format!(
                    "Request from {name} kept for later"
                )));
            });
        let id = friend.id;
        self.follow(
            "friend request",
            self.coordinator.custom(request)?,
            move |ok| ok.then_some(VaultAction::AcceptFriend(id)),
        );
        Ok(())
    }

    pub fn decline_friend(&self, friend: &Friend) -> Result<(), DialogError> {
        let request = ConfirmRequest::new(
            "Decline friend request",
            format!("{} will not be notified.", friend.name),
        )?
        .with_confirm_label("Decline")
        .with_variant(DialogVariant::Danger);
        let id = friend.id;
        self.follow(
            "decline friend",
            self.coordinator.confirm(request)?,
            move |ok| ok.then_some(VaultAction::DeclineFriend(id)),
        );
        Ok(())
    }

    pub fn about(&self) -> Result<(), DialogError> {
        let request = AlertRequest::new(
            "About AcademVault",
            "Documents, discussions and collaborators in one research vault.",
        )?
        .with_variant(DialogVariant::Success);
        self.follow("about", self.coordinator.alert(request)?, |_| None);
        Ok(())
    }

    pub fn quit(&self) -> Result<(), DialogError> {
        let request = ConfirmRequest::new("Quit AcademVault", "Open dialogs will be cancelled.")?
            .with_confirm_label("Quit");
        self.follow("quit", self.coordinator.confirm(request)?, |ok| {
            ok.then_some(VaultAction::Quit)
        });
        Ok(())
    }
}

/// Main-screen keys. Returns true when the screen needs a redraw.
pub fn handle_vault_key(
    app: &mut AppState,
    commands: &VaultCommands,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    let result = match (key, modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.should_exit = true;
            return true;
        }
        (KeyCode::Up | KeyCode::Char('k'), _) => {
            app.select_prev();
            return true;
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => {
            app.select_next();
            return true;
        }
        (KeyCode::Tab, _) => {
            app.switch_tab(app.tab.next());
            return true;
        }
        (KeyCode::Char(digit @ '1'..='3'), _) => {
            let index = (digit as usize) - ('1' as usize);
            app.switch_tab(VaultTab::ALL[index]);
            return true;
        }
        (KeyCode::PageUp, _) => {
            app.scroll_page_up();
            return true;
        }
        (KeyCode::PageDown, _) => {
            app.scroll_page_down();
            return true;
        }
        (KeyCode::Char('q'), _) => commands.quit(),
        (KeyCode::Char('?'), _) => commands.about(),
        (KeyCode::Enter, _) => match app.tab {
            VaultTab::Documents => match app.selected_document() {
                Some(document) => commands.show_document(document),
                None => return false,
            },
            VaultTab::Discussions => match app.selected_discussion() {
                Some(discussion) => commands.leave_discussion(discussion),
                None => return false,
            },
            VaultTab::Friends => match app.selected_friend() {
                Some(friend) if friend.status == FriendStatus::Pending => {
                    commands.review_friend_request(friend)
                }
                _ => return false,
            },
        },
        (KeyCode::Char('d'), _) => match app.selected_document() {
            Some(document) => commands.delete_document(document),
            None => return false,
        },
        (KeyCode::Char('r'), _) => match app.selected_document() {
            Some(document) => commands.rename_document(document),
            None => return false,
        },
        (KeyCode::Char('t'), _) => match app.selected_document() {
            Some(document) => commands.tag_document(document),
            None => return false,
        },
        (KeyCode::Char('l'), _) => match app.selected_discussion() {
            Some(discussion) => commands.leave_discussion(discussion),
            None => return false,
        },
        (KeyCode::Char('x'), _) => match app.selected_friend() {
            Some(friend) if friend.status == FriendStatus::Pending => {
                commands.decline_friend(friend)
            }
            _ => return false,
        },
        _ => return false,
    };
    if let Err(error) = result {
        app.push_error_report("dialog error", error.to_string());
    }
    true
}

pub fn apply_vault_action(app: &mut AppState, action: VaultAction) {
    match action {
        VaultAction::DeleteDocument(id) => match app.vault.delete_document(id) {
            Some(document) => {
                app.push_line(LogKind::Space, format!("Deleted \"{}\"", document.title))
            }
            None => app.push_line(LogKind::Status, "Document was already removed"),
        },
        VaultAction::RenameDocument { id, title } => {
            if app.vault.rename_document(id, &title) {
                app.push_line(LogKind::Space, format!("Renamed document to \"{title}\""));
            } else {
                app.push_line(LogKind::Status, "Document was not renamed");
            }
        }
        VaultAction::TagDocument { id, tag } => {
            if app.vault.tag_document(id, &tag) {
                app.push_line(LogKind::Space, format!("Tagged document with #{}", tag.to_lowercase()));
            } else {
                app.push_line(LogKind::Status, format!("Tag #{tag} not added"));
            }
        }
        VaultAction::LeaveDiscussion(id) => match app.vault.leave_discussion(id) {
            Some(discussion) => app.push_line(
                LogKind::Space,
                format!("Left discussion \"{}\"", discussion.title),
            ),
            None => app.push_line(LogKind::Status, "Discussion no longer listed"),
        },
        VaultAction::AcceptFriend(id) => {
            if app.vault.accept_friend(id) {
                let name = app
                    .vault
                    .friend(id)
                    .map(|friend| friend.name.clone())
                    .unwrap_or_default();
                app.push_line(LogKind::Space, format!("You are now connected with {name}"));
            }
        }
        VaultAction::DeclineFriend(id) => {
            if let Some(friend) = app.vault.decline_friend(id) {
                app.push_line(
                    LogKind::Space,
                    format!("Declined request from {}", friend.name),
                );
            }
        }
        VaultAction::Note(text) => app.push_line(LogKind::Dialog, text),
        VaultAction::Failed {
            action,
            error: error @ DialogError::Superseded { .. },
        } => app.push_line(LogKind::Status, format!("{action}: {error}")),
        VaultAction::Failed { action, error } => app.push_error_report(action, error.to_string()),
        VaultAction::Quit => app.should_exit = true,
    }
    app.clamp_selection();
}

#[cfg(test)]
mod tests {
    use super::{apply_vault_action, handle_vault_key, VaultAction, VaultCommands};
    use crate::app::dialog::{DialogCoordinator, DialogError, DialogKind, RendererMount};
    use crate::app::state::{FriendStatus, LogKind, Vault, VaultTab};
    use crate::app::AppState;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::channel::mpsc::{self, UnboundedReceiver};
    use futures::executor::LocalPool;

    struct Harness {
        pool: LocalPool,
        coordinator: DialogCoordinator,
        commands: VaultCommands,
        actions: UnboundedReceiver<VaultAction>,
        app: AppState,
        _mount: Option<RendererMount>,
    }

    impl Harness {
        fn new(mounted: bool) -> Self {
            let pool = LocalPool::new();
            let coordinator = DialogCoordinator::default();
            let (tx, actions) = mpsc::unbounded();
            let commands = VaultCommands::new(coordinator.clone(), pool.spawner(), tx);
            let mount = mounted.then(|| coordinator.mount());
            Self {
                pool,
                coordinator,
                commands,
                actions,
                app: AppState::new(Vault::sample()),
                _mount: mount,
            }
        }

        fn press(&mut self, key: KeyCode) -> bool {
            let redraw = handle_vault_key(&mut self.app, &self.commands, key, KeyModifiers::NONE);
            self.pool.run_until_stalled();
            redraw
        }

        fn settle(&mut self, confirm: bool, input: Option<&str>) {
            if confirm {
                self.coordinator.resolve_active(input.map(str::to_string));
            } else {
                self.coordinator.dismiss_active();
            }
            self.pool.run_until_stalled();
        }

        fn next_action(&mut self) -> Option<VaultAction> {
            self.actions.try_next().ok().flatten()
        }
    }

    #[test]
    fn leave_discussion_asks_before_leaving() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('2'));
        assert_eq!(h.app.tab, VaultTab::Discussions);
        h.press(KeyCode::Char('l'));

        let shown = h.coordinator.active().unwrap();
        assert_eq!(shown.kind, DialogKind::Confirm);
        assert_eq!(shown.title, "Leave Discussion");
        assert_eq!(shown.message, "Are you sure?");

        h.settle(true, None);
        let action = h.next_action().unwrap();
        assert_eq!(action, VaultAction::LeaveDiscussion(1));
        apply_vault_action(&mut h.app, action);
        assert!(h.app.vault.discussion(1).is_none());
    }

    #[test]
    fn cancelled_delete_changes_nothing() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('d'));
        h.settle(false, None);
        assert_eq!(h.next_action(), None);
        assert_eq!(h.app.vault.len(VaultTab::Documents), 3);
    }

    #[test]
    fn rename_uses_trimmed_prompt_text() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('r'));
        h.settle(true, Some("  Attention, revisited  "));
        let action = h.next_action().unwrap();
        apply_vault_action(&mut h.app, action);
        assert_eq!(h.app.vault.document(1).unwrap().title, "Attention, revisited");

        h.press(KeyCode::Char('r'));
        h.settle(true, Some("   "));
        assert_eq!(h.next_action(), None);
    }

    #[test]
    fn friend_request_later_runs_close_callback() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('3'));
        h.press(KeyCode::Down);
        h.press(KeyCode::Enter);
        assert_eq!(h.coordinator.active().unwrap().kind, DialogKind::Custom);

        h.settle(false, None);
        let note = h.next_action().unwrap();
        assert!(matches!(&note, VaultAction::Note(text) if text.contains("Alan Turing")));
        assert_eq!(h.next_action(), None);

        h.press(KeyCode::Enter);
        h.settle(true, None);
        let action = h.next_action().unwrap();
        apply_vault_action(&mut h.app, action);
        assert_eq!(h.app.vault.friend(2).unwrap().status, FriendStatus::Accepted);
    }

    #[test]
    fn replaced_friend_request_keeps_the_note() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('3'));
        h.press(KeyCode::Down);
        h.press(KeyCode::Enter);
        assert_eq!(h.coordinator.active().unwrap().kind, DialogKind::Custom);

        h.press(KeyCode::Char('?'));
        let note = h.next_action().unwrap();
        assert!(matches!(&note, VaultAction::Note(text) if text.contains("Alan Turing")));
        assert!(matches!(
            h.next_action(),
            Some(VaultAction::Failed {
                error: DialogError::Superseded { .. },
                ..
            })
        ));
    }

    #[test]
    fn replaced_dialog_is_reported_as_status() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('d'));
        h.press(KeyCode::Char('?'));
        let action = h.next_action().unwrap();
        assert!(matches!(
            action,
            VaultAction::Failed {
                error: DialogError::Superseded { .. },
                ..
            }
        ));
        apply_vault_action(&mut h.app, action);
        assert_eq!(h.app.log.last().map(|line| line.kind), Some(LogKind::Status));
    }

    #[test]
    fn unmounted_renderer_reports_error() {
        let mut h = Harness::new(false);
        assert!(h.press(KeyCode::Char('q')));
        assert_eq!(h.app.log.last().map(|line| line.kind), Some(LogKind::Error));
        assert!(!h.app.should_exit);
    }

    #[test]
    fn quit_confirmation_sets_exit_flag() {
        let mut h = Harness::new(true);
        h.press(KeyCode::Char('q'));
        h.settle(true, None);
        let action = h.next_action().unwrap();
        apply_vault_action(&mut h.app, action);
        assert!(h.app.should_exit);
    }
}
