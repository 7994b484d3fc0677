pub mod dialog;
pub mod handlers;
pub mod runtime;
pub mod state;
pub mod util;
pub mod view;

use crate::app::dialog::DialogCoordinator;
use crate::app::state::{
    DialogTransition, DialogUiState, Discussion, Document, Friend, LogKind, LogLine, Vault,
    VaultTab,
};

pub struct AppState {
    pub vault: Vault,
    pub tab: VaultTab,
    pub selected: usize,
    pub log: Vec<LogLine>,
    pub scroll_from_bottom: usize,
    pub last_log_viewport_height: usize,
    pub dialog: DialogUiState,
    pub dialog_version: u64,
    pub should_exit: bool,
    scroll_lock: Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vault::default())
    }
}

impl AppState {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            tab: VaultTab::Documents,
            selected: 0,
            log: Vec::new(),
            scroll_from_bottom: 0,
            last_log_viewport_height: 0,
            dialog: DialogUiState::default(),
            dialog_version: 0,
            should_exit: false,
            scroll_lock: None,
        }
    }

    pub fn push_line(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push(LogLine::new(kind, text));
        match self.scroll_lock.as_mut() {
            Some(saved) if *saved > 0 => *saved = saved.saturating_add(1),
            Some(_) => {}
            None if self.scroll_from_bottom > 0 => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
            }
            None => {}
        }
    }

    pub fn push_error_report(&mut self, context: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(%context, %detail, "reported error");
        self.push_line(LogKind::Error, format!("{context}: {detail}"));
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_some()
    }

    pub fn scroll_up(&mut self, lines: usize) {
        if self.is_scroll_locked() {
            return;
        }
        let max = self.log.len().saturating_sub(1);
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        if self.is_scroll_locked() {
            return;
        }
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_up(page);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_down(page);
    }

    // The log snaps to the bottom while a dialog is open and returns to the
    // reader's position afterwards.
    fn lock_scroll(&mut self) {
        if self.scroll_lock.is_none() {
            self.scroll_lock = Some(self.scroll_from_bottom);
            self.scroll_from_bottom = 0;
        }
    }

    fn unlock_scroll(&mut self) {
        if let Some(saved) = self.scroll_lock.take() {
            self.scroll_from_bottom = saved;
        }
    }

    /// Pulls the coordinator's open dialog into the renderer. Returns true when a
    /// redraw is needed.
    pub fn sync_dialog(&mut self, coordinator: &DialogCoordinator) -> bool {
        let version = coordinator.version();
        let changed = version != self.dialog_version;
        self.dialog_version = version;
        let transition = self.dialog.sync(coordinator.active());
        match transition {
            DialogTransition::Opened => self.lock_scroll(),
            DialogTransition::Closed => self.unlock_scroll(),
            DialogTransition::Replaced | DialogTransition::Unchanged => {}
        }
        changed || transition != DialogTransition::Unchanged
    }

    pub fn switch_tab(&mut self, tab: VaultTab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.vault.len(self.tab);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside the current list after removals.
    pub fn clamp_selection(&mut self) {
        let len = self.vault.len(self.tab);
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn selected_document(&self) -> Option<&Document> {
        (self.tab == VaultTab::Documents)
            .then(|| self.vault.documents.get(self.selected))
            .flatten()
    }

    pub fn selected_discussion(&self) -> Option<&Discussion> {
        (self.tab == VaultTab::Discussions)
            .then(|| self.vault.discussions.get(self.selected))
            .flatten()
    }

    pub fn selected_friend(&self) -> Option<&Friend> {
        (self.tab == VaultTab::Friends)
            .then(|| self.vault.friends.get(self.selected))
            .flatten()
    }
}
