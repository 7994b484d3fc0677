pub(crate) mod input;
pub(crate) mod log;
pub(crate) mod ui;
pub(crate) mod vault;

pub use input::InputState;
pub use log::{LogKind, LogLine};
pub use ui::{DialogFocus, DialogHitAreas, DialogTransition, DialogUiState};
pub use vault::{Discussion, Document, Friend, FriendStatus, Vault, VaultTab};
