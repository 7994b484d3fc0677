pub mod dialog;
pub mod vault;

pub use dialog::{handle_dialog_key, handle_dialog_mouse, handle_dialog_paste};
pub use vault::{apply_vault_action, handle_vault_key, VaultAction, VaultCommands};
