//! Promise-style dialog coordination.
//!
//! Call sites ask for a decision with [`DialogCoordinator::alert`],
//! [`confirm`](DialogCoordinator::confirm), [`prompt`](DialogCoordinator::prompt) or
//! [`custom`](DialogCoordinator::custom) and await the returned [`DialogFuture`]. The
//! renderer reads the open [`DialogDescriptor`] and settles it with
//! [`resolve_active`](DialogCoordinator::resolve_active) or
//! [`dismiss_active`](DialogCoordinator::dismiss_active).

mod coordinator;
mod descriptor;
mod error;
mod request;
mod slot;

pub use coordinator::{DialogCoordinator, DialogFuture, DialogReply, RendererMount, SupersedePolicy};
pub use descriptor::{DialogDescriptor, DialogId};
pub use error::DialogError;
pub use request::{
    AlertRequest, ConfirmRequest, CustomPayload, CustomRequest, DialogKind, DialogRequest,
    DialogText, DialogVariant, InputKind, InputSpec, OnClose, PromptRequest,
};
pub use slot::DialogSlot;
