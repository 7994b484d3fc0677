use std::collections::VecDeque;

use super::descriptor::{DialogDescriptor, DialogId, Responder};

pub(super) struct Entry {
    pub descriptor: DialogDescriptor,
    pub responder: Option<Responder>,
}

impl Entry {
    pub fn new(descriptor: DialogDescriptor, responder: Responder) -> Self {
        Self {
            descriptor,
            responder: Some(responder),
        }
    }
}

/// Holds the single displayed dialog plus any requests waiting their turn.
///
/// After `close` the last descriptor stays readable (with `is_open == false`)
/// so a renderer can draw one closing frame.
#[derive(Default)]
pub struct DialogSlot {
    current: Option<Entry>,
    queued: VecDeque<Entry>,
    version: u64,
}

impl DialogSlot {
    pub fn current(&self) -> Option<&DialogDescriptor> {
        self.current.as_ref().map(|entry| &entry.descriptor)
    }

    pub fn active(&self) -> Option<&DialogDescriptor> {
        self.current().filter(|descriptor| descriptor.is_open)
    }

    pub fn is_open(&self) -> bool {
        self.active().is_some()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Bumped on every visible change.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Shows `entry` right away, handing back the open entry it displaced.
    pub(super) fn open(&mut self, mut entry: Entry) -> Option<Entry> {
        entry.descriptor.is_open = true;
        let previous = self.current.replace(entry);
        self.touch();
        previous.filter(|entry| entry.descriptor.is_open)
    }

    /// Shows `entry` if nothing is open, otherwise queues it. Returns true when shown.
    pub(super) fn enqueue(&mut self, entry: Entry) -> bool {
        if self.is_open() {
            self.queued.push_back(entry);
            return false;
        }
        let _ = self.open(entry);
        true
    }

    pub(super) fn take_active_responder(&mut self) -> Option<Responder> {
        self.current
            .as_mut()
            .filter(|entry| entry.descriptor.is_open)
            .and_then(|entry| entry.responder.take())
    }

    /// Closes the open dialog and promotes the next queued one.
    ///
    /// Returns `None` when nothing was open. The inner option is the closed
    /// dialog's responder if it had not been settled yet.
    pub(super) fn close(&mut self) -> Option<Option<Responder>> {
        let entry = self
            .current
            .as_mut()
            .filter(|entry| entry.descriptor.is_open)?;
        entry.descriptor.is_open = false;
        let unsettled = entry.responder.take();
        self.touch();
        if let Some(next) = self.queued.pop_front() {
            let _ = self.open(next);
        }
        Some(unsettled)
    }

    /// Takes dialog `id` off screen or out of the queue, returning its responder
    /// if it had not been settled.
    pub(super) fn withdraw(&mut self, id: DialogId) -> Option<Responder> {
        if self.active().is_some_and(|descriptor| descriptor.id == id) {
            return self.close().flatten();
        }
        let index = self
            .queued
            .iter()
            .position(|entry| entry.descriptor.id == id)?;
        let entry = self.queued.remove(index)?;
        self.touch();
        entry.responder
    }

    /// Closes everything, returning every unsettled responder.
    pub(super) fn drain(&mut self) -> Vec<Responder> {
        let mut responders = Vec::new();
        if let Some(entry) = self.current.as_mut() {
            if entry.descriptor.is_open {
                entry.descriptor.is_open = false;
                self.version = self.version.wrapping_add(1);
            }
            responders.extend(entry.responder.take());
        }
        responders.extend(self.queued.drain(..).filter_map(|entry| entry.responder));
        responders
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogSlot, Entry};
    use crate::app::dialog::descriptor::{build, DialogId, Sender};
    use crate::app::dialog::request::{ConfirmRequest, DialogRequest};
    use futures::channel::oneshot;

    fn entry(id: u64, title: &str) -> Entry {
        let request: DialogRequest = ConfirmRequest::new(title, "body").unwrap().into();
        let (tx, _rx) = oneshot::channel();
        let (descriptor, responder) = build(DialogId(id), request.into_parts(), Sender::Flag(tx));
        Entry::new(descriptor, responder)
    }

    #[test]
    fn open_replaces_and_returns_previous_open_entry() {
        let mut slot = DialogSlot::default();
        assert!(slot.open(entry(1, "First")).is_none());
        let displaced = slot.open(entry(2, "Second")).expect("first was open");
        assert_eq!(displaced.descriptor.id, DialogId(1));
        assert_eq!(slot.active().map(|d| d.title.as_str()), Some("Second"));
    }

    #[test]
    fn close_is_idempotent_and_retains_text() {
        let mut slot = DialogSlot::default();
        slot.open(entry(1, "Leave Discussion"));
        let version = slot.version();

        assert!(slot.close().is_some());
        assert!(!slot.is_open());
        assert_eq!(
            slot.current().map(|d| d.title.as_str()),
            Some("Leave Discussion")
        );
        let closed_version = slot.version();
        assert!(closed_version > version);

        assert!(slot.close().is_none());
        assert_eq!(slot.version(), closed_version);
    }

    #[test]
    fn close_promotes_queued_entry() {
        let mut slot = DialogSlot::default();
        assert!(slot.enqueue(entry(1, "First")));
        assert!(!slot.enqueue(entry(2, "Second")));
        assert_eq!(slot.queued_len(), 1);

        slot.close();
        assert_eq!(slot.active().map(|d| d.id), Some(DialogId(2)));
        assert_eq!(slot.queued_len(), 0);
    }

    #[test]
    fn close_reports_unsettled_responder_once() {
        let mut slot = DialogSlot::default();
        slot.open(entry(1, "First"));
        assert!(slot.take_active_responder().is_some());
        assert!(slot.take_active_responder().is_none());
        assert!(matches!(slot.close(), Some(None)));
    }

    #[test]
    fn withdraw_takes_open_or_queued_entries() {
        let mut slot = DialogSlot::default();
        slot.enqueue(entry(1, "First"));
        slot.enqueue(entry(2, "Second"));
        slot.enqueue(entry(3, "Third"));

        assert!(slot.withdraw(DialogId(2)).is_some());
        assert_eq!(slot.queued_len(), 1);
        assert_eq!(slot.active().map(|d| d.id), Some(DialogId(1)));

        assert!(slot.withdraw(DialogId(1)).is_some());
        assert_eq!(slot.active().map(|d| d.id), Some(DialogId(3)));
        assert!(slot.withdraw(DialogId(1)).is_none());
    }

    #[test]
    fn drain_collects_current_and_queued() {
        let mut slot = DialogSlot::default();
        slot.enqueue(entry(1, "First"));
        slot.enqueue(entry(2, "Second"));
        let responders = slot.drain();
        assert_eq!(responders.len(), 2);
        assert!(!slot.is_open());
        assert_eq!(slot.queued_len(), 0);
    }
}
