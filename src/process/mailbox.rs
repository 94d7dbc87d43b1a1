/*!
 * Process Mailbox
 * Per-process inbox for asynchronous text messages
 */

use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages grouped by sender, each sequence in delivery order
pub type Inbox = BTreeMap<Pid, Vec<String>>;

/// Per-process inbox
///
/// Order is preserved per sender only; there is no ordering guarantee across
/// different senders. Intended for sequential use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mailbox {
    inbox: Inbox,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the sender's sequence, creating it if absent
    pub fn deliver(&mut self, from: Pid, content: impl Into<String>) {
        self.inbox.entry(from).or_default().push(content.into());
    }

    /// Take every pending message, leaving the inbox empty
    pub fn drain_all(&mut self) -> Inbox {
        std::mem::take(&mut self.inbox)
    }

    /// Messages received from one sender
    pub fn from_sender(&self, sender: Pid) -> &[String] {
        self.inbox.get(&sender).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total pending messages across all senders
    pub fn pending(&self) -> usize {
        self.inbox.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.is_empty()
    }

    pub fn senders(&self) -> impl Iterator<Item = Pid> + '_ {
        self.inbox.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delivery_order_per_sender() {
        let mut mailbox = Mailbox::new();
        mailbox.deliver(2, "first");
        mailbox.deliver(3, "other");
        mailbox.deliver(2, "second");

        assert_eq!(mailbox.from_sender(2), ["first", "second"]);
        assert_eq!(mailbox.from_sender(3), ["other"]);
        assert_eq!(mailbox.pending(), 3);
    }

    #[test]
    fn test_drain_clears() {
        let mut mailbox = Mailbox::new();
        mailbox.deliver(1, "hello");

        let drained = mailbox.drain_all();
        assert_eq!(drained.get(&1).unwrap(), &vec!["hello".to_string()]);
        assert!(mailbox.is_empty());
        assert!(mailbox.drain_all().is_empty());
    }

    #[test]
    fn test_unknown_sender() {
        let mailbox = Mailbox::new();
        assert!(mailbox.from_sender(9).is_empty());
        assert_eq!(mailbox.senders().count(), 0);
    }
}
