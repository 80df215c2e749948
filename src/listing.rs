use rocket::tokio::sync::broadcast::{self, Receiver, Sender};

use crate::model::mongodb::Id;

/// A change to the set of listed polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingEvent {
    Created(Id),
    Deleted(Id),
}

/// Fire-and-forget invalidation signal for poll listing views.
///
/// Cache and view layers subscribe; senders never wait for, nor learn about,
/// delivery. Having no subscriber at all is fine.
pub struct ListingNotifier {
    sender: Sender<ListingEvent>,
}

impl ListingNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Subscribe to future listing changes.
    pub fn subscribe(&self) -> Receiver<ListingEvent> {
        self.sender.subscribe()
    }

    /// Signal that a poll was created.
    pub fn poll_created(&self, id: Id) {
        // A send error just means nobody is listening.
        let _ = self.sender.send(ListingEvent::Created(id));
    }

    /// Signal that a poll was deleted.
    pub fn poll_deleted(&self, id: Id) {
        let _ = self.sender.send(ListingEvent::Deleted(id));
    }
}

impl Default for ListingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn subscribers_receive_events() {
        let notifier = ListingNotifier::new();
        let mut receiver = notifier.subscribe();

        let id = Id::new();
        notifier.poll_created(id);
        notifier.poll_deleted(id);

        assert_eq!(Ok(ListingEvent::Created(id)), receiver.try_recv());
        assert_eq!(Ok(ListingEvent::Deleted(id)), receiver.try_recv());
        assert_eq!(Err(TryRecvError::Empty), receiver.try_recv());
    }

    #[test]
    fn notifying_without_subscribers_is_fine() {
        let notifier = ListingNotifier::new();
        notifier.poll_created(Id::new());
    }
}
