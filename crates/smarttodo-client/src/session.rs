use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use uuid::Uuid;

/// An identity-provider session as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Session changes pushed by the identity integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    /// Same user, fresh access token.
    TokenRefreshed(Session),
    SignedOut,
}

/// Fan-out of session changes to every subscribed view.
#[derive(Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Publish an event to all current subscribers. Events published while
    /// nobody listens are dropped.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription. Dropping it unsubscribes.
pub struct Subscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl Subscription {
    /// Wait for the next event; `None` once every publisher is gone.
    ///
    /// A slow subscriber that falls behind skips the missed events: only the
    /// most recent session state matters.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Session subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            access_token: "token".into(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_events_in_order() {
        let events = SessionEvents::new();
        let mut sub = events.subscribe();
        let s = session();

        events.publish(SessionEvent::SignedIn(s.clone()));
        events.publish(SessionEvent::SignedOut);

        assert_eq!(sub.next().await, Some(SessionEvent::SignedIn(s)));
        assert_eq!(sub.next().await, Some(SessionEvent::SignedOut));
    }

    #[tokio::test]
    async fn dropping_a_subscription_unsubscribes() {
        let events = SessionEvents::new();
        let sub = events.subscribe();
        assert_eq!(events.subscriber_count(), 1);

        drop(sub);
        assert_eq!(events.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn stream_ends_when_publisher_is_gone() {
        let events = SessionEvents::new();
        let mut sub = events.subscribe();
        drop(events);
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn lagging_subscriber_keeps_the_latest_events() {
        let events = SessionEvents::new();
        let mut sub = events.subscribe();
        for _ in 0..40 {
            events.publish(SessionEvent::SignedOut);
        }
        let s = session();
        events.publish(SessionEvent::TokenRefreshed(s.clone()));
        drop(events);

        let mut last = None;
        while let Some(event) = sub.next().await {
            last = Some(event);
        }
        assert_eq!(last, Some(SessionEvent::TokenRefreshed(s)));
    }
}
