use async_graphql::Subscription;
use futures_util::Stream;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::gql::types::RegistrationEvent;

static REGISTRATION_BROADCASTER: Lazy<Arc<Mutex<broadcast::Sender<RegistrationEvent>>>> =
    Lazy::new(|| {
        let (tx, _) = broadcast::channel(1000);
        Arc::new(Mutex::new(tx))
    });

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Successful registrations across all tournaments, as they land.
    async fn registration_events(
        &self,
    ) -> impl Stream<Item = Result<RegistrationEvent, BroadcastStreamRecvError>> {
        let receiver = REGISTRATION_BROADCASTER.lock().unwrap().subscribe();
        BroadcastStream::new(receiver)
    }
}

pub fn publish_registration_event(event: RegistrationEvent) {
    if let Ok(sender) = REGISTRATION_BROADCASTER.lock() {
        let _ = sender.send(event);
    }
}
