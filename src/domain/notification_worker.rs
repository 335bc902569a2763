//! Fire-and-forget webhook delivery.
//!
//! Resolution hands events to a [`NotificationDispatcher`], which pushes them
//! onto a bounded queue without waiting. [`run_notification_worker`] drains the
//! queue on its own task, so deliveries never share the cancellation scope or
//! deadline of the request that triggered them.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::notifier::{Notifier, NotifyError};

/// Producer side of the notification queue.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<AccessEvent>,
}

impl NotificationDispatcher {
    pub fn new(sender: mpsc::Sender<AccessEvent>) -> Self {
        Self { sender }
    }

    /// Creates a dispatcher and the receiver its worker should drain.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AccessEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }

    /// Queues a notification for `short_key` if the link has a webhook.
    ///
    /// Does nothing when `webhook_url` is `None`. Never blocks: a full or
    /// closed queue drops the event with a warning.
    ///
    /// Returns true if an event was queued.
    pub fn dispatch(&self, short_key: &str, user_agent: &str, webhook_url: Option<&str>) -> bool {
        let Some(webhook_url) = webhook_url else {
            return false;
        };

        match self
            .sender
            .try_send(AccessEvent::new(short_key, user_agent, webhook_url))
        {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                counter!("notifications_dropped_total").increment(1);
                warn!(short_key = %event.short_key, "Notification queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                counter!("notifications_dropped_total").increment(1);
                warn!(short_key = %event.short_key, "Notification queue closed, dropping event");
                false
            }
        }
    }

    /// Returns true once the worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Drains the notification queue until every dispatcher is dropped.
///
/// Up to `concurrency` deliveries run at once; each gets `timeout` to finish.
/// Failures are logged and counted, never retried. Returns after the last
/// in-flight delivery completes.
pub async fn run_notification_worker(
    mut receiver: mpsc::Receiver<AccessEvent>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    timeout: Duration,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = receiver.recv().await {
        while in_flight.try_join_next().is_some() {}

        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let notifier = notifier.clone();

        in_flight.spawn(async move {
            let _permit = permit;
            deliver(notifier.as_ref(), &event, timeout).await
        });
    }

    while in_flight.join_next().await.is_some() {}

    info!("Notification worker stopped");
}

/// Makes a single delivery attempt under `timeout`.
///
/// Returns true on a 2xx response.
pub async fn deliver(notifier: &dyn Notifier, event: &AccessEvent, timeout: Duration) -> bool {
    let payload = event.payload();

    let result = match tokio::time::timeout(timeout, notifier.notify(&event.webhook_url, &payload))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout(timeout)),
    };

    match result {
        Ok(()) => {
            debug!(short_key = %event.short_key, "Webhook delivered");
            counter!("notifications_sent_total").increment(1);
            true
        }
        Err(e) => {
            warn!(
                short_key = %event.short_key,
                endpoint = %event.webhook_url,
                "Webhook delivery failed: {}",
                e
            );
            counter!("notifications_failed_total").increment(1);
            false
        }
    }
}
