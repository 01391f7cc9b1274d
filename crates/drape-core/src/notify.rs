//! Per-owner notification and request channels.
//!
//! A widget that announces state changes owns a [`Notifier`]; anyone
//! interested calls [`Notifier::subscribe`] and keeps the returned
//! [`Subscriber`]. Dropping the subscriber is the unsubscribe: the notifier
//! prunes closed channels on the next send.
//!
//! The opposite direction uses [`request_channel`]: the widget keeps the
//! [`RequestQueue`] and hands out cloneable [`Requester`]s. Requests are
//! queued and applied the next time the widget is polled, so they never
//! re-enter the widget from a foreign call stack.

use crate::error::{Error, Result};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Fan-out sender owned by the notifying widget.
#[derive(Debug)]
pub struct Notifier<T> {
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T: Clone + Send + 'static> Notifier<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a new subscriber. It receives every value sent after this
    /// call.
    pub fn subscribe(&mut self) -> Subscriber<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        Subscriber { rx }
    }

    /// Deliver `value` to every live subscriber and return how many received
    /// it. Subscribers that were dropped are forgotten.
    pub fn notify(&mut self, value: T) -> usize {
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        self.subscribers.len()
    }

    /// Number of subscribers that have not been dropped.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

impl<T: Clone + Send + 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a [`Notifier`] subscription.
#[derive(Debug)]
pub struct Subscriber<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T: Send + 'static> Subscriber<T> {
    /// Next queued value without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next value. `None` once the notifier is gone and the
    /// queue is empty.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Every value queued so far.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Consume the subscriber as a [`futures::Stream`].
    pub fn into_stream(self) -> UnboundedReceiverStream<T> {
        UnboundedReceiverStream::new(self.rx)
    }
}

/// Create a request channel: a cloneable sending handle and the queue the
/// owner drains.
pub fn request_channel<T>() -> (Requester<T>, RequestQueue<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Requester { tx }, RequestQueue { rx })
}

/// Sending half of a request channel. Cheap to clone and `Send`.
#[derive(Debug)]
pub struct Requester<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Requester<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Requester<T> {
    /// Queue a request for the owner.
    pub fn send(&self, request: T) -> Result<()> {
        self.tx
            .send(request)
            .map_err(|_| Error::RequestChannelClosed)
    }
}

/// Receiving half of a request channel, kept by the owning widget.
#[derive(Debug)]
pub struct RequestQueue<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> RequestQueue<T> {
    /// Requests queued since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(request) = self.rx.try_recv() {
            out.push(request);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn notifies_every_subscriber() {
        let mut notifier = Notifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();
        assert_eq!(notifier.notify(7), 2);
        assert_eq!(a.try_next(), Some(7));
        assert_eq!(b.drain(), vec![7]);
        assert_eq!(a.try_next(), None);
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let mut notifier = Notifier::new();
        let keep = notifier.subscribe();
        let gone = notifier.subscribe();
        drop(gone);
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(notifier.notify("x"), 1);
        drop(keep);
        assert_eq!(notifier.notify("y"), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_values() {
        let mut notifier = Notifier::new();
        notifier.notify(1);
        let mut late = notifier.subscribe();
        notifier.notify(2);
        assert_eq!(late.drain(), vec![2]);
    }

    #[tokio::test]
    async fn subscriber_as_stream() {
        let mut notifier = Notifier::new();
        let sub = notifier.subscribe();
        notifier.notify(1);
        notifier.notify(2);
        drop(notifier);
        let values: Vec<i32> = sub.into_stream().collect().await;
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test]
    async fn subscriber_next_waits_for_value() {
        let mut notifier = Notifier::new();
        let mut sub = notifier.subscribe();
        let handle = tokio::spawn(async move { sub.next().await });
        notifier.notify(5u8);
        assert_eq!(handle.await.ok().flatten(), Some(5));
    }

    #[test]
    fn requests_queue_in_order() {
        let (tx, mut queue) = request_channel();
        let tx2 = tx.clone();
        tx.send(1).ok();
        tx2.send(2).ok();
        assert_eq!(queue.drain(), vec![1, 2]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn request_to_dropped_queue_fails() {
        let (tx, queue) = request_channel::<u8>();
        drop(queue);
        assert!(matches!(tx.send(1), Err(Error::RequestChannelClosed)));
    }
}
