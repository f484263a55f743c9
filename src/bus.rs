//! Publish/subscribe surface between the worker and its observers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::events::{Event, ProgressEvent, ResultEvent};

#[derive(Default)]
struct Subscribers {
    progress: Vec<Sender<ProgressEvent>>,
    results: Vec<Sender<ResultEvent>>,
    merged: Vec<Sender<Event>>,
}

/// Fan-out of progress and result events to any number of subscribers.
///
/// Channels are unbounded, so publishing never waits on a slow consumer.
/// Subscribers only see events published after they subscribed.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream of progress events only.
    pub fn subscribe_progress(&self) -> Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().progress.push(tx);
        rx
    }

    /// Stream of result (notification) events only.
    pub fn subscribe_results(&self) -> Receiver<ResultEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().results.push(tx);
        rx
    }

    /// Both streams merged in publication order, for a consumer that drains
    /// everything from a single thread.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.lock().merged.push(tx);
        rx
    }

    pub fn publish_progress(&self, event: ProgressEvent) {
        tracing::trace!(?event, "progress");
        let mut subs = self.lock();
        subs.progress.retain(|tx| tx.send(event).is_ok());
        subs.merged.retain(|tx| tx.send(Event::Progress(event)).is_ok());
    }

    pub fn publish_result(&self, event: ResultEvent) {
        tracing::debug!(title = %event.title, success = event.success, "result");
        let mut subs = self.lock();
        subs.results.retain(|tx| tx.send(event.clone()).is_ok());
        subs.merged.retain(|tx| tx.send(Event::Result(event.clone())).is_ok());
    }

    /// Number of live subscriptions across all streams.
    pub fn subscriber_count(&self) -> usize {
        let subs = self.lock();
        subs.progress.len() + subs.results.len() + subs.merged.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        // Sender lists stay consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_subscriber_sees_no_replay() {
        let bus = EventBus::new();
        bus.publish_result(ResultEvent::success("a", "b"));
        let rx = bus.subscribe_results();
        assert!(rx.try_recv().is_err());
        bus.publish_result(ResultEvent::success("c", "d"));
        assert_eq!(rx.try_recv().unwrap().title, "c");
    }

    #[test]
    fn merged_stream_preserves_order_across_kinds() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        bus.publish_progress(ProgressEvent::Starting { total: 1 });
        bus.publish_progress(ProgressEvent::Advanced { completed: 1 });
        bus.publish_progress(ProgressEvent::Finished);
        bus.publish_result(ResultEvent::success("t", "m"));
        let got: Vec<Event> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                Event::Progress(ProgressEvent::Starting { total: 1 }),
                Event::Progress(ProgressEvent::Advanced { completed: 1 }),
                Event::Progress(ProgressEvent::Finished),
                Event::Result(ResultEvent::success("t", "m")),
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe_progress();
        drop(bus.subscribe_progress());
        drop(bus.subscribe_results());
        assert_eq!(bus.subscriber_count(), 3);
        bus.publish_progress(ProgressEvent::Finished);
        bus.publish_result(ResultEvent::success("t", "m"));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.recv().unwrap(), ProgressEvent::Finished);
    }
}
