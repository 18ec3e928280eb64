// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push-based plugin discovery feed.
//!
//! The feed delivers `PluginsAdded` / `PluginsRemoved` batches synchronously
//! to every live subscriber, in publication order. Subscribers are held
//! weakly; a [`Subscription`] guard deregisters its listener when dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::trace;

use crate::descriptor::PluginDescriptor;

/// A batch notification emitted by the discovery feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginEvent {
    Added(Vec<PluginDescriptor>),
    Removed(Vec<PluginDescriptor>),
}

impl PluginEvent {
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        match self {
            PluginEvent::Added(d) | PluginEvent::Removed(d) => d,
        }
    }
}

/// Handlers invoked by the feed.
///
/// Handlers run on the publishing thread while publication is serialized.
/// They may read the publishing service but must not publish on the same feed.
pub trait PluginListener: Send + Sync {
    fn on_plugins_added(&self, descriptors: &[PluginDescriptor]);

    fn on_plugins_removed(&self, descriptors: &[PluginDescriptor]);
}

#[derive(Default)]
struct FeedInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Weak<dyn PluginListener>)>>,
    publishing: Mutex<()>,
}

/// Shared handle to a discovery feed.
#[derive(Clone, Default)]
pub struct PluginFeed {
    inner: Arc<FeedInner>,
}

impl PluginFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it receives every event published after this call.
    pub fn subscribe(&self, listener: Weak<dyn PluginListener>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        trace!(subscription = id, "plugin feed subscriber added");
        Subscription {
            id,
            feed: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: &PluginEvent) {
        let _serial = self
            .inner
            .publishing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let listeners: Vec<Arc<dyn PluginListener>> = {
            let mut listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|(_, l)| l.strong_count() > 0);
            listeners.iter().filter_map(|(_, l)| l.upgrade()).collect()
        };

        trace!(
            subscribers = listeners.len(),
            descriptors = event.descriptors().len(),
            "publishing plugin event"
        );
        for listener in listeners {
            match event {
                PluginEvent::Added(d) => listener.on_plugins_added(d),
                PluginEvent::Removed(d) => listener.on_plugins_removed(d),
            }
        }
    }

    /// Number of registered subscriptions whose listener is still alive.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }
}

/// Keeps a listener registered with a [`PluginFeed`]. Dropping it deregisters.
#[must_use = "dropping a Subscription deregisters the listener"]
pub struct Subscription {
    id: u64,
    feed: Weak<FeedInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
            trace!(subscription = self.id, "plugin feed subscriber removed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin_descriptor;
    use plexus_core::Kind;

    trait Widget: Send + Sync {}
    impl Kind for dyn Widget {}

    #[derive(Default)]
    struct Knob;
    impl Kind for Knob {}
    impl Widget for Knob {}

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl PluginListener for Recorder {
        fn on_plugins_added(&self, descriptors: &[PluginDescriptor]) {
            for d in descriptors {
                self.log.lock().unwrap().push(format!("+{}", d.name()));
            }
        }

        fn on_plugins_removed(&self, descriptors: &[PluginDescriptor]) {
            for d in descriptors {
                self.log.lock().unwrap().push(format!("-{}", d.name()));
            }
        }
    }

    fn subscribe(feed: &PluginFeed, recorder: &Arc<Recorder>) -> Subscription {
        let weak: Weak<Recorder> = Arc::downgrade(recorder);
        feed.subscribe(weak)
    }

    #[test]
    fn events_arrive_in_publication_order() {
        let feed = PluginFeed::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = subscribe(&feed, &recorder);

        let knob = plugin_descriptor!(Knob => dyn Widget);
        feed.publish(&PluginEvent::Added(vec![knob.clone()]));
        feed.publish(&PluginEvent::Removed(vec![knob]));

        assert_eq!(*recorder.log.lock().unwrap(), vec!["+Knob", "-Knob"]);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let feed = PluginFeed::new();
        let recorder = Arc::new(Recorder::default());
        let sub = subscribe(&feed, &recorder);
        assert_eq!(feed.subscriber_count(), 1);

        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);

        feed.publish(&PluginEvent::Added(vec![plugin_descriptor!(Knob => dyn Widget)]));
        assert!(recorder.log.lock().unwrap().is_empty());
    }

    #[test]
    fn dead_listeners_are_skipped() {
        let feed = PluginFeed::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = subscribe(&feed, &recorder);
        drop(recorder);

        assert_eq!(feed.subscriber_count(), 0);
        feed.publish(&PluginEvent::Added(vec![plugin_descriptor!(Knob => dyn Widget)]));
    }
}
