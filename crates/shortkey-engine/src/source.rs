use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{Disposition, Dispatcher, KeyEvent};

/// The attached listener and the id it was attached under.
struct Subscription {
    /// Identifies this attachment so a stale handle cannot detach a newer one.
    id: u64,
    /// The attached dispatcher.
    dispatcher: Arc<Dispatcher>,
}

/// The host's key-event stream. Holds at most one listener.
///
/// The host calls [`KeySource::emit`] for every physical key press and uses the
/// returned [`Disposition`] to decide whether to suppress default behaviour.
#[derive(Clone, Default)]
pub struct KeySource {
    /// The single listener slot.
    slot: Arc<Mutex<Option<Subscription>>>,
    /// Source of subscription ids.
    next_id: Arc<AtomicU64>,
}

impl KeySource {
    /// A source with no listener attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one key event to the attached listener, if any.
    ///
    /// The slot lock is released before dispatching, so actions may reconfigure
    /// or dispose the listener from inside their handler.
    pub fn emit(&self, event: &KeyEvent) -> Disposition {
        let dispatcher = self.slot.lock().as_ref().map(|s| s.dispatcher.clone());
        match dispatcher {
            Some(d) => d.dispatch(event),
            None => Disposition::Unmatched,
        }
    }

    /// True when a listener is attached.
    pub fn is_attached(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Attach `dispatcher`, tearing down any previous listener. Returns the new id.
    pub(crate) fn attach(&self, dispatcher: Arc<Dispatcher>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self.slot.lock().replace(Subscription { id, dispatcher });
        if let Some(prev) = previous {
            debug!("Replacing key listener {} with {}", prev.id, id);
            prev.dispatcher.detach();
        } else {
            debug!("Attached key listener {}", id);
        }
        id
    }

    /// Remove the listener attached under `id`. A mismatched id is a no-op.
    pub(crate) fn detach(&self, id: u64) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(s) if s.id == id => {
                *slot = None;
                debug!("Detached key listener {}", id);
                true
            }
            _ => false,
        }
    }
}
