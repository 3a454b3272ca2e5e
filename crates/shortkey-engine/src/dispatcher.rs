use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use keymap::{ActionId, BindingTable, Config, DEFAULT_SEQUENCE_TIMEOUT_MS};
use keyspec::normalize_key;
use parking_lot::Mutex;
use tokio::{runtime::Handle, time::Instant};
use tracing::{debug, trace};

use crate::{
    Error, KeyEvent, Result,
    deadline::DeadlineTimer,
    resolver::{Resolution, Resolver, Trigger},
};

/// Receives the identifier of every action the dispatcher fires.
pub trait ActionHandler: Send + Sync {
    /// Called synchronously from within the key event that fired `action`.
    fn invoke(&self, action: &ActionId);
}

impl<F> ActionHandler for F
where
    F: Fn(&ActionId) + Send + Sync,
{
    fn invoke(&self, action: &ActionId) {
        self(action)
    }
}

/// Dispatcher tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Window for completing a two-key sequence.
    pub sequence_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sequence_timeout: Duration::from_millis(DEFAULT_SEQUENCE_TIMEOUT_MS),
        }
    }
}

impl From<&Config> for Options {
    fn from(cfg: &Config) -> Self {
        Self {
            sequence_timeout: cfg.sequence_timeout(),
        }
    }
}

/// What the dispatcher did with one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The event targeted an editable element and was ignored.
    Suppressed,
    /// An action fired; the host should suppress the event's default behaviour.
    Fired {
        /// The fired action.
        action: ActionId,
        /// Rule that matched.
        trigger: Trigger,
    },
    /// The key armed a sequence. The event is not consumed.
    Pending {
        /// The pending first key.
        first: String,
    },
    /// Nothing matched; the event passes through untouched.
    Unmatched,
}

impl Disposition {
    /// True when the host should suppress the event's default behaviour.
    pub fn handled(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }

    /// The fired action, if any.
    pub fn action(&self) -> Option<&ActionId> {
        match self {
            Self::Fired { action, .. } => Some(action),
            _ => None,
        }
    }
}

/// Mutable dispatcher state, guarded by one lock.
struct Core {
    /// Classification state machine.
    resolver: Resolver,
    /// Deadline for the pending sequence; armed exactly when the resolver is pending.
    timer: DeadlineTimer,
    /// Set on teardown; a detached dispatcher never fires.
    detached: bool,
}

impl Core {
    /// Bring the timer in line with the resolver's pending state.
    fn sync_timer(&mut self, core: &Weak<Mutex<Self>>) {
        match self.resolver.pending_generation() {
            Some(generation) if self.timer.generation() != Some(generation) => {
                let weak = core.clone();
                self.timer
                    .arm(generation, self.resolver.timeout(), move || {
                        if let Some(core) = weak.upgrade() {
                            core.lock().resolver.expire(generation);
                        }
                    });
            }
            Some(_) => {}
            None => self.timer.cancel(),
        }
    }
}

/// Resolves key events against a binding table, one at a time, in arrival order.
///
/// Most hosts attach a dispatcher to a [`crate::KeySource`] through [`crate::configure`];
/// it can also be driven directly with [`Dispatcher::dispatch`].
pub struct Dispatcher {
    /// State shared with the deadline task.
    core: Arc<Mutex<Core>>,
    /// Receives fired actions. Never called with the lock held.
    handler: Arc<dyn ActionHandler>,
}

impl Dispatcher {
    /// Create a dispatcher. Must be called from within a tokio runtime.
    pub fn new<H>(table: BindingTable, handler: H, options: Options) -> Result<Self>
    where
        H: ActionHandler + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        debug!(
            "Dispatcher created: {} bindings, sequence timeout {:?}",
            table.len(),
            options.sequence_timeout
        );
        let core = Core {
            resolver: Resolver::new(Arc::new(table), options.sequence_timeout),
            timer: DeadlineTimer::new(runtime),
            detached: false,
        };
        Ok(Self {
            core: Arc::new(Mutex::new(core)),
            handler: Arc::new(handler),
        })
    }

    /// Classify one key event and invoke at most one action.
    ///
    /// A detached dispatcher reports every event as `Unmatched`, editable targets
    /// included.
    pub fn dispatch(&self, event: &KeyEvent) -> Disposition {
        let key = normalize_key(&event.key);
        let mods = event.modifiers();

        let resolution = {
            let mut core = self.core.lock();
            if core.detached {
                trace!("Key '{}' after teardown ignored", key);
                return Disposition::Unmatched;
            }
            if event.target.is_editable() {
                trace!("Key '{}' ignored in editable target", key);
                return Disposition::Suppressed;
            }
            let resolution = core.resolver.resolve(&key, mods, Instant::now());
            core.sync_timer(&Arc::downgrade(&self.core));
            resolution
        };

        match resolution {
            Resolution::Fire { action, trigger } => {
                debug!("Key '{}{}' fired {} ({:?})", mods.prefix(), key, action, trigger);
                self.handler.invoke(&action);
                Disposition::Fired { action, trigger }
            }
            Resolution::Armed { first } => Disposition::Pending { first },
            Resolution::Pass => Disposition::Unmatched,
        }
    }

    /// Replace the binding table atomically and drop any pending sequence.
    pub fn rebind(&self, table: BindingTable) {
        let mut core = self.core.lock();
        debug!("Rebinding dispatcher: {} bindings", table.len());
        core.resolver.set_table(Arc::new(table));
        core.sync_timer(&Arc::downgrade(&self.core));
    }

    /// First key of the pending sequence, if one is in progress.
    pub fn pending_key(&self) -> Option<String> {
        self.core.lock().resolver.pending_key().map(str::to_string)
    }

    /// True once [`Dispatcher::detach`] has run.
    pub fn is_detached(&self) -> bool {
        self.core.lock().detached
    }

    /// Tear down: clear pending state, cancel the deadline, and refuse further events.
    pub fn detach(&self) {
        let mut core = self.core.lock();
        if core.detached {
            return;
        }
        core.detached = true;
        core.resolver.reset();
        core.timer.cancel();
        debug!("Dispatcher detached");
    }
}
