use std::sync::Arc;

use keymap::BindingTable;

use crate::{Dispatcher, KeySource};

/// Ownership of an attached dispatcher.
///
/// Dropping or disposing the handle detaches the listener from its source and
/// cancels any pending sequence deadline. No action fires after that.
pub struct Handle {
    /// Source the dispatcher is attached to.
    source: KeySource,
    /// Subscription id on `source`.
    id: u64,
    /// The attached dispatcher.
    dispatcher: Arc<Dispatcher>,
    /// Set once released.
    released: bool,
}

impl Handle {
    /// Wrap an attachment made on `source` under `id`.
    pub(crate) fn new(source: KeySource, id: u64, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            source,
            id,
            dispatcher,
            released: false,
        }
    }

    /// Replace the binding table in place. Pending sequence state is dropped.
    pub fn rebind(&self, table: BindingTable) {
        self.dispatcher.rebind(table);
    }

    /// First key of the pending sequence, if any.
    pub fn pending_key(&self) -> Option<String> {
        self.dispatcher.pending_key()
    }

    /// False once this handle was disposed or its dispatcher was replaced by a
    /// later `configure` on the same source.
    pub fn is_active(&self) -> bool {
        !self.dispatcher.is_detached()
    }

    /// Detach from the source and cancel any pending deadline.
    pub fn dispose(mut self) {
        self.release();
    }

    /// Shared teardown for `dispose` and `Drop`.
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.source.detach(self.id);
        self.dispatcher.detach();
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.release();
    }
}
