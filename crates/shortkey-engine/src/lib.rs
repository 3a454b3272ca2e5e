//! Shortkey Engine
//!
//! Resolves a stream of raw key presses into at most one action per press:
//! - chords (`cmd+k`, `shift+n`, `?`) fire immediately
//! - two-key sequences (`g d`) fire when the second key arrives within the timeout
//! - keys typed into editable targets are never intercepted
//!
//! The API is small:
//! - [`KeySource`]: the host's key-event stream, with a single listener slot
//! - [`configure`]: attach a [`Dispatcher`] to a source and get a [`Handle`]
//! - [`Dispatcher`]: the resolver itself, usable without a source
//!
//! Dispatching is synchronous and never fails. The only background work is the
//! sequence deadline, which runs on the ambient tokio runtime.

mod deadline;
mod dispatcher;
mod error;
mod event;
mod handle;
mod resolver;
mod source;

use std::sync::Arc;

pub use dispatcher::{ActionHandler, Disposition, Dispatcher, Options};
pub use error::{Error, Result};
pub use event::{KeyEvent, Target};
pub use handle::Handle;
pub use keymap::{ActionId, BindingTable};
pub use resolver::Trigger;
pub use source::KeySource;

/// Build a dispatcher over `table` and attach it to `source`.
///
/// Any listener previously attached to `source` is torn down first. Fired actions
/// are passed to `handler`. Must be called from within a tokio runtime.
pub fn configure<H>(
    source: &KeySource,
    table: BindingTable,
    handler: H,
    options: Options,
) -> Result<Handle>
where
    H: ActionHandler + 'static,
{
    let dispatcher = Arc::new(Dispatcher::new(table, handler, options)?);
    let id = source.attach(dispatcher.clone());
    Ok(Handle::new(source.clone(), id, dispatcher))
}
