use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the shortkey engine.
///
/// Dispatching a key event never fails; errors only arise while wiring the engine up.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine was configured outside a tokio runtime, so it cannot schedule
    /// sequence deadlines.
    #[error("shortkey engine requires a tokio runtime")]
    NoRuntime,
}
