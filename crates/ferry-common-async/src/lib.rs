//! Async runtime utilities.
//!
//! Cooperative cancellation for long-running transfers and an injectable
//! sleep abstraction so retry loops can be driven without real delays.

pub mod cancel;
pub mod sleep;

pub use cancel::CancellationToken;
pub use sleep::{Sleeper, TokioSleeper};
