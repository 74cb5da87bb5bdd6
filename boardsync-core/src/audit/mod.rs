//! Audit log fan-out.
//!
//! Every mutation attempt produces one [`LogRecord`]. The [`LogPublisher`]
//! hands it to each subscribed [`LogObserver`] in order, isolating failures
//! per observer.

mod publisher;
mod record;
mod sinks;

pub use publisher::{LogObserver, LogPublisher};
pub use record::{LogRecord, LogType};
#[cfg(feature = "rt")]
pub use sinks::FileSink;
pub use sinks::{ConsoleSink, MemorySink};
