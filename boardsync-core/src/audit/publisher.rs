use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::record::LogRecord;
use crate::error::{panic_message, SinkError};

/// Receives every record the publisher emits
pub trait LogObserver: Send + Sync {
    /// Short name used when reporting failures
    fn name(&self) -> &'static str;

    fn update(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Fans records out to observers, in subscription order.
#[derive(Clone, Default)]
pub struct LogPublisher {
    observers: Vec<Arc<dyn LogObserver>>,
}

fn same_observer(a: &Arc<dyn LogObserver>, b: &Arc<dyn LogObserver>) -> bool {
    // Compare data pointers only; vtable pointers are not unique.
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. Returns false if it was already subscribed.
    pub fn subscribe(&mut self, observer: Arc<dyn LogObserver>) -> bool {
        if self.observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, observer: &Arc<dyn LogObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `record` to every observer. A failing or panicking observer is
    /// reported and skipped; the rest still receive the record. Returns how
    /// many accepted it.
    pub fn notify(&self, record: &LogRecord) -> usize {
        let mut delivered = 0;
        for observer in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| observer.update(record))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::error!(
                        sink = observer.name(),
                        log_id = %record.log_id,
                        error = %e,
                        "log sink failed"
                    );
                }
                Err(payload) => {
                    tracing::error!(
                        sink = observer.name(),
                        log_id = %record.log_id,
                        panic = %panic_message(payload.as_ref()),
                        "log sink panicked"
                    );
                }
            }
        }
        delivered
    }
}

impl std::fmt::Debug for LogPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|o| o.name()))
            .finish()
    }
}
