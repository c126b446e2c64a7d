//! Event sink port
//!
//! The single boundary through which a research run reports progress.
//! Every layer (relay, orchestrator, agent) passes the same sink down,
//! so ordering is enforced in one place.

use localmind_domain::LifecycleEvent;

/// Receiver of lifecycle events
///
/// `emit` is synchronous and must not block: implementations forward to a
/// channel, a terminal, or a buffer. Events are delivered in the order
/// `emit` is called.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LifecycleEvent);

    /// Receive an event stamped with seconds since its run started.
    ///
    /// Sinks that do not show timing drop the stamp.
    fn emit_timed(&self, event: LifecycleEvent, _elapsed: f64) {
        self.emit(event);
    }
}

/// No-op sink for when progress reporting is not needed
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: LifecycleEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: LifecycleEvent) {
        (**self).emit(event);
    }

    fn emit_timed(&self, event: LifecycleEvent, elapsed: f64) {
        (**self).emit_timed(event, elapsed);
    }
}
