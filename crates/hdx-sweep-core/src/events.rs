//! A lightweight event system, patterned on the teacher's
//! `tower_resilience_core::events`: a trait for observable occurrences plus a
//! `Vec`-backed collection of listeners, used by the scheduler, retry, and
//! prober crates for logging/metrics hooks without coupling them to a
//! concrete subscriber.

use std::fmt;
use std::sync::Arc;

/// Trait for events emitted during a sweep.
pub trait SweepEvent: Send + Sync + fmt::Debug {
    /// A short, stable name for the event (e.g. `"probe_retried"`).
    fn kind(&self) -> &'static str;
}

/// Trait for listening to [`SweepEvent`]s.
pub trait EventListener<E: SweepEvent>: Send + Sync {
    fn on_event(&self, event: &E);
}

type BoxedListener<E> = Arc<dyn EventListener<E>>;

/// A collection of event listeners for one event type.
#[derive(Clone)]
pub struct EventListeners<E: SweepEvent> {
    listeners: Vec<BoxedListener<E>>,
}

impl<E: SweepEvent> EventListeners<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add<L: EventListener<E> + 'static>(&mut self, listener: L) {
        self.listeners.push(Arc::new(listener));
    }

    /// Emits an event to every registered listener. A panicking listener is
    /// logged and skipped; it never prevents the remaining listeners from
    /// running or aborts the sweep.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listener.on_event(event)));
            if result.is_err() {
                tracing::warn!(event_kind = event.kind(), "sweep event listener panicked");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: SweepEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A function-based listener, for inline registration without a named type.
pub struct FnListener<E, F: Fn(&E) + Send + Sync> {
    f: F,
    _marker: std::marker::PhantomData<E>,
}

impl<E, F: Fn(&E) + Send + Sync> FnListener<E, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<E: SweepEvent, F: Fn(&E) + Send + Sync> EventListener<E> for FnListener<E, F> {
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Tick;

    impl SweepEvent for Tick {
        fn kind(&self) -> &'static str {
            "tick"
        }
    }

    #[test]
    fn listeners_are_invoked_in_order() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let mut listeners = EventListeners::new();
        listeners.add(FnListener::new(move |_: &Tick| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        listeners.emit(&Tick);
        listeners.emit(&Tick);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_listener_does_not_stop_others() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let mut listeners = EventListeners::new();
        listeners.add(FnListener::new(|_: &Tick| panic!("boom")));
        listeners.add(FnListener::new(move |_: &Tick| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        listeners.emit(&Tick);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
