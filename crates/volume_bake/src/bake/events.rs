//! Event types and sinks for observing bakes.
//!
//! [`crate::bake::scheduler::BakeScheduler`] delivers [`BakeEvent`]s on the owner thread
//! from [`crate::bake::scheduler::BakeScheduler::poll`] and
//! [`crate::bake::scheduler::BakeScheduler::wait`].
use crate::bake::scheduler::{BakeHandle, TargetId};

/// Describes events emitted by the scheduler.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum BakeEvent {
    /// A bake was handed to a worker.
    Started { target: TargetId, handle: BakeHandle },

    /// A bake completed, successfully or not. Fired exactly once per started bake whose
    /// target still exists.
    Finished { target: TargetId, handle: BakeHandle },

    /// A request was ignored because the target was already baking.
    Skipped { target: TargetId },

    /// Non-fatal warning generated during a bake.
    Warning {
        /// Context string (e.g. target id, field name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`BakeEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: BakeEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: BakeEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(BakeEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(BakeEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(BakeEvent),
{
    #[inline]
    fn send(&mut self, event: BakeEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<BakeEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn as_slice(&self) -> &[BakeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of `Finished` events seen for `target`.
    pub fn finished_count(&self, target: TargetId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BakeEvent::Finished { target: t, .. } if *t == target))
            .count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: BakeEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> BakeEvent {
        BakeEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.as_slice()[1], warning("b"));
    }

    #[test]
    fn vec_sink_counts_finished_per_target() {
        let mut sink = VecSink::new();
        let a = TargetId::from_raw(1);
        let b = TargetId::from_raw(2);
        let handle = BakeHandle::from_raw(a, 7);
        sink.send(BakeEvent::Started { target: a, handle });
        sink.send(BakeEvent::Finished { target: a, handle });
        sink.send(BakeEvent::Skipped { target: b });
        assert_eq!(sink.finished_count(a), 1);
        assert_eq!(sink.finished_count(b), 0);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }
}
