//! Off-thread bake scheduling with per-target in-progress flags.
//!
//! The [`BakeScheduler`] lives on the thread that owns the destination buffers. Each
//! submission runs [`crate::bake::runner`] on its own worker thread; results travel back
//! over a channel and are uploaded from [`BakeScheduler::poll`] or [`BakeScheduler::wait`],
//! so the in-progress flag and the destination are only ever touched by the owner thread.
use std::collections::BTreeMap;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error, info, warn};

use crate::bake::events::{BakeEvent, EventSink};
use crate::bake::runner::{bake_from_registry, BakeOutput};
use crate::bake::settings::BakeSettings;
use crate::bake::sink::TextureSink;
use crate::encode::OutputFormat;
use crate::error::{Error, Result};
use crate::field::{FieldRegistry, SampleBuffer, SampleKind};

/// Identifies a registered bake target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(u64);

impl TargetId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token for one submitted bake. A completion is applied only while its handle is the
/// target's current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BakeHandle {
    target: TargetId,
    generation: u64,
}

impl BakeHandle {
    pub fn from_raw(target: TargetId, generation: u64) -> Self {
        Self { target, generation }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of [`BakeScheduler::submit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Started(BakeHandle),
    /// The target was already baking; nothing changed.
    Busy,
}

impl Submission {
    pub fn handle(&self) -> Option<BakeHandle> {
        match self {
            Self::Started(handle) => Some(*handle),
            Self::Busy => None,
        }
    }
}

/// What a successful bake wrote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BakeSummary {
    pub kind: SampleKind,
    /// Format the texture was encoded for.
    pub format: OutputFormat,
    pub byte_len: usize,
    pub normalized: bool,
}

/// Completion of one bake, handed to the caller by `poll`/`wait`.
#[derive(Debug)]
pub struct BakeReport {
    pub target: TargetId,
    pub handle: BakeHandle,
    pub result: Result<BakeSummary>,
}

impl BakeReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

struct Completion {
    handle: BakeHandle,
    result: Result<BakeOutput>,
}

struct Target {
    settings: BakeSettings,
    sink: Box<dyn TextureSink>,
    in_progress: Option<BakeHandle>,
    last_samples: Option<SampleBuffer>,
}

/// Owns bake targets and runs their bakes off-thread.
pub struct BakeScheduler {
    fields: Arc<FieldRegistry>,
    targets: BTreeMap<TargetId, Target>,
    next_id: u64,
    next_generation: u64,
    in_flight: usize,
    pending_events: Vec<BakeEvent>,
    worker_stack_size: Option<usize>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl BakeScheduler {
    pub fn new(fields: Arc<FieldRegistry>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            fields,
            targets: BTreeMap::new(),
            next_id: 1,
            next_generation: 1,
            in_flight: 0,
            pending_events: Vec::new(),
            worker_stack_size: None,
            tx,
            rx,
        }
    }

    /// Stack size of worker threads; the platform default when unset.
    pub fn with_worker_stack_size(mut self, bytes: usize) -> Self {
        self.worker_stack_size = Some(bytes);
        self
    }

    pub fn fields(&self) -> &Arc<FieldRegistry> {
        &self.fields
    }

    /// Validates `settings` and adds a target writing into `sink`.
    ///
    /// Submits right away when `settings.bake_on_start` is set.
    pub fn register(
        &mut self,
        settings: BakeSettings,
        sink: Box<dyn TextureSink>,
    ) -> Result<TargetId> {
        settings.validate()?;
        if sink.resolution() != settings.resolution {
            return Err(Error::InvalidConfig(format!(
                "destination is {}, settings request {}",
                sink.resolution(),
                settings.resolution
            )));
        }

        let id = TargetId(self.next_id);
        self.next_id += 1;
        let bake_on_start = settings.bake_on_start;
        debug!(
            "Registered target {} ({} {} from '{}').",
            id,
            settings.region.name(),
            settings.resolution,
            settings.field
        );
        self.targets.insert(
            id,
            Target {
                settings,
                sink,
                in_progress: None,
                last_samples: None,
            },
        );

        if bake_on_start {
            if let Err(e) = self.submit(id) {
                self.targets.remove(&id);
                return Err(e);
            }
        }
        Ok(id)
    }

    /// Drops a target. Completions of its outstanding bakes are discarded.
    pub fn remove(&mut self, id: TargetId) -> Result<()> {
        self.targets
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::UnknownTarget { id: id.0 })
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn targets(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets.keys().copied()
    }

    pub fn settings(&self, id: TargetId) -> Option<&BakeSettings> {
        self.targets.get(&id).map(|t| &t.settings)
    }

    /// Processed samples of the last successful bake.
    pub fn last_samples(&self, id: TargetId) -> Option<&SampleBuffer> {
        self.targets.get(&id).and_then(|t| t.last_samples.as_ref())
    }

    pub fn is_baking(&self, id: TargetId) -> bool {
        self.targets
            .get(&id)
            .is_some_and(|t| t.in_progress.is_some())
    }

    /// Bakes whose completion has not been received yet, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts a bake of `id` on a worker thread, or returns [`Submission::Busy`] if one is
    /// already running.
    pub fn submit(&mut self, id: TargetId) -> Result<Submission> {
        let generation = self.next_generation;
        let target = self
            .targets
            .get_mut(&id)
            .ok_or(Error::UnknownTarget { id: id.0 })?;
        if target.in_progress.is_some() {
            warn!("Target {} is already baking; ignoring request.", id);
            self.pending_events.push(BakeEvent::Skipped { target: id });
            return Ok(Submission::Busy);
        }

        let mut settings = target.settings.clone();
        let actual = target.sink.format();
        if actual != settings.format {
            warn!(
                "Target {} requested {} but the destination is {}; encoding for {}.",
                id, settings.format, actual, actual
            );
            self.pending_events.push(BakeEvent::Warning {
                context: id.to_string(),
                message: format!("destination format {actual} differs from {}", settings.format),
            });
            settings.format = actual;
        }

        let handle = BakeHandle { target: id, generation };
        let fields = Arc::clone(&self.fields);
        let tx = self.tx.clone();
        let mut builder = thread::Builder::new().name(format!("volume-bake-{}", id.0));
        if let Some(bytes) = self.worker_stack_size {
            builder = builder.stack_size(bytes);
        }
        builder.spawn(move || {
            // A panicking field still completes the bake, as a failure.
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| bake_from_registry(&settings, &fields)))
                    .unwrap_or_else(|payload| Err(worker_panic(&settings.field, payload)));
            // The scheduler may be gone; nothing left to notify then.
            let _ = tx.send(Completion { handle, result });
        })?;

        self.next_generation += 1;
        self.in_flight += 1;
        target.in_progress = Some(handle);
        self.pending_events.push(BakeEvent::Started { target: id, handle });
        info!(
            "Started bake of target {} ({}).",
            id, target.settings.resolution
        );
        Ok(Submission::Started(handle))
    }

    /// Submits every target that is not already baking; busy targets are skipped.
    pub fn rebake_all(&mut self) -> Vec<BakeHandle> {
        let ids: Vec<TargetId> = self.targets.keys().copied().collect();
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            match self.submit(id) {
                Ok(Submission::Started(handle)) => handles.push(handle),
                Ok(Submission::Busy) => {}
                Err(e) => {
                    error!("Failed to start bake of target {}: {}", id, e);
                    self.pending_events.push(BakeEvent::Warning {
                        context: id.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        handles
    }

    /// Applies every completion that has arrived, without blocking.
    pub fn poll(&mut self, events: &mut dyn EventSink) -> Vec<BakeReport> {
        self.flush_events(events);
        let mut reports = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(report) = self.complete(completion, events) {
                reports.push(report);
            }
        }
        reports
    }

    /// Blocks until at least one completion arrives or `timeout` elapses, then applies every
    /// completion that is ready.
    pub fn wait(&mut self, timeout: Duration, events: &mut dyn EventSink) -> Vec<BakeReport> {
        self.flush_events(events);
        let deadline = Instant::now() + timeout;
        let mut reports = Vec::new();
        while reports.is_empty() && self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if let Some(report) = self.complete(completion, events) {
                        reports.push(report);
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        reports.extend(self.poll(events));
        reports
    }

    /// Waits until nothing is in flight or `timeout` elapses.
    pub fn wait_idle(&mut self, timeout: Duration, events: &mut dyn EventSink) -> Vec<BakeReport> {
        let deadline = Instant::now() + timeout;
        let mut reports = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            reports.extend(self.wait(remaining, events));
        }
        self.flush_events(events);
        reports
    }

    fn flush_events(&mut self, events: &mut dyn EventSink) {
        for event in self.pending_events.drain(..) {
            events.send(event);
        }
    }

    fn complete(
        &mut self,
        completion: Completion,
        events: &mut dyn EventSink,
    ) -> Option<BakeReport> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let handle = completion.handle;
        let id = handle.target;
        let Some(target) = self.targets.get_mut(&id) else {
            debug!("Dropping completion for removed target {}.", id);
            return None;
        };
        if target.in_progress != Some(handle) {
            debug!(
                "Dropping stale completion for target {} (generation {}).",
                id, handle.generation
            );
            return None;
        }
        target.in_progress = None;

        let result = completion.result.and_then(|output| {
            let actual = target.sink.format();
            if actual != output.texture.format {
                return Err(Error::FormatMismatch {
                    expected: output.texture.format,
                    actual,
                });
            }
            target.sink.upload(&output.texture)?;
            let summary = BakeSummary {
                kind: output.kind,
                format: output.texture.format,
                byte_len: output.texture.bytes.len(),
                normalized: output.summary.normalized,
            };
            target.last_samples = Some(output.samples);
            Ok(summary)
        });

        match &result {
            Ok(summary) => info!(
                "Finished bake of target {} ({} bytes of {}).",
                id, summary.byte_len, summary.format
            ),
            Err(e) => error!("Bake of target {} failed: {}", id, e),
        }
        events.send(BakeEvent::Finished { target: id, handle });
        Some(BakeReport {
            target: id,
            handle,
            result,
        })
    }
}

fn worker_panic(field: &str, payload: Box<dyn Any + Send>) -> Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    Error::Other(format!("bake of field '{field}' panicked: {message}"))
}
