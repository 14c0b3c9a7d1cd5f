//! Bake orchestration: configuration, the synchronous pipeline, destinations, events and
//! off-thread scheduling.
pub mod events;
pub mod runner;
pub mod scheduler;
pub mod settings;
pub mod sink;

pub use events::{BakeEvent, EventSink, FnSink, VecSink};
pub use runner::{bake_from_registry, run_bake, BakeOutput};
pub use scheduler::{BakeHandle, BakeReport, BakeScheduler, BakeSummary, Submission, TargetId};
pub use settings::BakeSettings;
pub use sink::{MemoryTexture, TextureSink};
