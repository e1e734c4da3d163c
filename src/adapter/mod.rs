//! Seam between the connector and the extraction/loading framework
//!
//! The framework delivers one [`Event`] per invocation and expects exactly
//! one outbound [`Signal`] back. Workers read the event and checkpoint state
//! through a [`WorkerAdapter`], push items into [`Repo`]s, and emit their
//! signal through an [`Emitter`].

mod emitter;
mod event;
mod item;
mod repo;
mod signal;
mod state;
mod worker;

pub use emitter::{Emitter, RecordingEmitter, StdoutEmitter};
pub use event::{
    Event, EventContext, EventPayload, EventType, ExecutionMetadata, InvocationContext, Secrets,
};
pub use item::{ItemId, LoadingResponse, NormalizedItem, PlatformItem};
pub use repo::Repo;
pub use signal::{
    Emission, EventData, ExternalSyncUnit, ExtractorEventType, LoaderEventType, LoaderReport,
    Signal, SignalError,
};
pub use state::{ExtractorState, LoaderState, ResourceProgress};
pub use worker::{ItemLoader, LoaderInput, Worker, WorkerAdapter, process_task};
