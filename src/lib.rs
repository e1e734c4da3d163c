//! Maple snap-in
//!
//! Extracts Maple customers and knowledge-base articles, delivered as a ZIP
//! archive or a static fixture, into normalized items, and loads platform
//! items back through the Maple client.

pub mod adapter;
pub mod archive;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod etl;
pub mod extraction;
pub mod loading;
pub mod maple;
pub mod schema;
pub mod storage;

// Re-exports for convenience
pub use adapter::{Event, EventType, ExtractorState, WorkerAdapter};
pub use client::{ArtifactStore, Auth, PlatformClient};
pub use config::ConnectorConfig;
pub use context::ConnectorContext;
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use maple::{MapleClient, MapleFixture};
pub use storage::{NdjsonReader, NdjsonWriter};
