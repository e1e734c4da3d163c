//! File system storage operations
//!
//! Repository output and loader input are stored as NDJSON item files.

mod ndjson;

pub use ndjson::{NdjsonReader, NdjsonWriter};
