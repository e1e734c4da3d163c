//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Extraction phases compose these traits: records are extracted from the
//! Maple client, normalized by a transformer, and loaded into an output
//! repository.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
