//! Loader trait for writing items to a destination

use eyre::Result;

/// Loader trait for loading items to a destination
///
/// Implementors define how to store items, e.g. an output repository that
/// appends normalized items to an NDJSON file.
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, serialization, etc.)
    fn load(
        &self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
