//! Extractor trait for reading records from a source

use eyre::Result;

/// Extractor trait for extracting records from a source
///
/// Implementors define how to list records from sources like:
/// - An extracted Maple archive
/// - A bundled fixture
///
/// # Example
/// ```no_run
/// use maple_snapin::etl::Extractor;
/// use maple_snapin::maple::{ExternalCustomer, MapleClient};
/// use eyre::Result;
///
/// struct AllCustomers<'a> {
///     client: &'a MapleClient,
/// }
///
/// impl Extractor for AllCustomers<'_> {
///     type Item = ExternalCustomer;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         self.client.list_customers().await
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (download, I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
