//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// Extractor, transformer, and loader chained over one item type
///
/// The transformer consumes what the extractor yields and the loader takes
/// what the transformer produces. Data extraction builds one pipeline per
/// item type: Maple client, normalizer, output repository.
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run extract, transform, and load in sequence
    ///
    /// Returns the number of items loaded
    ///
    /// # Errors
    /// Returns an error if any stage fails; later stages do not run.
    pub async fn run(&self) -> Result<usize> {
        let items = self.extractor.extract().await?;
        log::debug!("Extracted {} item(s)", items.len());

        if items.is_empty() {
            log::info!("No items extracted, nothing to load");
            return Ok(0);
        }

        let transformed = self.transformer.transform_many(items)?;
        let count = self.loader.load(transformed).await?;
        log::debug!("Loaded {} item(s)", count);

        Ok(count)
    }
}
