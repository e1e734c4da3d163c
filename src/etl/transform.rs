//! Transformer trait for record shape conversion

use eyre::Result;

/// Converts one item into another shape
///
/// Normalizers turn Maple records into platform items and denormalizers turn
/// platform items back into Maple records. Conversions are per item; a batch
/// fails on its first bad item.
///
/// # Example
/// ```
/// use maple_snapin::etl::Transformer;
/// use eyre::Result;
///
/// struct Uppercase;
///
/// impl Transformer for Uppercase {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// let out = Uppercase.transform_many(vec!["a".into(), "b".into()]).unwrap();
/// assert_eq!(out, vec!["A", "B"]);
/// ```
pub trait Transformer: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Convert every item, in order
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}
