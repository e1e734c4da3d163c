//! Conversion of platform items back into Maple records

use super::{ExternalCustomer, ExternalMapleKb};
use crate::adapter::PlatformItem;
use crate::etl::Transformer;

use eyre::Result;
use serde_json::Value;

fn string_field(data: &Value, key: &str) -> String {
    optional_field(data, key).unwrap_or_default()
}

fn optional_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Rebuild a customer; the derived URL field is dropped
fn denormalize_customer(item: &PlatformItem) -> ExternalCustomer {
    ExternalCustomer {
        id: item.id.devrev.clone(),
        created_date: item.created_date.clone(),
        modified_date: item.modified_date.clone(),
        name: string_field(&item.data, "name"),
        email: string_field(&item.data, "email"),
        company: optional_field(&item.data, "company"),
    }
}

/// Rebuild an article; the derived URL field is dropped
fn denormalize_article(item: &PlatformItem) -> ExternalMapleKb {
    ExternalMapleKb {
        id: item.id.devrev.clone(),
        created_date: item.created_date.clone(),
        modified_date: item.modified_date.clone(),
        title: string_field(&item.data, "title"),
        content: string_field(&item.data, "content"),
        category: optional_field(&item.data, "category"),
    }
}

pub struct CustomerDenormalizer;

impl Transformer for CustomerDenormalizer {
    type Input = PlatformItem;
    type Output = ExternalCustomer;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(denormalize_customer(&input))
    }
}

pub struct ArticleDenormalizer;

impl Transformer for ArticleDenormalizer {
    type Input = PlatformItem;
    type Output = ExternalMapleKb;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(denormalize_article(&input))
    }
}
