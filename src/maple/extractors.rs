//! Extractors reading Maple resources through a [`MapleClient`]

use super::{ExternalCustomer, ExternalMapleKb, MapleClient};
use crate::etl::Extractor;

use eyre::Result;

pub struct CustomersExtractor<'a> {
    client: &'a MapleClient,
}

impl<'a> CustomersExtractor<'a> {
    pub fn new(client: &'a MapleClient) -> Self {
        Self { client }
    }
}

impl Extractor for CustomersExtractor<'_> {
    type Item = ExternalCustomer;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let customers = self.client.list_customers().await?;
        log::info!("Fetched {} customer(s)", customers.len());
        Ok(customers)
    }
}

pub struct ArticlesExtractor<'a> {
    client: &'a MapleClient,
}

impl<'a> ArticlesExtractor<'a> {
    pub fn new(client: &'a MapleClient) -> Self {
        Self { client }
    }
}

impl Extractor for ArticlesExtractor<'_> {
    type Item = ExternalMapleKb;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let articles = self.client.list_articles().await?;
        log::info!("Fetched {} Maple KB article(s)", articles.len());
        Ok(articles)
    }
}
