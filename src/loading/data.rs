//! Data loading
//!
//! Denormalizes platform items and hands them to the Maple client. Items
//! that already exist in Maple are updated, the rest created.

use crate::adapter::{
    EventData, ItemLoader, LoaderEventType, LoaderState, LoadingResponse, PlatformItem, Signal,
    Worker, WorkerAdapter,
};
use crate::context::ConnectorContext;
use crate::etl::Transformer;
use crate::maple::{ArticleDenormalizer, CustomerDenormalizer, ItemType, MapleClient};

use eyre::Result;

pub struct CustomerItemLoader<'a> {
    client: &'a MapleClient,
}

impl<'a> CustomerItemLoader<'a> {
    pub fn new(client: &'a MapleClient) -> Self {
        Self { client }
    }
}

impl ItemLoader for CustomerItemLoader<'_> {
    fn item_type(&self) -> &str {
        ItemType::Customers.as_str()
    }

    async fn create(&self, item: PlatformItem) -> LoadingResponse {
        match CustomerDenormalizer.transform(item) {
            Ok(customer) => self.client.create_customer(&customer).await,
            Err(e) => LoadingResponse::failure(format!("{:#}", e)),
        }
    }

    async fn update(&self, item: PlatformItem) -> LoadingResponse {
        match CustomerDenormalizer.transform(item) {
            Ok(customer) => self.client.update_customer(&customer).await,
            Err(e) => LoadingResponse::failure(format!("{:#}", e)),
        }
    }
}

pub struct ArticleItemLoader<'a> {
    client: &'a MapleClient,
}

impl<'a> ArticleItemLoader<'a> {
    pub fn new(client: &'a MapleClient) -> Self {
        Self { client }
    }
}

impl ItemLoader for ArticleItemLoader<'_> {
    fn item_type(&self) -> &str {
        ItemType::MapleKb.as_str()
    }

    async fn create(&self, item: PlatformItem) -> LoadingResponse {
        match ArticleDenormalizer.transform(item) {
            Ok(article) => self.client.create_article(&article).await,
            Err(e) => LoadingResponse::failure(format!("{:#}", e)),
        }
    }

    async fn update(&self, item: PlatformItem) -> LoadingResponse {
        match ArticleDenormalizer.transform(item) {
            Ok(article) => self.client.update_article(&article).await,
            Err(e) => LoadingResponse::failure(format!("{:#}", e)),
        }
    }
}

fn progress(adapter: &WorkerAdapter<LoaderState>) -> EventData {
    EventData::loading(adapter.reports().to_vec(), adapter.processed_files().to_vec())
}

pub struct DataLoadingWorker<'a> {
    context: &'a ConnectorContext,
}

impl<'a> DataLoadingWorker<'a> {
    pub fn new(context: &'a ConnectorContext) -> Self {
        Self { context }
    }
}

impl Worker<LoaderState> for DataLoadingWorker<'_> {
    fn error_signal(&self) -> Signal {
        LoaderEventType::DataLoadingError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<LoaderState>) -> Result<()> {
        let client = self.context.maple_client(adapter.event())?;

        for report in [
            adapter.load_item_type(&CustomerItemLoader::new(&client)).await?,
            adapter.load_item_type(&ArticleItemLoader::new(&client)).await?,
        ] {
            log::info!(
                "{}: {} created, {} updated, {} failed",
                report.item_type,
                report.created,
                report.updated,
                report.failed
            );
        }

        let data = progress(adapter);
        adapter.emit(LoaderEventType::DataLoadingDone, data).await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<LoaderState>) -> Result<()> {
        let data = progress(adapter);
        adapter.emit(LoaderEventType::DataLoadingProgress, data).await
    }
}
