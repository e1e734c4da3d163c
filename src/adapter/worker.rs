//! Worker adapter and task runner
//!
//! A worker handles exactly one phase for one event. It talks to the outside
//! world only through its [`WorkerAdapter`]: repositories for output, loader
//! input, the checkpoint state, and a single emitted signal.

use super::{
    Emission, Emitter, Event, EventData, LoaderReport, LoadingResponse, PlatformItem, Repo, Signal,
};
use crate::storage::NdjsonWriter;

use eyre::{Result, eyre};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Items supplied to a loading worker for one item type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderInput {
    /// Name of the file the items came from, reported as processed
    pub file: String,
    pub items: Vec<Value>,
}

impl LoaderInput {
    pub fn new(file: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            file: file.into(),
            items,
        }
    }
}

/// Per-invocation context handed to a worker
pub struct WorkerAdapter<S> {
    event: Event,
    state: S,
    repos: HashMap<String, Repo>,
    output_dir: Option<PathBuf>,
    inputs: HashMap<String, LoaderInput>,
    reports: Vec<LoaderReport>,
    processed_files: Vec<String>,
    emitter: Arc<dyn Emitter>,
    emitted: Option<Emission>,
}

impl<S> WorkerAdapter<S> {
    pub fn new(event: Event, state: S, emitter: Arc<dyn Emitter>) -> Self {
        Self {
            event,
            state,
            repos: HashMap::new(),
            output_dir: None,
            inputs: HashMap::new(),
            reports: Vec::new(),
            processed_files: Vec::new(),
            emitter,
            emitted: None,
        }
    }

    /// Write repositories as `<dir>/<item_type>.ndjson`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_inputs(mut self, inputs: HashMap<String, LoaderInput>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_input(mut self, item_type: impl Into<String>, input: LoaderInput) -> Self {
        self.inputs.insert(item_type.into(), input);
        self
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Create a repository per item type, replacing existing ones
    pub fn initialize_repos(&mut self, item_types: &[&str]) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
        }
        for item_type in item_types {
            let repo = match &self.output_dir {
                Some(dir) => Repo::with_sink(
                    *item_type,
                    NdjsonWriter::new(dir.join(format!("{}.ndjson", item_type))),
                ),
                None => Repo::new(*item_type),
            };
            self.repos.insert(item_type.to_string(), repo);
        }
        Ok(())
    }

    pub fn repo(&self, item_type: &str) -> Result<&Repo> {
        self.repos
            .get(item_type)
            .ok_or_else(|| eyre!("Repo for item type '{}' is not initialized", item_type))
    }

    pub fn input(&self, item_type: &str) -> Option<&LoaderInput> {
        self.inputs.get(item_type)
    }

    pub fn reports(&self) -> &[LoaderReport] {
        &self.reports
    }

    pub fn processed_files(&self) -> &[String] {
        &self.processed_files
    }

    pub fn emitted(&self) -> Option<&Emission> {
        self.emitted.as_ref()
    }

    /// Emit the phase's signal
    ///
    /// Only the first emission of an invocation is delivered; later ones are
    /// dropped with a warning.
    pub async fn emit(&mut self, event_type: impl Into<Signal>, data: EventData) -> Result<()> {
        let emission = Emission {
            event_type: event_type.into(),
            event_data: data,
        };

        if let Some(previous) = &self.emitted {
            log::warn!(
                "Ignoring {}: {} was already emitted",
                emission.event_type,
                previous.event_type
            );
            return Ok(());
        }

        if emission.event_type.is_error() {
            log::warn!("Emitting {}", emission.event_type.to_string().red());
        } else {
            log::info!("Emitting {}", emission.event_type.to_string().cyan());
        }
        self.emitter.emit(&emission).await?;
        self.emitted = Some(emission);
        Ok(())
    }

    /// Load every input item of the loader's item type
    ///
    /// Items with an external id are updated, the rest created. The report for
    /// the item type is updated after each item so a timeout can emit partial
    /// results.
    pub async fn load_item_type<L: ItemLoader>(&mut self, loader: &L) -> Result<LoaderReport> {
        let item_type = loader.item_type().to_string();
        let input = self.inputs.get(&item_type).cloned().unwrap_or_default();
        let index = self.report_index(&item_type);

        log::info!(
            "Loading {} {} item(s)",
            input.items.len(),
            item_type.cyan()
        );

        for value in input.items {
            let item: PlatformItem = match serde_json::from_value(value) {
                Ok(item) => item,
                Err(e) => {
                    log::warn!("Skipping malformed {} item: {}", item_type, e);
                    self.reports[index].failed += 1;
                    continue;
                }
            };

            let update = item.is_update();
            let devrev_id = item.id.devrev.clone();
            let response = if update {
                loader.update(item).await
            } else {
                loader.create(item).await
            };

            let report = &mut self.reports[index];
            if !response.is_success() {
                log::warn!(
                    "Failed to load {} {}: {}",
                    item_type,
                    devrev_id,
                    response.error.as_deref().unwrap_or_default()
                );
                report.failed += 1;
            } else if update {
                report.updated += 1;
            } else {
                report.created += 1;
            }
        }

        if !input.file.is_empty() {
            self.processed_files.push(input.file);
        }

        Ok(self.reports[index].clone())
    }

    /// Stream every input item of `item_type` through `stream`
    ///
    /// Streamed items count as created. Like [`Self::load_item_type`], the
    /// report is kept current for a timeout handler.
    pub fn stream_item_type<F>(&mut self, item_type: &str, stream: F) -> LoaderReport
    where
        F: Fn(&Value) -> std::result::Result<(), String>,
    {
        let input = self.inputs.get(item_type).cloned().unwrap_or_default();
        let index = self.report_index(item_type);

        log::info!("Streaming {} {} item(s)", input.items.len(), item_type.cyan());

        for value in &input.items {
            match stream(value) {
                Ok(()) => self.reports[index].created += 1,
                Err(e) => {
                    log::warn!("Failed to stream {} item: {}", item_type, e);
                    self.reports[index].failed += 1;
                }
            }
        }

        if !input.file.is_empty() {
            self.processed_files.push(input.file);
        }

        self.reports[index].clone()
    }

    fn report_index(&mut self, item_type: &str) -> usize {
        match self.reports.iter().position(|r| r.item_type == item_type) {
            Some(index) => index,
            None => {
                self.reports.push(LoaderReport::new(item_type));
                self.reports.len() - 1
            }
        }
    }
}

/// Create and update operations for one item type
pub trait ItemLoader: Send + Sync {
    fn item_type(&self) -> &str;

    fn create(&self, item: PlatformItem) -> impl Future<Output = LoadingResponse> + Send;

    fn update(&self, item: PlatformItem) -> impl Future<Output = LoadingResponse> + Send;
}

/// A one-shot phase handler
pub trait Worker<S>: Send + Sync {
    /// Signal used when the task fails without emitting
    fn error_signal(&self) -> Signal;

    /// Do the phase's work and emit its signal
    fn task(&self, adapter: &mut WorkerAdapter<S>) -> impl Future<Output = Result<()>> + Send;

    /// Emit a signal reflecting partial progress after the time budget expired
    fn on_timeout(&self, adapter: &mut WorkerAdapter<S>) -> impl Future<Output = Result<()>> + Send;
}

/// Run a worker's task within a time budget
///
/// When the budget expires the task is dropped wherever it was suspended and
/// the worker's timeout handler runs instead. A task error that was not
/// already reported is emitted through the worker's error signal.
pub async fn process_task<S, W>(
    worker: &W,
    adapter: &mut WorkerAdapter<S>,
    budget: Duration,
) -> Result<()>
where
    S: Send + Sync,
    W: Worker<S>,
{
    let outcome = tokio::time::timeout(budget, worker.task(adapter)).await;
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            log::error!("Task for {} failed: {:#}", adapter.event().event_type(), error);
            if adapter.emitted().is_none() {
                adapter
                    .emit(worker.error_signal(), EventData::error(format!("{:#}", error)))
                    .await?;
            }
        }
        Err(_) => {
            log::warn!(
                "Time budget of {:?} expired during {}",
                budget,
                adapter.event().event_type()
            );
            worker.on_timeout(adapter).await?;
        }
    }

    if adapter.emitted().is_none() {
        log::warn!("{} finished without emitting a signal", adapter.event().event_type());
    }
    Ok(())
}
