//! Destinations for emitted signals

use super::Emission;

use async_trait::async_trait;
use eyre::Result;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives the signal a worker emits at the end of its phase
#[async_trait]
pub trait Emitter: Send + Sync {
    async fn emit(&self, emission: &Emission) -> Result<()>;
}

/// Keeps every emission in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    emissions: Arc<Mutex<Vec<Emission>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Emission> {
        self.emissions().pop()
    }
}

#[async_trait]
impl Emitter for RecordingEmitter {
    async fn emit(&self, emission: &Emission) -> Result<()> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(emission.clone());
        Ok(())
    }
}

/// Prints each emission to stdout as one JSON line
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEmitter;

#[async_trait]
impl Emitter for StdoutEmitter {
    async fn emit(&self, emission: &Emission) -> Result<()> {
        println!("{}", serde_json::to_string(emission)?);
        Ok(())
    }
}
