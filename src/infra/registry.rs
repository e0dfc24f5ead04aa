// ============================================================
// Layer 6 — Model Registry
// ============================================================
// Holds the one "current" model the service predicts with, as an
// explicit lifecycle:
//
//   Absent ──begin_training──▶ Training{previous: None}
//                                   │ publish        │ guard dropped
//                                   ▼                ▼
//                              Ready(v1)           Absent
//                                   │
//                              begin_training
//                                   ▼
//                         Training{previous: v1} ──publish──▶ Ready(v2)
//
// Snapshots are immutable and shared through Arc. Publishing a new
// model swaps the Arc under a short write lock; predict clones the
// Arc under a read lock and runs inference outside the lock, so a
// retrain never disturbs requests already holding the old version.
//
// Only one training run at a time: a second begin_training while
// one is in flight fails with AlreadyTraining.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::data::quality::DataQualityReport;
use crate::infra::metrics::{EpochMetrics, TrainingSummary};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Model has not been trained yet")]
    NotTrained,

    #[error("Model is still training")]
    StillTraining,

    #[error("Training already in progress")]
    AlreadyTraining,
}

/// An immutable, versioned trained model.
pub struct ModelSnapshot {
    version: u64,
    summary: TrainingSummary,
    // Burn modules are Send but not necessarily Sync; the mutex makes
    // the snapshot shareable across request handlers.
    inferencer: Mutex<Inferencer>,
}

impl ModelSnapshot {
    pub fn new(version: u64, inferencer: Inferencer, summary: TrainingSummary) -> Self {
        Self { version, summary, inferencer: Mutex::new(inferencer) }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Run `f` with exclusive access to the inferencer.
    pub fn with_inferencer<T>(&self, f: impl FnOnce(&Inferencer) -> T) -> T {
        let guard = self.inferencer.lock();
        f(&guard)
    }
}

enum ModelState {
    Absent,
    Training { previous: Option<Arc<ModelSnapshot>> },
    Ready(Arc<ModelSnapshot>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Absent,
    Training,
    Ready,
}

/// Read-only view of the registry for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub state:   Lifecycle,
    /// Version of the model currently served, if any
    pub version: Option<u64>,
    pub trained_at:    Option<DateTime<Utc>>,
    pub epochs:        Option<usize>,
    pub data_quality:  Option<DataQualityReport>,
    pub final_metrics: Option<EpochMetrics>,
}

pub struct ModelRegistry {
    state:        RwLock<ModelState>,
    last_version: Mutex<u64>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            state:        RwLock::new(ModelState::Absent),
            last_version: Mutex::new(0),
        }
    }

    /// Start a training run. The returned guard must be published to
    /// install the new model; dropping it restores the previous state.
    pub fn begin_training(&self) -> Result<TrainingGuard<'_>, RegistryError> {
        let mut state = self.state.write();
        let previous = match &*state {
            ModelState::Training { .. } => return Err(RegistryError::AlreadyTraining),
            ModelState::Absent          => None,
            ModelState::Ready(snapshot) => Some(Arc::clone(snapshot)),
        };
        *state = ModelState::Training { previous };
        tracing::info!("Model registry: training started");
        Ok(TrainingGuard { registry: self, published: false })
    }

    /// Install a model directly, e.g. one restored from a checkpoint.
    pub fn install(&self, inferencer: Inferencer, summary: TrainingSummary) -> Arc<ModelSnapshot> {
        let snapshot = Arc::new(ModelSnapshot::new(self.next_version(), inferencer, summary));
        *self.state.write() = ModelState::Ready(Arc::clone(&snapshot));
        tracing::info!("Model registry: serving model v{}", snapshot.version());
        snapshot
    }

    /// The snapshot predictions should use right now. While a retrain
    /// runs, the previous model keeps serving.
    pub fn current(&self) -> Result<Arc<ModelSnapshot>, RegistryError> {
        match &*self.state.read() {
            ModelState::Absent => Err(RegistryError::NotTrained),
            ModelState::Training { previous: None } => Err(RegistryError::StillTraining),
            ModelState::Training { previous: Some(snapshot) } | ModelState::Ready(snapshot) => {
                Ok(Arc::clone(snapshot))
            }
        }
    }

    pub fn status(&self) -> ModelStatus {
        let state = self.state.read();
        let (lifecycle, snapshot) = match &*state {
            ModelState::Absent                 => (Lifecycle::Absent, None),
            ModelState::Training { previous }  => (Lifecycle::Training, previous.as_ref()),
            ModelState::Ready(snapshot)        => (Lifecycle::Ready, Some(snapshot)),
        };

        let summary = snapshot.map(|s| s.summary());
        ModelStatus {
            state:         lifecycle,
            version:       snapshot.map(|s| s.version()),
            trained_at:    summary.map(|s| s.trained_at),
            epochs:        summary.map(|s| s.epochs),
            data_quality:  summary.map(|s| s.data_quality.clone()),
            final_metrics: summary.and_then(|s| s.final_metrics.clone()),
        }
    }

    fn next_version(&self) -> u64 {
        let mut last = self.last_version.lock();
        *last += 1;
        *last
    }

    fn finish(&self, snapshot: Option<Arc<ModelSnapshot>>) {
        let mut state = self.state.write();
        let next = match (snapshot, std::mem::replace(&mut *state, ModelState::Absent)) {
            (Some(new), _) => ModelState::Ready(new),
            (None, ModelState::Training { previous: Some(prev) }) => ModelState::Ready(prev),
            (None, _) => ModelState::Absent,
        };
        *state = next;
    }
}

/// Exclusive right to replace the model, held for one training run.
pub struct TrainingGuard<'a> {
    registry:  &'a ModelRegistry,
    published: bool,
}

impl TrainingGuard<'_> {
    /// Swap in the freshly trained model as the next version.
    pub fn publish(mut self, inferencer: Inferencer, summary: TrainingSummary) -> Arc<ModelSnapshot> {
        let version  = self.registry.next_version();
        let snapshot = Arc::new(ModelSnapshot::new(version, inferencer, summary));
        self.registry.finish(Some(Arc::clone(&snapshot)));
        self.published = true;
        tracing::info!("Model registry: published model v{}", version);
        snapshot
    }
}

impl Drop for TrainingGuard<'_> {
    fn drop(&mut self) {
        if !self.published {
            tracing::warn!("Model registry: training abandoned, keeping previous model");
            self.registry.finish(None);
        }
    }
}
