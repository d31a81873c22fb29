// featurestore/dialogs.rs
//
// Seam for the modal dialogs owned elsewhere. A dialog resolves with
// `Confirmed` when the user completes it (the editor dialogs perform
// their own backend mutation before resolving) and `Cancelled` when the
// user changes their mind; cancellation is silent.

use async_trait::async_trait;

use super::models::{Featuregroup, Featurestore, Job, TrainingDataset};

/// How a dialog was closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Cancelled,
}

/// Context handed to every editor dialog: the project, the active feature
/// store and the current job list.
#[derive(Clone, Debug)]
pub struct DialogContext {
    pub project_id: i32,
    pub featurestore: Option<Featurestore>,
    pub jobs: Vec<Job>,
}

/// Which dialog to open, with the entity payload it operates on.
#[derive(Clone, Debug)]
pub enum DialogRequest {
    CreateFeaturegroup {
        featuregroups: Vec<Featuregroup>,
    },
    UpdateFeaturegroup {
        featuregroup: Featuregroup,
    },
    /// Editor seeded with the entity at the greatest existing version.
    NewFeaturegroupVersion {
        latest: Featuregroup,
        featuregroups: Vec<Featuregroup>,
    },
    CreateTrainingDataset {
        training_datasets: Vec<TrainingDataset>,
    },
    UpdateTrainingDataset {
        training_dataset: TrainingDataset,
    },
    NewTrainingDatasetVersion {
        latest: TrainingDataset,
        training_datasets: Vec<TrainingDataset>,
    },
    ViewFeaturegroupStatistics { featuregroup: Featuregroup },
    ViewTrainingDatasetStatistics { training_dataset: TrainingDataset },
    ViewFeaturegroupSchema { featuregroup: Featuregroup },
    ViewTrainingDatasetSchema { training_dataset: TrainingDataset },
    ViewFeaturegroupInfo { featuregroup: Featuregroup },
    ViewTrainingDatasetInfo { training_dataset: TrainingDataset },
    PreviewFeaturegroup { featuregroup: Featuregroup },
}

#[async_trait]
pub trait DialogService: Send + Sync {
    /// Small yes/no confirmation dialog.
    async fn confirm(&self, title: &str, message: &str) -> DialogOutcome;

    /// Opens an editor or viewer dialog.
    async fn open(&self, context: DialogContext, request: DialogRequest) -> DialogOutcome;
}

/// Dialog service for headless runs: every dialog is cancelled, so no
/// mutating action ever proceeds.
#[derive(Default)]
pub struct HeadlessDialogs;

#[async_trait]
impl DialogService for HeadlessDialogs {
    async fn confirm(&self, _title: &str, _message: &str) -> DialogOutcome {
        DialogOutcome::Cancelled
    }

    async fn open(&self, _context: DialogContext, _request: DialogRequest) -> DialogOutcome {
        DialogOutcome::Cancelled
    }
}
