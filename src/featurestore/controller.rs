// featurestore/controller.rs
//
// The dashboard controller: owns the state and the collaborator handles,
// runs the initial structured join, and exposes the UI-triggerable
// actions. Every backend failure is converted into a transient
// notification and swallowed; loading-state failures still trip their
// latch so one failing branch cannot starve the join barrier.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use super::dialogs::{DialogContext, DialogOutcome, DialogRequest, DialogService};
use super::models::{Featuregroup, Featurestore, Job, Quotas, TrainingDataset};
use super::notify::Notifier;
use super::search;
use super::services::{FeaturestoreService, JobService, ProjectService};
use super::sizes::{SizeFetcher, SizeTarget};
use super::state::DashboardState;
use super::{DEFAULT_CHART_POINTS, DEFAULT_RECENT_JOBS};

pub struct DashboardController {
    project_id: i32,
    recent_jobs_limit: usize,
    chart_points: usize,
    state: DashboardState,
    featurestore_svc: Arc<dyn FeaturestoreService>,
    job_svc: Arc<dyn JobService>,
    project_svc: Arc<dyn ProjectService>,
    dialogs: Arc<dyn DialogService>,
    notifier: Arc<dyn Notifier>,
    sizes: Arc<SizeFetcher>,
}

impl DashboardController {
    pub fn new(
        project_id: i32,
        featurestore_svc: Arc<dyn FeaturestoreService>,
        job_svc: Arc<dyn JobService>,
        project_svc: Arc<dyn ProjectService>,
        dialogs: Arc<dyn DialogService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let sizes = Arc::new(SizeFetcher::new(
            project_svc.clone(),
            notifier.clone(),
            project_id,
        ));
        Self {
            project_id,
            recent_jobs_limit: DEFAULT_RECENT_JOBS,
            chart_points: DEFAULT_CHART_POINTS,
            state: DashboardState::new(),
            featurestore_svc,
            job_svc,
            project_svc,
            dialogs,
            notifier,
            sizes,
        }
    }

    pub fn with_recent_jobs_limit(mut self, limit: usize) -> Self {
        self.recent_jobs_limit = limit;
        self
    }

    pub fn with_chart_points(mut self, points: usize) -> Self {
        self.chart_points = points;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn sizes(&self) -> &SizeFetcher {
        &self.sizes
    }

    /// Shareable handle to the size fetcher, for callers that want to run
    /// size lookups in the background.
    pub fn size_fetcher(&self) -> Arc<SizeFetcher> {
        self.sizes.clone()
    }

    // ───────────── Initialization and fetches ─────────────

    /// Runs the three top-level fetches concurrently. The feature-store
    /// branch cascades into the featuregroup and training-dataset fetches
    /// for the selected store. The three fetches race; downstream
    /// consumers wait on the join barrier.
    pub async fn init(&mut self) {
        self.state.start_loading("Loading Feature store data...");
        info!(project_id = self.project_id, "initializing feature store dashboard");

        let (stores, jobs, quotas) = tokio::join!(
            self.featurestore_svc.featurestores(self.project_id),
            self.job_svc.jobs(self.project_id),
            self.project_svc.quotas(self.project_id),
        );

        self.on_featurestores(stores).await;
        self.on_jobs(jobs);
        self.on_quotas(quotas);
        self.check_barrier();
    }

    /// Restarts loading for a newly selected store and refetches its
    /// collections.
    pub async fn select_featurestore(&mut self, featurestore: Featurestore) {
        self.state.start_loading("Loading Feature store data...");
        self.state.featurestore = Some(featurestore.clone());
        self.refresh_entities(&featurestore).await;
        self.check_barrier();
    }

    /// Refetches the feature groups of the active store.
    pub async fn refresh_featuregroups(&mut self) {
        let Some(store) = self.state.featurestore.clone() else {
            return;
        };
        let result = self
            .featurestore_svc
            .featuregroups(self.project_id, &store)
            .await;
        self.on_featuregroups(result);
        self.check_barrier();
    }

    /// Refetches the training datasets of the active store.
    pub async fn refresh_training_datasets(&mut self) {
        let Some(store) = self.state.featurestore.clone() else {
            return;
        };
        let result = self
            .featurestore_svc
            .training_datasets(self.project_id, &store)
            .await;
        self.on_training_datasets(result);
        self.check_barrier();
    }

    async fn refresh_entities(&mut self, featurestore: &Featurestore) {
        let (featuregroups, training_datasets) = tokio::join!(
            self.featurestore_svc
                .featuregroups(self.project_id, featurestore),
            self.featurestore_svc
                .training_datasets(self.project_id, featurestore),
        );
        self.on_featuregroups(featuregroups);
        self.on_training_datasets(training_datasets);
    }

    async fn on_featurestores(&mut self, result: Result<Vec<Featurestore>>) {
        match result {
            Ok(featurestores) => {
                info!(count = featurestores.len(), "fetched featurestores");
                self.state.apply_featurestores(featurestores);
                if let Some(store) = self.state.featurestore.clone() {
                    self.sizes
                        .fetch(SizeTarget::Featurestore, store.inode_id)
                        .await;
                    if !self.state.first_pull {
                        self.refresh_entities(&store).await;
                        self.state.first_pull = true;
                    }
                }
            }
            Err(e) => self.backend_error("Failed to fetch list of featurestores", e),
        }
    }

    fn on_featuregroups(&mut self, result: Result<Vec<Featuregroup>>) {
        match result {
            Ok(featuregroups) => self.state.apply_featuregroups(featuregroups),
            Err(e) => {
                self.backend_error("Failed to fetch the featuregroups for the featurestore", e)
            }
        }
        self.state.flags.latch_featuregroups();
    }

    fn on_training_datasets(&mut self, result: Result<Vec<TrainingDataset>>) {
        match result {
            Ok(training_datasets) => self.state.apply_training_datasets(training_datasets),
            Err(e) => self.backend_error(
                "Failed to fetch the training datasets for the featurestore",
                e,
            ),
        }
        self.state.flags.latch_training_datasets();
    }

    fn on_jobs(&mut self, result: Result<Vec<Job>>) {
        match result {
            Ok(jobs) => self.state.apply_jobs(jobs),
            Err(e) => self.backend_error("Failed to fetch jobs for the project", e),
        }
        self.state.flags.latch_jobs();
    }

    fn on_quotas(&mut self, result: Result<Quotas>) {
        match result {
            Ok(quotas) => self.state.apply_quotas(quotas),
            Err(e) => self.backend_error("Failed to fetch featurestore quota", e),
        }
        self.state.flags.latch_quota();
    }

    fn check_barrier(&mut self) {
        let finished = self.state.finish_loading_if_ready(
            Utc::now(),
            self.recent_jobs_limit,
            self.chart_points,
        );
        if finished {
            info!(
                entities = self.state.entities.len(),
                features = self.state.features.len(),
                recent_jobs = self.state.recent_jobs.len(),
                "dashboard loaded"
            );
        }
    }

    // ───────────── Search and sizes ─────────────

    /// Exact-name feature search. A hit triggers an on-demand size fetch
    /// for its owning group (single-flight guarded).
    pub async fn feature_search(&mut self, query: &str) {
        self.state.ui.feature_search_query = query.to_string();
        let outcome = search::feature_search(&self.state.features, &self.state.featuregroups, query);
        if let Some(group) = outcome.active_hit().and_then(|hit| hit.featuregroup.clone()) {
            self.sizes
                .fetch(SizeTarget::Featuregroup, group.inode_id)
                .await;
        }
        self.state.search = Some(outcome);
    }

    /// Switches the active hit of an ambiguous search result.
    pub fn select_search_result(&mut self, group_name: &str) {
        if let Some(outcome) = &mut self.state.search {
            outcome.select_group(group_name);
        }
    }

    pub fn reset_feature_search(&mut self) {
        self.state.search = None;
    }

    /// On-demand size fetch for the active store. A no-op while one is
    /// already outstanding.
    pub async fn fetch_featurestore_size(&self) {
        if let Some(store) = &self.state.featurestore {
            self.sizes
                .fetch(SizeTarget::Featurestore, store.inode_id)
                .await;
        }
    }

    /// On-demand size fetch for one feature group. A no-op while one is
    /// already outstanding.
    pub async fn fetch_featuregroup_size(&self, featuregroup: &Featuregroup) {
        self.sizes
            .fetch(SizeTarget::Featuregroup, featuregroup.inode_id)
            .await;
    }

    // ───────────── Mutating actions (dialog delegates) ─────────────

    pub async fn create_featuregroup(&mut self) {
        let request = DialogRequest::CreateFeaturegroup {
            featuregroups: self.state.featuregroups.clone(),
        };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_featuregroups().await;
        }
    }

    pub async fn create_training_dataset(&mut self) {
        let request = DialogRequest::CreateTrainingDataset {
            training_datasets: self.state.training_datasets.clone(),
        };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_training_datasets().await;
        }
    }

    pub async fn update_featuregroup(&mut self, featuregroup: Featuregroup) {
        let request = DialogRequest::UpdateFeaturegroup { featuregroup };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_featuregroups().await;
        }
    }

    pub async fn update_training_dataset(&mut self, training_dataset: TrainingDataset) {
        let request = DialogRequest::UpdateTrainingDataset { training_dataset };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_training_datasets().await;
        }
    }

    /// Opens the new-version editor seeded with the greatest existing
    /// version of the named feature group.
    pub async fn new_featuregroup_version(&mut self, name: &str) {
        let latest = self
            .state
            .featuregroup_groups
            .iter()
            .find(|g| g.name == name)
            .and_then(|g| g.active().cloned());
        let Some(latest) = latest else {
            return;
        };
        let request = DialogRequest::NewFeaturegroupVersion {
            latest,
            featuregroups: self.state.featuregroups.clone(),
        };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_featuregroups().await;
        }
    }

    /// Opens the new-version editor seeded with the greatest existing
    /// version of the named training dataset.
    pub async fn new_training_dataset_version(&mut self, name: &str) {
        let latest = self
            .state
            .training_dataset_groups
            .iter()
            .find(|g| g.name == name)
            .and_then(|g| g.active().cloned());
        let Some(latest) = latest else {
            return;
        };
        let request = DialogRequest::NewTrainingDatasetVersion {
            latest,
            training_datasets: self.state.training_datasets.clone(),
        };
        if self.open_dialog(request).await == DialogOutcome::Confirmed {
            self.refresh_training_datasets().await;
        }
    }

    pub async fn delete_featuregroup(&mut self, featuregroup: &Featuregroup) {
        let confirmed = self
            .dialogs
            .confirm(
                "Are you sure?",
                "Are you sure that you want to delete this version of the feature group? \
                 This action will delete all the data in the feature group with the selected version.",
            )
            .await;
        if confirmed != DialogOutcome::Confirmed {
            return;
        }
        let Some(store) = self.state.featurestore.clone() else {
            return;
        };
        self.notifier
            .info("Deleting", "Deleting featuregroup... wait");
        match self
            .featurestore_svc
            .delete_featuregroup(self.project_id, &store, featuregroup.id)
            .await
        {
            Ok(()) => {
                self.notifier.success("Success", "Feature group deleted");
                self.refresh_featuregroups().await;
            }
            Err(e) => self.backend_error("Failed to delete the feature group", e),
        }
    }

    pub async fn delete_training_dataset(&mut self, training_dataset: &TrainingDataset) {
        let confirmed = self
            .dialogs
            .confirm(
                "Are you sure?",
                "Are you sure that you want to delete this version of the training dataset? \
                 This action will delete all the data in the training dataset of this version \
                 together with its metadata.",
            )
            .await;
        if confirmed != DialogOutcome::Confirmed {
            return;
        }
        let Some(store) = self.state.featurestore.clone() else {
            return;
        };
        self.notifier
            .info("Deleting", "Deleting training dataset... wait");
        match self
            .featurestore_svc
            .delete_training_dataset(self.project_id, &store, training_dataset.id)
            .await
        {
            Ok(()) => {
                self.notifier.success("Success", "Training Dataset deleted");
                self.refresh_training_datasets().await;
            }
            Err(e) => self.backend_error("Failed to delete the training dataset", e),
        }
    }

    pub async fn clear_featuregroup_contents(&mut self, featuregroup: &Featuregroup) {
        let confirmed = self
            .dialogs
            .confirm(
                "Are you sure? This action will drop all data in the feature group",
                "Are you sure that you want to delete the contents of this feature group? \
                 If you want to keep the contents and write new data you can create a new \
                 version of the same feature group.",
            )
            .await;
        if confirmed != DialogOutcome::Confirmed {
            return;
        }
        let Some(store) = self.state.featurestore.clone() else {
            return;
        };
        self.notifier
            .info("Clearing", "Clearing contents of the featuregroup... wait");
        match self
            .featurestore_svc
            .clear_featuregroup_contents(self.project_id, &store, featuregroup.id)
            .await
        {
            Ok(()) => {
                self.notifier
                    .success("Success", "Feature group contents cleared");
                self.refresh_featuregroups().await;
            }
            Err(e) => self.backend_error("Failed to clear the featuregroup contents", e),
        }
    }

    // ───────────── View-only delegates ─────────────

    pub async fn view_featuregroup_statistics(&self, featuregroup: Featuregroup) {
        let _ = self
            .open_dialog(DialogRequest::ViewFeaturegroupStatistics { featuregroup })
            .await;
    }

    pub async fn view_training_dataset_statistics(&self, training_dataset: TrainingDataset) {
        let _ = self
            .open_dialog(DialogRequest::ViewTrainingDatasetStatistics { training_dataset })
            .await;
    }

    pub async fn view_featuregroup_schema(&self, featuregroup: Featuregroup) {
        let _ = self
            .open_dialog(DialogRequest::ViewFeaturegroupSchema { featuregroup })
            .await;
    }

    pub async fn view_training_dataset_schema(&self, training_dataset: TrainingDataset) {
        let _ = self
            .open_dialog(DialogRequest::ViewTrainingDatasetSchema { training_dataset })
            .await;
    }

    pub async fn view_featuregroup_info(&self, featuregroup: Featuregroup) {
        let _ = self
            .open_dialog(DialogRequest::ViewFeaturegroupInfo { featuregroup })
            .await;
    }

    pub async fn view_training_dataset_info(&self, training_dataset: TrainingDataset) {
        let _ = self
            .open_dialog(DialogRequest::ViewTrainingDatasetInfo { training_dataset })
            .await;
    }

    pub async fn preview_featuregroup(&self, featuregroup: Featuregroup) {
        let _ = self
            .open_dialog(DialogRequest::PreviewFeaturegroup { featuregroup })
            .await;
    }

    // ───────────── Helpers ─────────────

    async fn open_dialog(&self, request: DialogRequest) -> DialogOutcome {
        self.dialogs.open(self.dialog_context(), request).await
    }

    fn dialog_context(&self) -> DialogContext {
        DialogContext {
            project_id: self.project_id,
            featurestore: self.state.featurestore.clone(),
            jobs: self.state.jobs.clone(),
        }
    }

    fn backend_error(&self, title: &str, e: anyhow::Error) {
        self.notifier.error(title, &format!("{e:#}"));
    }
}
