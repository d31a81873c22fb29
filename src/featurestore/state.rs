// featurestore/state.rs
//
// Explicit dashboard state plus the apply functions that mutate it, so
// the join barrier and re-derivation logic are testable without HTTP.
// Entity lists are replaced wholesale on every fetch and every derived
// projection is recomputed from scratch.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::charts;
use super::models::{Feature, Featuregroup, Featurestore, Job, Quotas, TrainingDataset};
use super::search::SearchOutcome;
use super::sizes::convert_size;
use super::transforms::{
    collect_all_features, group_by_version, recent_feature_engineering_jobs, EngineeringJob,
    EntityOverview, VersionGroup,
};

/// One-way latches for the four tracked fetches. Once tripped a flag
/// never resets within a session; failures latch too, so one failing
/// branch cannot starve the join barrier.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadFlags {
    featuregroups: bool,
    training_datasets: bool,
    jobs: bool,
    quota: bool,
}

impl LoadFlags {
    pub fn latch_featuregroups(&mut self) {
        self.featuregroups = true;
    }
    pub fn latch_training_datasets(&mut self) {
        self.training_datasets = true;
    }
    pub fn latch_jobs(&mut self) {
        self.jobs = true;
    }
    pub fn latch_quota(&mut self) {
        self.quota = true;
    }

    /// The unordered join over all tracked fetches.
    pub fn all_loaded(&self) -> bool {
        self.featuregroups && self.training_datasets && self.jobs && self.quota
    }
}

/// Table sorting and paging state.
#[derive(Clone, Debug)]
pub struct UiState {
    pub page_size: usize,
    pub features_page_size: usize,
    pub current_page: usize,
    pub entity_sort_key: String,
    pub features_sort_key: String,
    pub reverse: bool,
    pub features_reverse: bool,
    pub entity_filter: String,
    pub featuregroup_filter: String,
    pub feature_search_query: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            page_size: 11,
            features_page_size: 10,
            current_page: 1,
            entity_sort_key: "name".to_string(),
            features_sort_key: "name".to_string(),
            reverse: false,
            features_reverse: false,
            entity_filter: String::new(),
            featuregroup_filter: String::new(),
            feature_search_query: String::new(),
        }
    }
}

impl UiState {
    /// Toggle sorting of the entity table on `key`.
    pub fn sort_entities(&mut self, key: &str) {
        self.entity_sort_key = key.to_string();
        self.reverse = !self.reverse;
    }

    /// Toggle sorting of the features table on `key`.
    pub fn sort_features(&mut self, key: &str) {
        self.features_sort_key = key.to_string();
        self.features_reverse = !self.features_reverse;
    }

    /// Absolute 1-based index of a row in the paginated features table.
    pub fn total_index(&self, page_index: usize) -> usize {
        (self.current_page - 1) * self.features_page_size + page_index + 1
    }

    /// Jump to an entity row by prefilling the entity-table filter.
    pub fn go_to_entity(&mut self, name: &str) {
        self.entity_filter = name.to_string();
    }

    /// Jump to a feature group by prefilling the group filter.
    pub fn go_to_featuregroup(&mut self, name: &str) {
        self.featuregroup_filter = name.to_string();
    }
}

/// All dashboard state, owned by the controller. One logical execution
/// context mutates it, so no locking is needed.
#[derive(Default)]
pub struct DashboardState {
    pub featurestores: Vec<Featurestore>,
    /// The active store: first of the fetched list.
    pub featurestore: Option<Featurestore>,
    pub featuregroups: Vec<Featuregroup>,
    pub training_datasets: Vec<TrainingDataset>,
    /// Denormalized projection over all groups' feature lists.
    pub features: Vec<Feature>,
    pub jobs: Vec<Job>,
    pub featuregroup_groups: Vec<VersionGroup<Featuregroup>>,
    pub training_dataset_groups: Vec<VersionGroup<TrainingDataset>>,
    /// Combined overview rows for the entity table.
    pub entities: Vec<EntityOverview>,
    pub quotas: Option<Quotas>,
    pub recent_jobs: Vec<EngineeringJob>,
    pub search: Option<SearchOutcome>,
    pub feature_progress_chart: Option<Value>,
    pub quota_chart: Option<Value>,
    pub flags: LoadFlags,
    pub loading: bool,
    pub loading_text: String,
    /// Whether the first featuregroup/training-dataset pull has happened.
    pub first_pull: bool,
    pub ui: UiState,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_loading(&mut self, label: &str) {
        self.loading = true;
        self.loading_text = label.to_string();
    }

    /// Replaces the store list and selects the first store as active.
    pub fn apply_featurestores(&mut self, featurestores: Vec<Featurestore>) {
        self.featurestore = featurestores.first().cloned();
        self.featurestores = featurestores;
    }

    /// Replaces the feature groups and re-derives grouping, the flattened
    /// feature list and the combined entity overview.
    pub fn apply_featuregroups(&mut self, featuregroups: Vec<Featuregroup>) {
        self.featuregroups = featuregroups;
        self.featuregroup_groups = group_by_version(&self.featuregroups);
        self.features = collect_all_features(&self.featuregroups);
        self.rebuild_entities();
    }

    /// Replaces the training datasets and re-derives grouping and the
    /// combined entity overview.
    pub fn apply_training_datasets(&mut self, training_datasets: Vec<TrainingDataset>) {
        self.training_datasets = training_datasets;
        self.training_dataset_groups = group_by_version(&self.training_datasets);
        self.rebuild_entities();
    }

    pub fn apply_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    pub fn apply_quotas(&mut self, quotas: Quotas) {
        self.quotas = Some(quotas);
    }

    fn rebuild_entities(&mut self) {
        self.entities = self
            .featuregroup_groups
            .iter()
            .map(VersionGroup::overview)
            .chain(self.training_dataset_groups.iter().map(VersionGroup::overview))
            .collect();
    }

    /// Runs the join-barrier check. When every tracked fetch has latched,
    /// derives the header widgets (charts, recent jobs) and leaves the
    /// loading state. Returns whether the barrier was satisfied.
    pub fn finish_loading_if_ready(
        &mut self,
        now: DateTime<Utc>,
        recent_jobs_limit: usize,
        chart_points: usize,
    ) -> bool {
        if !self.flags.all_loaded() {
            return false;
        }
        self.feature_progress_chart =
            Some(charts::feature_progress_chart(&self.features, now, chart_points));
        if let Some(quotas) = &self.quotas {
            self.quota_chart = Some(charts::quota_chart(quotas));
        }
        self.recent_jobs = recent_feature_engineering_jobs(
            &self.jobs,
            &self.featuregroups,
            &self.training_datasets,
            recent_jobs_limit,
        );
        self.loading = false;
        self.loading_text.clear();
        true
    }

    /// Whether a job id belongs to this project's job list.
    pub fn is_job_local(&self, job_id: i64) -> bool {
        self.jobs.iter().any(|job| job.id == job_id)
    }

    /// Human-readable HDFS usage, `None` until the quota fetch landed.
    pub fn hdfs_usage(&self) -> Option<String> {
        self.quotas
            .as_ref()
            .map(|q| convert_size(q.featurestore_hdfs_usage_in_bytes))
    }

    /// Human-readable HDFS quota, `None` until the quota fetch landed.
    pub fn hdfs_quota(&self) -> Option<String> {
        self.quotas
            .as_ref()
            .map(|q| convert_size(q.featurestore_hdfs_quota_in_bytes))
    }

    /// Number of inodes stored in the feature store.
    pub fn hdfs_file_count(&self) -> Option<i64> {
        self.quotas.as_ref().map(|q| q.featurestore_hdfs_ns_count)
    }

    /// Number of inodes allowed in the feature store.
    pub fn hdfs_file_quota(&self) -> Option<i64> {
        self.quotas.as_ref().map(|q| q.featurestore_hdfs_ns_quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featurestore::models::{Execution, ItemsPage};
    use chrono::TimeZone;

    fn store(name: &str) -> Featurestore {
        Featurestore {
            featurestore_id: 1,
            featurestore_name: name.to_string(),
            project_name: None,
            inode_id: 10,
        }
    }

    fn fg(name: &str, version: i32, job: Option<&str>) -> Featuregroup {
        Featuregroup {
            id: version,
            name: name.to_string(),
            version,
            created: "2026-01-01T00:00:00Z".parse().expect("ts"),
            job_name: job.map(str::to_string),
            inode_id: 20,
            features: vec![],
        }
    }

    fn job(id: i64, name: &str) -> Job {
        Job {
            id,
            name: name.to_string(),
            executions: Some(ItemsPage {
                items: vec![Execution {
                    id: Some(1),
                    state: Some("FINISHED".into()),
                    final_status: Some("SUCCEEDED".into()),
                    progress: Some(1.0),
                    duration: Some(100),
                    submission_time: Some("2026-02-01T00:00:00Z".parse().expect("ts")),
                }],
            }),
        }
    }

    #[test]
    fn first_store_of_the_list_becomes_active() {
        let mut state = DashboardState::new();
        state.apply_featurestores(vec![store("first"), store("second")]);
        assert_eq!(
            state.featurestore.as_ref().map(|s| s.featurestore_name.as_str()),
            Some("first")
        );
    }

    #[test]
    fn barrier_requires_all_four_latches() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut state = DashboardState::new();
        state.start_loading("Loading...");

        state.flags.latch_featuregroups();
        state.flags.latch_training_datasets();
        state.flags.latch_jobs();
        assert!(!state.finish_loading_if_ready(now, 10, 5));
        assert!(state.loading);

        state.flags.latch_quota();
        assert!(state.finish_loading_if_ready(now, 10, 5));
        assert!(!state.loading);
        assert!(state.loading_text.is_empty());
        assert!(state.feature_progress_chart.is_some());
    }

    #[test]
    fn featuregroup_apply_replaces_wholesale_and_rederives() {
        let mut state = DashboardState::new();
        state.apply_featuregroups(vec![fg("a", 1, None), fg("a", 2, None)]);
        assert_eq!(state.featuregroup_groups.len(), 1);
        assert_eq!(state.entities.len(), 1);

        // Refetch with a disjoint list: nothing from the old one survives.
        state.apply_featuregroups(vec![fg("b", 1, None)]);
        assert_eq!(state.featuregroups.len(), 1);
        assert_eq!(state.featuregroup_groups[0].name, "b");
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.entities[0].name, "b");
    }

    #[test]
    fn entities_combine_groups_and_datasets() {
        let mut state = DashboardState::new();
        state.apply_featuregroups(vec![fg("groups", 1, None)]);
        state.apply_training_datasets(vec![TrainingDataset {
            id: 1,
            name: "train".into(),
            version: 1,
            created: "2026-01-01T00:00:00Z".parse().expect("ts"),
            job_name: None,
            inode_id: 30,
        }]);
        let names: Vec<_> = state.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["groups", "train"]);
    }

    #[test]
    fn finish_loading_computes_recent_jobs() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut state = DashboardState::new();
        state.apply_featuregroups(vec![fg("sales", 1, Some("sales_job"))]);
        state.apply_jobs(vec![job(1, "sales_job"), job(2, "other_job")]);
        state.flags.latch_featuregroups();
        state.flags.latch_training_datasets();
        state.flags.latch_jobs();
        state.flags.latch_quota();
        assert!(state.finish_loading_if_ready(now, 10, 5));
        assert_eq!(state.recent_jobs.len(), 1);
        assert_eq!(state.recent_jobs[0].name, "sales_job");
    }

    #[test]
    fn job_locality_checks_the_job_list() {
        let mut state = DashboardState::new();
        state.apply_jobs(vec![job(7, "sales_job")]);
        assert!(state.is_job_local(7));
        assert!(!state.is_job_local(8));
    }

    #[test]
    fn quota_accessors_are_none_before_the_fetch() {
        let mut state = DashboardState::new();
        assert!(state.hdfs_usage().is_none());
        assert!(state.hdfs_file_count().is_none());
        state.apply_quotas(Quotas {
            featurestore_hdfs_usage_in_bytes: 2048,
            featurestore_hdfs_quota_in_bytes: 4096,
            featurestore_hdfs_ns_count: 12,
            featurestore_hdfs_ns_quota: 1000,
        });
        assert_eq!(state.hdfs_usage().as_deref(), Some("2.0 KB"));
        assert_eq!(state.hdfs_quota().as_deref(), Some("4.0 KB"));
        assert_eq!(state.hdfs_file_count(), Some(12));
        assert_eq!(state.hdfs_file_quota(), Some(1000));
    }

    #[test]
    fn total_index_accounts_for_the_current_page() {
        let mut ui = UiState::default();
        assert_eq!(ui.total_index(0), 1);
        ui.current_page = 3;
        assert_eq!(ui.total_index(4), 25);
    }

    #[test]
    fn sort_toggles_flip_direction() {
        let mut ui = UiState::default();
        ui.sort_entities("created");
        assert_eq!(ui.entity_sort_key, "created");
        assert!(ui.reverse);
        ui.sort_entities("created");
        assert!(!ui.reverse);

        ui.sort_features("type");
        assert_eq!(ui.features_sort_key, "type");
        assert!(ui.features_reverse);
    }

    #[test]
    fn go_to_helpers_prefill_the_filters() {
        let mut ui = UiState::default();
        ui.go_to_entity("sales");
        ui.go_to_featuregroup("sales_1");
        assert_eq!(ui.entity_filter, "sales");
        assert_eq!(ui.featuregroup_filter, "sales_1");
    }
}
