// featurestore/services/mod.rs
//
// Collaborator contracts for the backend services, one trait per
// service. The REST implementations live in `rest`; tests substitute
// in-memory impls.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Featuregroup, Featurestore, Job, Quotas, TrainingDataset};

pub use rest::{RestClient, RestFeaturestoreService, RestJobService, RestProjectService};

mod rest;

/// Feature store collections and mutations.
#[async_trait]
pub trait FeaturestoreService: Send + Sync {
    /// Ordered list of feature stores for the project.
    async fn featurestores(&self, project_id: i32) -> Result<Vec<Featurestore>>;

    /// Ordered list of feature groups in one feature store, each with its
    /// nested feature definitions.
    async fn featuregroups(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
    ) -> Result<Vec<Featuregroup>>;

    /// Ordered list of training datasets in one feature store.
    async fn training_datasets(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
    ) -> Result<Vec<TrainingDataset>>;

    async fn delete_featuregroup(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        featuregroup_id: i32,
    ) -> Result<()>;

    async fn delete_training_dataset(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        training_dataset_id: i32,
    ) -> Result<()>;

    /// Drops the data of a feature group while keeping its metadata.
    async fn clear_featuregroup_contents(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        featuregroup_id: i32,
    ) -> Result<()>;
}

/// Job listings, expanded with each job's latest execution.
#[async_trait]
pub trait JobService: Send + Sync {
    async fn jobs(&self, project_id: i32) -> Result<Vec<Job>>;
}

/// Project-level lookups: quotas and inode sizes.
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn quotas(&self, project_id: i32) -> Result<Quotas>;

    /// Byte size of an inode subtree. Potentially slow for deep trees.
    async fn inode_size(&self, project_id: i32, inode_id: i64) -> Result<u64>;
}
