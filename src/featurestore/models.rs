// featurestore/models.rs
//
// Wire DTOs for the feature store REST API. Field names follow the
// backend's camelCase JSON; everything here is read-only from the
// dashboard's point of view and replaced wholesale on refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feature store registered for the project. Exactly one is active at a
/// time (the first of the returned list).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Featurestore {
    pub featurestore_id: i32,
    pub featurestore_name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    /// Backend filesystem reference used for on-disk size lookups.
    pub inode_id: i64,
}

/// A single column-like definition belonging to a feature group.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDef {
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Primary-key flag.
    #[serde(default)]
    pub primary: bool,
}

/// A named, versioned collection of feature definitions. Identity is the
/// (name, version) pair; several versions of the same name coexist.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Featuregroup {
    pub id: i32,
    pub name: String,
    pub version: i32,
    pub created: DateTime<Utc>,
    /// Name of the job that writes this group, if any.
    #[serde(default)]
    pub job_name: Option<String>,
    pub inode_id: i64,
    #[serde(default)]
    pub features: Vec<FeatureDef>,
}

/// A materialized dataset derived from feature groups. Same shape as a
/// feature group minus the nested feature list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDataset {
    pub id: i32,
    pub name: String,
    pub version: i32,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub job_name: Option<String>,
    pub inode_id: i64,
}

/// Denormalized feature projection used by the features table and the
/// search box: one entry per (group, feature definition) pair, stamped
/// with the owning group's identity. Recomputed on every group refetch.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    pub feature_type: String,
    pub description: Option<String>,
    pub primary: bool,
    /// Owning group name.
    pub featuregroup: String,
    pub version: i32,
    /// Owning group creation date.
    pub date: DateTime<Utc>,
    /// 1-based position of the owning group in the traversal order.
    pub idx: usize,
}

/// A single run of a job, as expanded into the job listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub final_status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    /// Run time in milliseconds.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub submission_time: Option<DateTime<Utc>>,
}

/// Paged collection wrapper used by the jobs endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemsPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// An execution-tracking record, expanded with its latest execution.
/// Matched to feature groups and training datasets by `name == job_name`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub executions: Option<ItemsPage<Execution>>,
}

impl Job {
    /// The most recent execution, if the listing was expanded with one.
    pub fn latest_execution(&self) -> Option<&Execution> {
        self.executions.as_ref().and_then(|page| page.items.first())
    }
}

/// Project storage quotas for the feature store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotas {
    pub featurestore_hdfs_usage_in_bytes: u64,
    pub featurestore_hdfs_quota_in_bytes: u64,
    /// Number of inodes stored in the feature store.
    pub featurestore_hdfs_ns_count: i64,
    /// Number of inodes allowed in the feature store.
    pub featurestore_hdfs_ns_quota: i64,
}

/// Project lookup response; only the quota block is consumed here.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectInfo {
    pub quotas: Quotas,
}

/// Inode size lookup response. Potentially slow to produce on the backend
/// for deeply nested directory trees.
#[derive(Clone, Debug, Deserialize)]
pub struct InodeInfo {
    pub size: u64,
}

/// Error payload carried by failed backend calls.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    #[serde(default)]
    pub error_msg: Option<String>,
}
