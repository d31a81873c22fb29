// featurestore/transforms.rs
//
// Pure, synchronous view transforms. Everything here is re-derived from
// scratch on every fetch; there is no incremental merge.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};

use super::models::{Feature, Featuregroup, Job, TrainingDataset};

/// Whether a grouped entity is a feature group or a training dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Featuregroup,
    TrainingDataset,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Featuregroup => "Feature Group",
            EntityKind::TrainingDataset => "Training Dataset",
        }
    }
}

/// Entities that carry a (name, version) identity and can be grouped.
pub trait Versioned {
    fn entity_name(&self) -> &str;
    fn entity_version(&self) -> i32;
    fn job_name(&self) -> Option<&str>;
    const KIND: EntityKind;
}

impl Versioned for Featuregroup {
    fn entity_name(&self) -> &str {
        &self.name
    }
    fn entity_version(&self) -> i32 {
        self.version
    }
    fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref()
    }
    const KIND: EntityKind = EntityKind::Featuregroup;
}

impl Versioned for TrainingDataset {
    fn entity_name(&self) -> &str {
        &self.name
    }
    fn entity_version(&self) -> i32 {
        self.version
    }
    fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref()
    }
    const KIND: EntityKind = EntityKind::TrainingDataset;
}

/// All versions of one entity name. Versions are ordered numerically
/// ascending and the active version is the numeric maximum; versions need
/// not be contiguous.
#[derive(Clone, Debug)]
pub struct VersionGroup<T> {
    pub name: String,
    pub kind: EntityKind,
    /// Version number -> entity, numerically ordered.
    pub by_version: BTreeMap<i32, T>,
}

impl<T> VersionGroup<T> {
    /// Stringified version keys, numerically ascending.
    pub fn versions(&self) -> Vec<String> {
        self.by_version.keys().map(|v| v.to_string()).collect()
    }

    /// The numerically greatest version.
    pub fn active_version(&self) -> i32 {
        self.by_version
            .keys()
            .next_back()
            .copied()
            .unwrap_or_default()
    }

    /// The entity at the active version.
    pub fn active(&self) -> Option<&T> {
        self.by_version.values().next_back()
    }

    pub fn overview(&self) -> EntityOverview {
        EntityOverview {
            name: self.name.clone(),
            kind: self.kind,
            versions: self.versions(),
            active_version: self.active_version().to_string(),
        }
    }
}

/// Flat, type-erased row for the combined feature-group / training-dataset
/// table.
#[derive(Clone, Debug)]
pub struct EntityOverview {
    pub name: String,
    pub kind: EntityKind,
    pub versions: Vec<String>,
    pub active_version: String,
}

/// Groups entities by name into one `VersionGroup` per distinct name.
/// Groups come out in first-appearance order of the name; within a group
/// the version map is numerically ordered. Later entries win on a
/// duplicate (name, version) pair.
pub fn group_by_version<T: Versioned + Clone>(entities: &[T]) -> Vec<VersionGroup<T>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, BTreeMap<i32, T>> = BTreeMap::new();

    for entity in entities {
        let name = entity.entity_name().to_string();
        if !groups.contains_key(&name) {
            order.push(name.clone());
        }
        groups
            .entry(name)
            .or_default()
            .insert(entity.entity_version(), entity.clone());
    }

    order
        .into_iter()
        .map(|name| {
            let by_version = groups.remove(&name).unwrap_or_default();
            VersionGroup {
                name,
                kind: T::KIND,
                by_version,
            }
        })
        .collect()
}

/// Flattens every group's feature list into a single denormalized list,
/// preserving group traversal order and within-group feature order. Each
/// row is stamped with its owning group's name, version, creation date and
/// 1-based position.
pub fn collect_all_features(featuregroups: &[Featuregroup]) -> Vec<Feature> {
    let mut features = Vec::new();
    for (i, group) in featuregroups.iter().enumerate() {
        for def in &group.features {
            features.push(Feature {
                name: def.name.clone(),
                feature_type: def.feature_type.clone(),
                description: def.description.clone(),
                primary: def.primary,
                featuregroup: group.name.clone(),
                version: group.version,
                date: group.created,
                idx: i + 1,
            });
        }
    }
    features
}

/// A job row for the recent feature-engineering list: the job's latest
/// execution flattened into one record.
#[derive(Clone, Debug)]
pub struct EngineeringJob {
    pub name: String,
    pub state: Option<String>,
    pub final_status: Option<String>,
    pub progress: Option<f64>,
    pub duration: Option<i64>,
    pub submission_time: DateTime<Utc>,
}

/// Selects jobs whose name matches some feature group's or training
/// dataset's owning job and which have a defined submission time, most
/// recently submitted first, truncated to `limit`.
pub fn recent_feature_engineering_jobs(
    jobs: &[Job],
    featuregroups: &[Featuregroup],
    training_datasets: &[TrainingDataset],
    limit: usize,
) -> Vec<EngineeringJob> {
    let mut matched: Vec<EngineeringJob> = Vec::new();
    for job in jobs {
        let Some(execution) = job.latest_execution() else {
            continue;
        };
        let Some(submission_time) = execution.submission_time else {
            continue;
        };
        let owns_entity = featuregroups
            .iter()
            .any(|fg| fg.job_name() == Some(job.name.as_str()))
            || training_datasets
                .iter()
                .any(|td| td.job_name() == Some(job.name.as_str()));
        if !owns_entity {
            continue;
        }
        matched.push(EngineeringJob {
            name: job.name.clone(),
            state: execution.state.clone(),
            final_status: execution.final_status.clone(),
            progress: execution.progress,
            duration: execution.duration,
            submission_time,
        });
    }
    matched.sort_by(|a, b| b.submission_time.cmp(&a.submission_time));
    matched.truncate(limit);
    matched
}

/// Finds the feature group with the given name and version.
pub fn featuregroup_by_name_and_version<'a>(
    featuregroups: &'a [Featuregroup],
    name: &str,
    version: i32,
) -> Option<&'a Featuregroup> {
    featuregroups
        .iter()
        .find(|fg| fg.name == name && fg.version == version)
}

/// Display name combining a feature group name with its version.
pub fn featuregroup_select_name(name: &str, version: i32) -> String {
    format!("{name}_{version}")
}

/// Formats a timestamp as `YYYY-mm-dd HH:MM:00` with the minutes floored
/// to the nearest multiple of five, as shown in the entity tables.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    let minute = (ts.minute() / 5) * 5;
    format!("{} {:02}:{:02}:00", ts.format("%Y-%m-%d"), ts.hour(), minute)
}

/// Python snippet offered for copy-paste next to a search result.
pub fn feature_api_snippet(
    feature_name: &str,
    featurestore_name: &str,
    featuregroup_name: &str,
    version: i32,
) -> String {
    format!(
        "from hops import featurestore\n\
         featurestore.get_feature(\n\
         '{feature_name}',\n\
         featurestore='{featurestore_name}',\n\
         featuregroup='{featuregroup_name}',\n\
         featuregroup_version={version})"
    )
}
