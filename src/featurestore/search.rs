// featurestore/search.rs
//
// Exact-name feature search over the flattened feature list. The result
// is a tagged outcome rather than a string sentinel mixed with result
// objects; the "not found" text survives only as a display helper.

use super::models::{Feature, Featuregroup};
use super::transforms::{featuregroup_by_name_and_version, featuregroup_select_name};

/// One matching feature together with its owning group.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub feature: Feature,
    /// Owning group name.
    pub group_name: String,
    /// Group name with version suffix, for the result dropdown.
    pub long_name: String,
    /// The owning group record, when it is still present in the list.
    pub featuregroup: Option<Featuregroup>,
}

/// Outcome of a feature search.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    NotFound {
        query: String,
    },
    Found(SearchHit),
    /// Several groups carry a feature with the queried name; `active` is
    /// the index of the currently selected hit (initially the first).
    Ambiguous {
        hits: Vec<SearchHit>,
        active: usize,
    },
}

impl SearchOutcome {
    /// The currently active hit, if any.
    pub fn active_hit(&self) -> Option<&SearchHit> {
        match self {
            SearchOutcome::NotFound { .. } => None,
            SearchOutcome::Found(hit) => Some(hit),
            SearchOutcome::Ambiguous { hits, active } => hits.get(*active),
        }
    }

    /// Whether the UI should offer a result dropdown.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, SearchOutcome::Ambiguous { .. })
    }

    /// Human-readable message for a missed search.
    pub fn not_found_message(&self) -> Option<String> {
        match self {
            SearchOutcome::NotFound { query } => {
                Some(format!("Feature '{query}' not found."))
            }
            _ => None,
        }
    }

    /// Switches the active hit to the one owned by `group_name`. No-op
    /// when the outcome is not ambiguous or the group is not among the
    /// hits.
    pub fn select_group(&mut self, group_name: &str) {
        if let SearchOutcome::Ambiguous { hits, active } = self {
            if let Some(pos) = hits.iter().position(|h| h.group_name == group_name) {
                *active = pos;
            }
        }
    }
}

/// Case-sensitive exact-name scan of the flattened feature list. One
/// match is `Found`; several are `Ambiguous` with the first selected.
pub fn feature_search(
    features: &[Feature],
    featuregroups: &[Featuregroup],
    query: &str,
) -> SearchOutcome {
    let mut hits: Vec<SearchHit> = Vec::new();
    for feature in features {
        if feature.name != query {
            continue;
        }
        hits.push(SearchHit {
            group_name: feature.featuregroup.clone(),
            long_name: featuregroup_select_name(&feature.featuregroup, feature.version),
            featuregroup: featuregroup_by_name_and_version(
                featuregroups,
                &feature.featuregroup,
                feature.version,
            )
            .cloned(),
            feature: feature.clone(),
        });
    }

    match hits.len() {
        0 => SearchOutcome::NotFound {
            query: query.to_string(),
        },
        1 => SearchOutcome::Found(hits.remove(0)),
        _ => SearchOutcome::Ambiguous { hits, active: 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featurestore::models::FeatureDef;
    use crate::featurestore::transforms::collect_all_features;

    fn group_with(name: &str, version: i32, feature_names: &[&str]) -> Featuregroup {
        Featuregroup {
            id: version,
            name: name.to_string(),
            version,
            created: "2026-01-01T00:00:00Z".parse().expect("ts"),
            job_name: None,
            inode_id: 42,
            features: feature_names
                .iter()
                .map(|n| FeatureDef {
                    name: n.to_string(),
                    feature_type: "int".into(),
                    description: None,
                    primary: false,
                })
                .collect(),
        }
    }

    #[test]
    fn miss_on_non_empty_list_is_not_found_and_not_ambiguous() {
        let groups = vec![group_with("sales", 1, &["total"])];
        let features = collect_all_features(&groups);
        let outcome = feature_search(&features, &groups, "nonexistent");
        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
        assert!(!outcome.is_ambiguous());
        assert_eq!(
            outcome.not_found_message().as_deref(),
            Some("Feature 'nonexistent' not found.")
        );
    }

    #[test]
    fn search_is_case_sensitive() {
        let groups = vec![group_with("sales", 1, &["Total"])];
        let features = collect_all_features(&groups);
        assert!(matches!(
            feature_search(&features, &groups, "total"),
            SearchOutcome::NotFound { .. }
        ));
    }

    #[test]
    fn single_match_is_found_with_owning_group_resolved() {
        let groups = vec![
            group_with("sales", 1, &["total"]),
            group_with("traffic", 1, &["visits"]),
        ];
        let features = collect_all_features(&groups);
        let outcome = feature_search(&features, &groups, "visits");
        let SearchOutcome::Found(hit) = outcome else {
            panic!("expected Found");
        };
        assert_eq!(hit.group_name, "traffic");
        assert_eq!(hit.long_name, "traffic_1");
        assert_eq!(hit.featuregroup.as_ref().map(|g| g.id), Some(1));
    }

    #[test]
    fn multiple_matches_select_first_and_allow_switching() {
        let groups = vec![
            group_with("sales", 1, &["total"]),
            group_with("orders", 3, &["total"]),
        ];
        let features = collect_all_features(&groups);
        let mut outcome = feature_search(&features, &groups, "total");
        assert!(outcome.is_ambiguous());
        assert_eq!(
            outcome.active_hit().map(|h| h.group_name.as_str()),
            Some("sales")
        );

        outcome.select_group("orders");
        assert_eq!(
            outcome.active_hit().map(|h| h.group_name.as_str()),
            Some("orders")
        );

        // Unknown group leaves the selection untouched.
        outcome.select_group("missing");
        assert_eq!(
            outcome.active_hit().map(|h| h.group_name.as_str()),
            Some("orders")
        );
    }
}
