// featurestore/sizes.rs
//
// On-demand size lookups. The backend walks the inode tree to compute a
// directory size, which can be slow, so each target kind allows at most
// one request in flight; extra calls are dropped, not queued.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::{debug, warn};

use super::notify::Notifier;
use super::services::ProjectService;

const BYTE_UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

/// Converts a raw byte count into a human-readable binary-prefix string.
/// Always divides at least once (sub-kilobyte counts render as fractions
/// of a KB) and floors the mantissa at 0.1.
pub fn convert_size(bytes: u64) -> String {
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value.max(0.1), BYTE_UNITS[unit])
}

/// Which size display a fetch is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeTarget {
    Featurestore,
    Featuregroup,
}

impl SizeTarget {
    fn label(&self) -> &'static str {
        match self {
            SizeTarget::Featurestore => "featurestore",
            SizeTarget::Featuregroup => "feature group",
        }
    }
}

/// Keyed single-flight guard: `try_begin` yields a guard only while no
/// other fetch for the same target holds one. Dropping the guard releases
/// the slot, so a failed fetch can be retried.
#[derive(Default)]
pub struct SizeTracker {
    in_flight: DashMap<SizeTarget, ()>,
}

impl SizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, target: SizeTarget) -> Option<SizeFetchGuard<'_>> {
        use dashmap::mapref::entry::Entry;
        match self.in_flight.entry(target) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(SizeFetchGuard {
                    tracker: self,
                    target,
                })
            }
        }
    }

    pub fn is_in_flight(&self, target: SizeTarget) -> bool {
        self.in_flight.contains_key(&target)
    }
}

pub struct SizeFetchGuard<'a> {
    tracker: &'a SizeTracker,
    target: SizeTarget,
}

impl Drop for SizeFetchGuard<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.remove(&self.target);
    }
}

/// Single-flight size fetcher shared between the controller and anything
/// that spawns fetches in the background. Holds the two human-readable
/// size displays; a failed fetch leaves the displayed value untouched.
pub struct SizeFetcher {
    tracker: SizeTracker,
    project_svc: Arc<dyn ProjectService>,
    notifier: Arc<dyn Notifier>,
    project_id: i32,
    featurestore_size: RwLock<Option<String>>,
    featuregroup_size: RwLock<Option<String>>,
}

impl SizeFetcher {
    pub fn new(
        project_svc: Arc<dyn ProjectService>,
        notifier: Arc<dyn Notifier>,
        project_id: i32,
    ) -> Self {
        Self {
            tracker: SizeTracker::new(),
            project_svc,
            notifier,
            project_id,
            featurestore_size: RwLock::new(None),
            featuregroup_size: RwLock::new(None),
        }
    }

    /// Resolves the size of the given inode and stores it as a readable
    /// string under `target`. A no-op while a fetch for the same target is
    /// outstanding.
    pub async fn fetch(&self, target: SizeTarget, inode_id: i64) {
        let Some(_guard) = self.tracker.try_begin(target) else {
            debug!(kind = target.label(), "size fetch already in flight, dropping");
            return;
        };

        match self.project_svc.inode_size(self.project_id, inode_id).await {
            Ok(bytes) => {
                let readable = convert_size(bytes);
                debug!(kind = target.label(), %inode_id, %readable, "size resolved");
                *self.slot(target).write().expect("size slot poisoned") = Some(readable);
            }
            Err(e) => {
                warn!(kind = target.label(), %inode_id, error = ?e, "size fetch failed");
                self.notifier.error(
                    &format!("Failed to fetch size of {}", target.label()),
                    &format!("{e:#}"),
                );
            }
        }
    }

    pub fn display(&self, target: SizeTarget) -> Option<String> {
        self.slot(target).read().expect("size slot poisoned").clone()
    }

    fn slot(&self, target: SizeTarget) -> &RwLock<Option<String>> {
        match target {
            SizeTarget::Featurestore => &self.featurestore_size,
            SizeTarget::Featuregroup => &self.featuregroup_size,
        }
    }
}
