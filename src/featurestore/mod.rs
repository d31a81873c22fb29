// featurestore/mod.rs
//
// Dashboard aggregation for the feature store page: typed REST clients,
// an explicit state object, pure view transforms, and trait seams for the
// external collaborators (dialogs, notifications, chart renderer).

pub mod charts;
pub mod controller;
pub mod dialogs;
pub mod models;
pub mod notify;
pub mod search;
pub mod services;
pub mod sizes;
pub mod state;
pub mod transforms;

/// Default number of recent feature-engineering jobs shown in the header.
pub const DEFAULT_RECENT_JOBS: usize = 10;

/// Default number of data points in the feature progress chart.
pub const DEFAULT_CHART_POINTS: usize = 5;
