// main.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tracing::{info, Level};

use feature_console::featurestore::controller::DashboardController;
use feature_console::featurestore::dialogs::HeadlessDialogs;
use feature_console::featurestore::notify::TracingNotifier;
use feature_console::featurestore::services::{
    RestClient, RestFeaturestoreService, RestJobService, RestProjectService,
};
use feature_console::featurestore::sizes::SizeTarget;
use feature_console::featurestore::{DEFAULT_CHART_POINTS, DEFAULT_RECENT_JOBS};

// --- Main Entry Point ---
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting feature store console...");

    let base_url =
        env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());
    let project_id: i32 = env::var("PROJECT_ID")
        .context("PROJECT_ID must be set")?
        .parse()
        .context("PROJECT_ID must be an integer")?;
    let api_key = env::var("API_KEY").ok();
    let timeout = Duration::from_secs(
        env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
    );
    let recent_jobs_limit = env::var("RECENT_JOBS_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RECENT_JOBS);
    let chart_points = env::var("CHART_POINTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CHART_POINTS);

    let client = RestClient::new(base_url, api_key, timeout)?;
    let mut controller = DashboardController::new(
        project_id,
        Arc::new(RestFeaturestoreService::new(client.clone())),
        Arc::new(RestJobService::new(client.clone())),
        Arc::new(RestProjectService::new(client)),
        Arc::new(HeadlessDialogs),
        Arc::new(TracingNotifier),
    )
    .with_recent_jobs_limit(recent_jobs_limit)
    .with_chart_points(chart_points);

    controller.init().await;

    let state = controller.state();
    if state.loading {
        info!("Dashboard did not finish loading; partial state follows");
    }

    if let Some(store) = &state.featurestore {
        info!(
            featurestore = %store.featurestore_name,
            size = controller
                .sizes()
                .display(SizeTarget::Featurestore)
                .as_deref()
                .unwrap_or("Not fetched"),
            "active feature store"
        );
    }

    for entity in &state.entities {
        info!(
            name = %entity.name,
            kind = entity.kind.label(),
            versions = entity.versions.len(),
            active_version = %entity.active_version,
            "entity"
        );
    }

    for job in &state.recent_jobs {
        info!(
            job = %job.name,
            state = job.state.as_deref().unwrap_or("-"),
            final_status = job.final_status.as_deref().unwrap_or("-"),
            submitted = %job.submission_time,
            "recent feature engineering job"
        );
    }

    if state.quotas.is_some() {
        info!(
            usage = state.hdfs_usage().as_deref().unwrap_or("-"),
            quota = state.hdfs_quota().as_deref().unwrap_or("-"),
            files = state.hdfs_file_count().unwrap_or(0),
            file_quota = state.hdfs_file_quota().unwrap_or(0),
            "storage quota"
        );
    }

    Ok(())
}
