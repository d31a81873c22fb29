// services/rest.rs
//
// reqwest-backed implementations of the service traits. One shared
// client, per-request timeouts, api-key auth, and error payloads decoded
// into readable messages.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{FeaturestoreService, JobService, ProjectService};
use crate::featurestore::models::{
    ErrorPayload, Featuregroup, Featurestore, InodeInfo, ItemsPage, Job, ProjectInfo, Quotas,
    TrainingDataset,
};

/// Expansion asked of the jobs endpoint: each job's latest execution.
const JOB_EXPANSION: &str = "expand=executions(offset=0;limit=1;sort_by=id:desc)";

/// Shared REST client: base url, auth and timeout handling.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    fn project_url(&self, project_id: i32) -> String {
        format!("{}/project/{project_id}", self.base_url)
    }

    fn featurestore_url(&self, project_id: i32, featurestore: &Featurestore) -> String {
        format!(
            "{}/featurestores/{}",
            self.project_url(project_id),
            featurestore.featurestore_name
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self.http.request(method, url).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            req = req.header(AUTHORIZATION, format!("ApiKey {key}"));
        }
        req
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let resp = self
            .request(Method::GET, url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let resp = Self::check(resp).await?;
        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {url}"))
    }

    async fn send_ok(&self, method: Method, url: &str) -> Result<()> {
        debug!(%url, ?method, "request");
        let resp = self
            .request(method.clone(), url)
            .send()
            .await
            .with_context(|| format!("{method} {url}"))?;
        Self::check(resp).await.map(|_| ())
    }

    /// Turns a non-success response into an error carrying the backend's
    /// message when one is present.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorPayload>()
            .await
            .ok()
            .and_then(|p| p.error_msg)
            .unwrap_or_else(|| status_text(status));
        Err(anyhow!(message))
    }
}

fn status_text(status: StatusCode) -> String {
    format!("Backend call failed with status {status}")
}

pub struct RestFeaturestoreService {
    client: RestClient,
}

impl RestFeaturestoreService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeaturestoreService for RestFeaturestoreService {
    async fn featurestores(&self, project_id: i32) -> Result<Vec<Featurestore>> {
        let url = format!("{}/featurestores", self.client.project_url(project_id));
        self.client.get_json(&url).await
    }

    async fn featuregroups(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
    ) -> Result<Vec<Featuregroup>> {
        let url = format!(
            "{}/featuregroups",
            self.client.featurestore_url(project_id, featurestore)
        );
        self.client.get_json(&url).await
    }

    async fn training_datasets(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
    ) -> Result<Vec<TrainingDataset>> {
        let url = format!(
            "{}/trainingdatasets",
            self.client.featurestore_url(project_id, featurestore)
        );
        self.client.get_json(&url).await
    }

    async fn delete_featuregroup(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        featuregroup_id: i32,
    ) -> Result<()> {
        let url = format!(
            "{}/featuregroups/{featuregroup_id}",
            self.client.featurestore_url(project_id, featurestore)
        );
        self.client.send_ok(Method::DELETE, &url).await
    }

    async fn delete_training_dataset(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        training_dataset_id: i32,
    ) -> Result<()> {
        let url = format!(
            "{}/trainingdatasets/{training_dataset_id}",
            self.client.featurestore_url(project_id, featurestore)
        );
        self.client.send_ok(Method::DELETE, &url).await
    }

    async fn clear_featuregroup_contents(
        &self,
        project_id: i32,
        featurestore: &Featurestore,
        featuregroup_id: i32,
    ) -> Result<()> {
        let url = format!(
            "{}/featuregroups/{featuregroup_id}/clear",
            self.client.featurestore_url(project_id, featurestore)
        );
        self.client.send_ok(Method::POST, &url).await
    }
}

pub struct RestJobService {
    client: RestClient,
}

impl RestJobService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobService for RestJobService {
    async fn jobs(&self, project_id: i32) -> Result<Vec<Job>> {
        let url = format!(
            "{}/jobs?offset=0&limit=0&{JOB_EXPANSION}",
            self.client.project_url(project_id)
        );
        let page: ItemsPage<Job> = self.client.get_json(&url).await?;
        Ok(page.items)
    }
}

pub struct RestProjectService {
    client: RestClient,
}

impl RestProjectService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectService for RestProjectService {
    async fn quotas(&self, project_id: i32) -> Result<Quotas> {
        let url = self.client.project_url(project_id);
        let info: ProjectInfo = self.client.get_json(&url).await?;
        Ok(info.quotas)
    }

    async fn inode_size(&self, project_id: i32, inode_id: i64) -> Result<u64> {
        let url = format!("{}/inode/{inode_id}", self.client.project_url(project_id));
        let info: InodeInfo = self.client.get_json(&url).await?;
        Ok(info.size)
    }
}
