use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::DeleteTarget,
    error::ApiError,
    protocol::{DietChartSummary, PatientSummary},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod collaborators;
pub mod confirm;
pub mod dialog;
pub mod error;
pub mod settings;

pub use collaborators::{AnonymousSession, AuthSession, Navigator, Notifier, StaticSession};
pub use confirm::{
    ConfirmDeleteController, ConfirmEffect, ConfirmInput, ConfirmOutcome, ConfirmPhase,
    ConfirmState, TargetLocked, Transition,
};
pub use dialog::{is_busy, ConfirmDialog, DialogAction, DialogCopy, DialogView};
pub use error::MutationError;
pub use settings::{load_settings, Settings};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Destructive operations against the dashboard API.
#[async_trait]
pub trait DeleteApi: Send + Sync {
    async fn delete(&self, target: &DeleteTarget) -> std::result::Result<(), MutationError>;
}

/// Read-only listings backing the manager pages.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>>;
    async fn list_diet_charts(&self) -> Result<Vec<DietChartSummary>>;
}

pub struct HttpDashboardClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
    auth: Arc<dyn AuthSession>,
}

impl HttpDashboardClient {
    pub fn new(base_url: &str, timeout: Duration, auth: Arc<dyn AuthSession>) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url,
            timeout,
            auth,
        })
    }

    /// Appends `segments` to the base path. Empty and dot segments are refused,
    /// since the URL parser would collapse them onto the parent resource.
    fn resource_url(&self, segments: &[&str]) -> std::result::Result<Url, MutationError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(MutationError::Request(format!(
                "refusing to build resource path with segment {bad:?}"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MutationError::Request(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> MutationError {
        if err.is_timeout() {
            MutationError::Timeout(self.timeout)
        } else if err.is_builder() {
            MutationError::Request(err.to_string())
        } else {
            MutationError::Transport(err.to_string())
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, collection: &str) -> Result<T> {
        let url = self.resource_url(&[collection])?;
        let res = self
            .authorized(self.http.get(url.clone()))
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("server rejected listing of {collection}"))?;
        res.json()
            .await
            .with_context(|| format!("malformed {collection} listing"))
    }
}

#[async_trait]
impl DeleteApi for HttpDashboardClient {
    async fn delete(&self, target: &DeleteTarget) -> std::result::Result<(), MutationError> {
        let url = self.resource_url(&[target.collection(), target.id()])?;
        debug!(%url, target_kind = target.kind().as_str(), "sending delete request");

        let response = self
            .authorized(self.http.delete(url))
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let status = response.status();
        if status == StatusCode::OK {
            info!(
                target_kind = target.kind().as_str(),
                target_id = target.id(),
                "delete accepted"
            );
            return Ok(());
        }
        if status.is_success() {
            warn!(status = status.as_u16(), "delete returned unexpected success status");
            return Err(MutationError::UnexpectedStatus(status.as_u16()));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status = status.as_u16(), "failed to read error body: {err}");
                Default::default()
            }
        };
        let message = ApiError::message_from_body(&body);
        if message.is_none() {
            warn!(
                status = status.as_u16(),
                "error response carried no usable message"
            );
        }
        Err(MutationError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DirectoryApi for HttpDashboardClient {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>> {
        self.get_json("patients").await
    }

    async fn list_diet_charts(&self) -> Result<Vec<DietChartSummary>> {
        self.get_json("diet-charts").await
    }
}

/// Normalises the configured API root. Only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid API base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "API base url must use http or https, got '{}'",
            url.scheme()
        ));
    }
    if url.cannot_be_a_base() {
        return Err(anyhow!("API base url '{raw}' cannot carry a path"));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
