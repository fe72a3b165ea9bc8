//! `ScheduleApi` implementation over the hub's REST endpoints.

use std::future::Future;

use relaydash_app::ports::ScheduleApi;
use relaydash_domain::error::{DashboardError, RejectedError};
use relaydash_domain::id::ScheduleId;
use relaydash_domain::schedule::{Schedule, ScheduleDraft};
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;

use crate::config::RestConfig;
use crate::error::RestError;

/// Answer of every mutating endpoint.
#[derive(Debug, Deserialize)]
struct MutationReply {
    success: bool,
}

/// Schedule store backed by the hub's HTTP API.
#[derive(Debug, Clone)]
pub struct RestScheduleApi {
    http: reqwest::Client,
    base: Url,
}

impl RestScheduleApi {
    /// Create a client for the API rooted at `config.base_url`.
    ///
    /// # Errors
    ///
    /// - [`RestError::InvalidUrl`] when the base URL does not parse or cannot
    ///   carry a path
    /// - [`RestError::Http`] when the HTTP client cannot be initialised
    pub fn new(config: &RestConfig) -> Result<Self, RestError> {
        let base = Url::parse(&config.base_url)
            .map_err(|err| RestError::InvalidUrl(format!("{}: {err}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(RestError::InvalidUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RestError::Http)?;
        Ok(Self { http, base })
    }

    /// `<base>/api/schedules[/<segment>]`, each segment percent-encoded.
    fn endpoint(&self, segment: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "schedules"]).extend(segment);
        }
        url
    }
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response, RestError> {
    let response = request.send().await.map_err(RestError::Http)?;
    let status = response.status();
    tracing::debug!(url = %response.url(), %status, "schedule api answered");
    if !status.is_success() {
        return Err(RestError::Status(status.as_u16()));
    }
    Ok(response)
}

async fn mutate(request: RequestBuilder, operation: &'static str) -> Result<(), DashboardError> {
    let reply: MutationReply = send(request)
        .await?
        .json()
        .await
        .map_err(RestError::Http)?;
    if reply.success {
        Ok(())
    } else {
        Err(RejectedError { operation }.into())
    }
}

impl ScheduleApi for RestScheduleApi {
    fn list(
        &self,
        device_name: &str,
    ) -> impl Future<Output = Result<Vec<Schedule>, DashboardError>> + Send {
        let request = self.http.get(self.endpoint(Some(device_name)));
        async move {
            let schedules = send(request)
                .await?
                .json()
                .await
                .map_err(RestError::Http)?;
            Ok(schedules)
        }
    }

    fn create(
        &self,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        mutate(self.http.post(self.endpoint(None)).json(draft), "create")
    }

    fn update(
        &self,
        id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        let url = self.endpoint(Some(id.as_str()));
        mutate(self.http.put(url).json(draft), "update")
    }

    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), DashboardError>> + Send {
        let url = self.endpoint(Some(id.as_str()));
        mutate(self.http.delete(url), "delete")
    }
}
