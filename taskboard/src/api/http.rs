//! HTTP collaborator backed by `reqwest`.
//!
//! Every path is resolved relative to the configured base URL, so the board
//! works unchanged behind a reverse proxy that mounts the API under a prefix.

use reqwest::Client;
use taskboard_proto::api::{NewTask, StatusUpdate, TASKS_PATH, task_status_path};
use taskboard_proto::codec;
use taskboard_proto::task::{Task, TaskId, TaskStatus};
use url::Url;

use super::{ApiError, TaskApi};

/// Task collaborator reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base: Url,
}

impl HttpTaskApi {
    /// Creates a client for the collaborator at `base_url`.
    ///
    /// A missing trailing slash is added so that relative paths extend the
    /// base path instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// URL that can carry paths.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a collaborator that reuses an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` cannot be parsed.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    /// The normalized base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    /// Reads the body of a successful response, mapping non-2xx to [`ApiError::Rejected`].
    async fn success_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "collaborator rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

fn decode_error(e: codec::CodecError) -> ApiError {
    ApiError::Decode(e.to_string())
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(TASKS_PATH)?;
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let body = Self::success_body(response).await?;
        codec::decode_task_list(&body).map_err(decode_error)
    }

    async fn create_task(&self, body: &NewTask) -> Result<Task, ApiError> {
        let url = self.endpoint(TASKS_PATH)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let body = Self::success_body(response).await?;
        codec::decode_task(&body).map_err(decode_error)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, ApiError> {
        let url = self.endpoint(&task_status_path(id))?;
        let response = self
            .client
            .patch(url)
            .json(&StatusUpdate { status })
            .send()
            .await
            .map_err(transport_error)?;
        let body = Self::success_body(response).await?;
        codec::decode_task(&body).map_err(decode_error)
    }
}
