//! HTTP client for the task server.
//!
//! Requests are blocking, made once, and never retried. The terminal UI
//! waits for each one before touching its local state.

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    StatusCode,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::task::{Task, TaskFields};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("task {0} not found")]
    NotFound(u64),

    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The four CRUD calls the board needs.
pub trait TaskApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;
    fn create_task(&self, fields: &TaskFields) -> Result<Task, ClientError>;
    fn update_task(&self, id: u64, fields: &TaskFields) -> Result<Task, ClientError>;
    fn delete_task(&self, id: u64) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct TaskClient {
    http: Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn tasks_url(&self) -> String {
        join_url(&self.base_url, "tasks")
    }

    pub fn task_url(&self, id: u64) -> String {
        join_url(&self.base_url, &format!("tasks/{id}"))
    }

    fn send(url: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        request.send().map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }

    fn expect_json<T: DeserializeOwned>(
        url: &str,
        response: Response,
        expected: StatusCode,
        id: Option<u64>,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ClientError::NotFound(id));
            }
        }
        if status != expected {
            return Err(ClientError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }
        response.json().map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl TaskApi for TaskClient {
    fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.tasks_url();
        let response = Self::send(&url, self.http.get(&url))?;
        Self::expect_json(&url, response, StatusCode::OK, None)
    }

    fn create_task(&self, fields: &TaskFields) -> Result<Task, ClientError> {
        let url = self.tasks_url();
        let response = Self::send(&url, self.http.post(&url).json(fields))?;
        Self::expect_json(&url, response, StatusCode::CREATED, None)
    }

    fn update_task(&self, id: u64, fields: &TaskFields) -> Result<Task, ClientError> {
        let url = self.task_url(id);
        let response = Self::send(&url, self.http.put(&url).json(fields))?;
        Self::expect_json(&url, response, StatusCode::OK, Some(id))
    }

    fn delete_task(&self, id: u64) -> Result<(), ClientError> {
        let url = self.task_url(id);
        let response = Self::send(&url, self.http.delete(&url))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::UnexpectedStatus {
                url,
                status: response.status(),
            })
        }
    }
}

/// Joins with exactly one `/` between base and path.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
