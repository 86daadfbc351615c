// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::wire::{ExecutionRecord, SubmitBody};
use crate::errors::ClientError;
use crate::execution::Execution;
use crate::traits::WorkflowClient;

/// Workflow client for an executions REST API.
///
/// * create: `POST {base}/v1/{target}/executions` with `{"argument": "<json>"}`
/// * get: `GET {base}/v1/{execution name}`
///
/// A target that is already an absolute URL is posted to `{target}/executions`
/// directly.
pub struct HttpWorkflowClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpWorkflowClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(base_url, token, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, token: Option<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        }
    }

    pub fn executions_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            format!("{}/executions", target.trim_end_matches('/'))
        } else {
            format!("{}/v1/{}/executions", self.base_url, target.trim_matches('/'))
        }
    }

    pub fn execution_url(&self, name: &str) -> String {
        format!("{}/v1/{}", self.base_url, name.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn read_record(response: Response) -> Result<ExecutionRecord, ClientError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Protocol {
        message: format!("malformed execution record: {}", e),
    })
}

async fn error_text(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => format!("{}: {}", status, body.trim()),
        _ => status.to_string(),
    }
}

#[async_trait]
impl WorkflowClient for HttpWorkflowClient {
    async fn submit(&self, target: &str, argument: &Value) -> Result<Execution, ClientError> {
        let body = SubmitBody {
            argument: argument.to_string(),
        };

        let response = self
            .authorize(self.http.post(self.executions_url(target)))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Submission {
                target: target.to_string(),
                status: Some(status.as_u16()),
                message: error_text(response).await,
            });
        }

        Ok(read_record(response)
            .await?
            .into_execution(target, argument.clone()))
    }

    async fn refresh(&self, execution: &Execution) -> Result<Execution, ClientError> {
        let response = self
            .authorize(self.http.get(self.execution_url(execution.id().as_str())))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                execution_id: execution.id().clone(),
            });
        }
        if status.is_server_error() {
            return Err(ClientError::Transport {
                message: error_text(response).await,
            });
        }
        if !status.is_success() {
            return Err(ClientError::Protocol {
                message: error_text(response).await,
            });
        }

        Ok(read_record(response)
            .await?
            .into_execution(execution.target(), execution.argument().clone()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
