// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ClientError;
use crate::pipeline::{ErrorDetail, Outcome, StageInput, StageName, StageResponse};
use crate::traits::Stage;

/// A stage service reached by POSTing its JSON input.
///
/// A body with an `error` key is a stage failure whatever the status. A
/// non-2xx answer is a stage failure carrying the status code; a 2xx answer
/// whose body is not JSON is a protocol fault.
pub struct HttpStage {
    name: StageName,
    url: String,
    http: reqwest::Client,
}

impl HttpStage {
    pub fn new(name: StageName, url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            name,
            url: url.into(),
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Stage for HttpStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let response = self.http.post(&self.url).json(&input).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let decoded = serde_json::from_str::<Value>(&body);
        match decoded {
            Ok(value) if value.is_object() || status.is_success() => {
                let mut parsed = StageResponse::from_json(value.clone())?;
                if status.is_success() {
                    return Ok(parsed);
                }
                match &mut parsed.outcome {
                    Outcome::Error(detail) => detail.code = Some(status.as_u16()),
                    Outcome::Output(_) => {
                        parsed.outcome = Outcome::Error(ErrorDetail {
                            code: Some(status.as_u16()),
                            message: format!("{} answered {}", self.name, status),
                            payload: value,
                        })
                    }
                }
                Ok(parsed)
            }
            _ if !status.is_success() => Ok(StageResponse {
                outcome: Outcome::Error(ErrorDetail {
                    code: Some(status.as_u16()),
                    message: format!("{} answered {}: {}", self.name, status, body.trim()),
                    payload: Value::String(body),
                }),
            }),
            _ => Err(ClientError::Protocol {
                message: format!("{} returned a non-JSON body", self.name),
            }),
        }
    }

    fn name(&self) -> StageName {
        self.name
    }
}
