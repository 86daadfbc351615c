// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage contract types shared by every stage collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Scriptwriter,
    MediaSourcing,
    Narrator,
    VideoAssembly,
    Uploader,
}

impl StageName {
    pub const ALL: [StageName; 5] = [
        StageName::Scriptwriter,
        StageName::MediaSourcing,
        StageName::Narrator,
        StageName::VideoAssembly,
        StageName::Uploader,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Scriptwriter => "scriptwriter",
            StageName::MediaSourcing => "media_sourcing",
            StageName::Narrator => "narrator",
            StageName::VideoAssembly => "video_assembly",
            StageName::Uploader => "uploader",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

/// A single named stage input: a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for StageValue {
    fn from(value: &str) -> Self {
        StageValue::Text(value.to_string())
    }
}

impl From<String> for StageValue {
    fn from(value: String) -> Self {
        StageValue::Text(value)
    }
}

impl From<Vec<String>> for StageValue {
    fn from(value: Vec<String>) -> Self {
        StageValue::List(value)
    }
}

/// Named inputs handed to a stage. Ordered so the serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageInput(BTreeMap<String, StageValue>);

impl StageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<StageValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<StageValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StageValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(StageValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.0.get(name) {
            Some(StageValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, value)| {
                    let value = match value {
                        StageValue::Text(text) => Value::String(text.clone()),
                        StageValue::List(items) => {
                            Value::Array(items.iter().cloned().map(Value::String).collect())
                        }
                    };
                    (name.clone(), value)
                })
                .collect(),
        )
    }
}

/// Named outputs produced by a successful stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageOutput(Map<String, Value>);

impl StageOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// A list of strings. Any non-string element disqualifies the whole value.
    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        self.0.get(name)?.as_array()?.iter().map(|item| item.as_str().map(str::to_string)).collect()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for StageOutput {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Output(StageOutput),
    Error(ErrorDetail),
}

/// What a stage reports back: named outputs on success, or an error description.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResponse {
    pub outcome: Outcome,
}

impl StageResponse {
    pub fn output(output: StageOutput) -> Self {
        Self {
            outcome: Outcome::Output(output),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            outcome: Outcome::Error(ErrorDetail {
                code: None,
                payload: Value::String(message.clone()),
                message,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Interpret a stage's JSON body.
    ///
    /// Any object carrying an `error` key is a failure, whatever else it holds.
    pub fn from_json(body: Value) -> Result<Self, ClientError> {
        let map = match body {
            Value::Object(map) => map,
            other => {
                return Err(ClientError::Protocol {
                    message: format!("stage response is not a JSON object: {}", other),
                })
            }
        };

        match map.get("error") {
            Some(error) => {
                let message = match error {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                Ok(Self {
                    outcome: Outcome::Error(ErrorDetail {
                        code: None,
                        message,
                        payload: error.clone(),
                    }),
                })
            }
            None => Ok(Self::output(StageOutput(map))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_name_round_trips_through_str() {
        for name in StageName::ALL {
            assert_eq!(name.as_str().parse::<StageName>().unwrap(), name);
        }
        assert!("editor".parse::<StageName>().is_err());
    }

    #[test]
    fn test_stage_input_serializes_lists_and_text() {
        let input = StageInput::new()
            .with("run_id", "r1")
            .with("media_uris", vec!["a.ppm".to_string(), "b.ppm".to_string()]);

        assert_eq!(
            input.to_json(),
            json!({"media_uris": ["a.ppm", "b.ppm"], "run_id": "r1"})
        );
        assert_eq!(serde_json::to_value(&input).unwrap(), input.to_json());
        assert_eq!(input.text("run_id"), Some("r1"));
        assert_eq!(input.list("media_uris").map(|l| l.len()), Some(2));
        assert!(input.text("media_uris").is_none());
    }

    #[test]
    fn test_error_key_wins_over_outputs() {
        let response =
            StageResponse::from_json(json!({"script_uri": "x", "error": "quota exceeded"})).unwrap();
        match response.outcome {
            Outcome::Error(detail) => {
                assert_eq!(detail.message, "quota exceeded");
                assert_eq!(detail.payload, json!("quota exceeded"));
            }
            Outcome::Output(_) => panic!("expected error outcome"),
        }
    }

    #[test]
    fn test_structured_error_is_kept_as_payload() {
        let response = StageResponse::from_json(json!({"error": {"reason": "bad"}})).unwrap();
        let Outcome::Error(detail) = response.outcome else {
            panic!("expected error outcome");
        };
        assert_eq!(detail.payload, json!({"reason": "bad"}));
        assert_eq!(detail.message, "{\"reason\":\"bad\"}");
    }

    #[test]
    fn test_non_object_body_is_protocol_error() {
        let err = StageResponse::from_json(json!(["nope"])).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { .. }));
    }

    #[test]
    fn test_output_list_rejects_mixed_elements() {
        let output = StageOutput::new()
            .with("media_uris", json!(["a", 1]))
            .with("ok", json!(["a", "b"]));
        assert!(output.list("media_uris").is_none());
        assert_eq!(output.list("ok"), Some(vec!["a".to_string(), "b".to_string()]));
    }
}
