// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use newsreel::backends::http::{HttpStage, HttpWorkflowClient};
use newsreel::errors::ClientError;
use newsreel::execution::{Execution, ExecutionId, ExecutionState};
use newsreel::pipeline::{Outcome, StageInput, StageName};
use newsreel::traits::{Stage, WorkflowClient};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

/// Loopback HTTP server answering each connection with the next canned reply.
struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CannedServer {
    async fn start(replies: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let replies = Arc::new(Mutex::new(VecDeque::from(replies)));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = replies.lock().unwrap().pop_front().unwrap_or((500, ""));
                let recorded = recorded.clone();
                tokio::spawn(answer(stream, reply, recorded));
            }
        });

        Self { base_url, requests }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one request, record it, then write the canned reply.
///
/// The request is recorded before the reply goes out, so a client that has its
/// response always sees its request in `requests()`.
async fn answer(
    mut stream: TcpStream,
    (status, body): (u16, &'static str),
    recorded: Arc<Mutex<Vec<Recorded>>>,
) -> Option<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().ok()?,
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    recorded.lock().unwrap().push(Recorded {
        method,
        path,
        authorization,
        body: String::from_utf8_lossy(&buffer[header_end..]).to_string(),
    });

    let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok()
}

fn running(id: &str, target: &str) -> Execution {
    Execution::snapshot(
        ExecutionId::new(id),
        target,
        ExecutionState::Running,
        json!({}),
        None,
        None,
    )
}

#[tokio::test]
async fn test_submit_posts_argument_as_json_string() {
    let server = CannedServer::start(vec![(
        200,
        r#"{"name": "projects/p/locations/r/workflows/w/executions/e1", "state": "ACTIVE"}"#,
    )])
    .await;
    let client = HttpWorkflowClient::new(server.url("/"), Some("secret".to_string()));
    let argument = json!({"topic": "tides", "run_id": "r1"});

    let execution = client
        .submit("projects/p/locations/r/workflows/w", &argument)
        .await
        .unwrap();

    assert_eq!(
        execution.id().as_str(),
        "projects/p/locations/r/workflows/w/executions/e1"
    );
    assert_eq!(execution.state(), ExecutionState::Running);
    assert_eq!(execution.argument(), &argument);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/v1/projects/p/locations/r/workflows/w/executions");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));

    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    let inner: Value = serde_json::from_str(sent["argument"].as_str().unwrap()).unwrap();
    assert_eq!(inner, argument);
}

#[tokio::test]
async fn test_rejected_submission_keeps_status() {
    let server = CannedServer::start(vec![(403, r#"{"error": "permission denied"}"#)]).await;
    let client = HttpWorkflowClient::new(server.url(""), None);

    let err = client.submit("projects/p/locations/r/workflows/w", &json!({})).await.unwrap_err();

    match err {
        ClientError::Submission { status, message, .. } => {
            assert_eq!(status, Some(403));
            assert!(message.contains("permission denied"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(server.requests()[0].authorization, None);
}

#[tokio::test]
async fn test_refresh_reads_terminal_result() {
    let server = CannedServer::start(vec![(
        200,
        r#"{"name": "wf/executions/e2", "state": "SUCCEEDED", "result": "{\"status\":\"uploaded\"}"}"#,
    )])
    .await;
    let client = HttpWorkflowClient::new(server.url(""), None);

    let refreshed = client.refresh(&running("wf/executions/e2", "wf")).await.unwrap();

    assert_eq!(refreshed.state(), ExecutionState::Succeeded);
    assert_eq!(refreshed.target(), "wf");
    assert_eq!(refreshed.decoded_result(), Some(json!({"status": "uploaded"})));
    assert_eq!(server.requests()[0].method, "GET");
    assert_eq!(server.requests()[0].path, "/v1/wf/executions/e2");
}

#[tokio::test]
async fn test_refresh_maps_missing_and_unavailable() {
    let server = CannedServer::start(vec![(404, ""), (503, "busy"), (200, "not json")]).await;
    let client = HttpWorkflowClient::new(server.url(""), None);
    let execution = running("wf/executions/e3", "wf");

    assert!(matches!(
        client.refresh(&execution).await,
        Err(ClientError::NotFound { .. })
    ));
    let unavailable = client.refresh(&execution).await.unwrap_err();
    assert!(unavailable.is_transport());
    assert!(matches!(
        client.refresh(&execution).await,
        Err(ClientError::Protocol { .. })
    ));
}

#[tokio::test]
async fn test_stage_posts_input_and_reads_output() {
    let server = CannedServer::start(vec![(200, r#"{"script_uri": "gs://b/r1_script.txt"}"#)]).await;
    let stage = HttpStage::new(
        StageName::Scriptwriter,
        server.url("/generate"),
        reqwest::Client::new(),
    );

    let response = stage
        .invoke(StageInput::new().with("topic", "tides").with("run_id", "r1"))
        .await
        .unwrap();

    match response.outcome {
        Outcome::Output(output) => {
            assert_eq!(output.text("script_uri"), Some("gs://b/r1_script.txt"))
        }
        Outcome::Error(detail) => panic!("unexpected error outcome: {:?}", detail),
    }
    let sent: Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(sent, json!({"topic": "tides", "run_id": "r1"}));
}

#[tokio::test]
async fn test_stage_error_key_and_failed_status() {
    let server = CannedServer::start(vec![
        (200, r#"{"error": "Script file not found"}"#),
        (502, "upstream unavailable"),
    ])
    .await;
    let stage = HttpStage::new(
        StageName::MediaSourcing,
        server.url("/media"),
        reqwest::Client::new(),
    );

    let first = stage.invoke(StageInput::new()).await.unwrap();
    assert!(first.is_error());

    let second = stage.invoke(StageInput::new()).await.unwrap();
    match second.outcome {
        Outcome::Error(detail) => {
            assert_eq!(detail.code, Some(502));
            assert_eq!(detail.payload, json!("upstream unavailable"));
        }
        Outcome::Output(_) => panic!("expected an error outcome"),
    }
}
