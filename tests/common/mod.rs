//! Shared test fixtures: an in-process HTTP backend and a recording RPC.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use affiliate_merchant_sdk::program::{
    ChainRpc, SimulationOutcome, TransactionError, TransactionResult,
};
use solana_hash::Hash;
use solana_signature::Signature;
use solana_transaction::Transaction;

// ============================================================================
// Mock HTTP backend
// ============================================================================

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    /// Advertise more bytes than are sent, so the client cannot read the body
    pub truncated: bool,
}

impl MockResponse {
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            truncated: false,
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::text(status, &body.to_string())
    }

    pub fn truncated(status: u16) -> Self {
        Self {
            truncated: true,
            ..Self::text(status, "{\"error\":")
        }
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::json(200, body)
    }

    pub fn error(status: u16, code: &str, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": code, "message": message }))
    }
}

type Handler = dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync;

/// Minimal HTTP/1.1 server answering every request through `handler`.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    serve_connection(stream, handler, recorded).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_matching(&self, method: &str, path_prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(path_prefix))
            .collect()
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    handler: Arc<Handler>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let body_end = (body_start + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    let request = RecordedRequest {
        method,
        path,
        headers,
        body,
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);

    let reply = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        if response.status < 400 { "OK" } else { "Error" },
        response.body.len() + if response.truncated { 64 } else { 0 },
        response.body
    );
    let _ = stream.write_all(reply.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ============================================================================
// Recording RPC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcCall {
    Blockhash,
    /// `signed` is true if any signature slot was filled
    Simulate { signed: bool },
    /// `verified` is true if every signature verifies against the message
    Submit { verified: bool },
}

/// [`ChainRpc`] double that records every call in order.
#[derive(Default)]
pub struct MockRpc {
    pub blockhash: Hash,
    pub blockhash_err: Option<String>,
    pub simulation_err: Option<String>,
    pub submit_err: Option<String>,
    /// Return an all-zero signature from submission
    pub return_empty_signature: bool,
    calls: Mutex<Vec<RpcCall>>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_from_array([7u8; 32]),
            ..Default::default()
        }
    }

    pub fn failing_blockhash(details: &str) -> Self {
        Self {
            blockhash_err: Some(details.to_string()),
            ..Self::new()
        }
    }

    pub fn failing_simulation(details: &str) -> Self {
        Self {
            simulation_err: Some(details.to_string()),
            ..Self::new()
        }
    }

    pub fn failing_submit(details: &str) -> Self {
        Self {
            submit_err: Some(details.to_string()),
            ..Self::new()
        }
    }

    /// Submission "succeeds" with an all-zero signature.
    pub fn empty_signature() -> Self {
        Self {
            return_empty_signature: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RpcCall::Submit { .. }))
            .count()
    }
}

fn all_signatures_verify(transaction: &Transaction) -> bool {
    let message = transaction.message_data();
    let signers = transaction.message.header.num_required_signatures as usize;
    transaction.signatures.len() == signers
        && transaction
            .signatures
            .iter()
            .zip(transaction.message.account_keys.iter())
            .all(|(sig, key)| sig.verify(key.as_ref(), &message))
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn latest_blockhash(&self) -> TransactionResult<Hash> {
        self.calls.lock().unwrap().push(RpcCall::Blockhash);
        match &self.blockhash_err {
            Some(e) => Err(TransactionError::Blockhash(e.clone())),
            None => Ok(self.blockhash),
        }
    }

    async fn simulate(&self, transaction: &Transaction) -> TransactionResult<SimulationOutcome> {
        let signed = transaction
            .signatures
            .iter()
            .any(|s| *s != Signature::default());
        self.calls.lock().unwrap().push(RpcCall::Simulate { signed });
        Ok(SimulationOutcome {
            err: self.simulation_err.clone(),
            logs: vec!["Program log: mock".to_string()],
            units_consumed: Some(1_000),
        })
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> TransactionResult<Signature> {
        let verified = all_signatures_verify(transaction);
        self.calls.lock().unwrap().push(RpcCall::Submit { verified });
        if let Some(e) = &self.submit_err {
            return Err(TransactionError::Submission(e.clone()));
        }
        if self.return_empty_signature {
            return Ok(Signature::default());
        }
        Ok(transaction.signatures[0])
    }
}

/// A backend-style instruction descriptor JSON whose only signer is `signer`.
pub fn instruction_json(signer: &str) -> serde_json::Value {
    serde_json::json!({
        "programId": solana_pubkey::Pubkey::new_unique().to_string(),
        "keys": [
            { "pubkey": signer, "isSigner": true, "isWritable": true },
            { "pubkey": solana_pubkey::Pubkey::new_unique().to_string(), "isSigner": false, "isWritable": true }
        ],
        "data": { "type": "Buffer", "data": [1, 2, 3] }
    })
}
