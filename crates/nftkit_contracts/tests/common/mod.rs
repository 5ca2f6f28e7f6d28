//! Test doubles for the contract seam and a JSON-RPC node.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nftkit_contracts::{ContractCaller, ContractError, ContractEvent, ContractResult, TxReceipt};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// -- Contract caller -----------------------------------------------------------

/// Records calls and mints sequential token ids.
pub struct MockCaller {
    pub chain_id: u64,
    pub calls: Mutex<Vec<(String, Vec<Value>)>>,
    next_token: Mutex<u64>,
    /// Methods whose transactions are mined with a failed status.
    pub reverting: Mutex<Vec<String>>,
    /// Recipient that makes `safeMint` error before sending.
    pub rejected_recipient: Option<String>,
    pub views: HashMap<String, Value>,
}

impl MockCaller {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            calls: Mutex::new(Vec::new()),
            next_token: Mutex::new(1),
            reverting: Mutex::new(Vec::new()),
            rejected_recipient: None,
            views: HashMap::new(),
        }
    }

    pub fn with_view(mut self, method: &str, value: Value) -> Self {
        self.views.insert(method.to_string(), value);
        self
    }

    pub fn rejecting(mut self, recipient: &str) -> Self {
        self.rejected_recipient = Some(recipient.to_string());
        self
    }

    pub fn revert(&self, method: &str) {
        self.reverting.lock().unwrap().push(method.to_string());
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    fn record(&self, method: &str, args: &[Value]) {
        self.calls.lock().unwrap().push((method.to_string(), args.to_vec()));
    }
}

#[async_trait]
impl ContractCaller for MockCaller {
    async fn chain_id(&self) -> ContractResult<u64> {
        Ok(self.chain_id)
    }

    async fn call(&self, method: &str, args: &[Value]) -> ContractResult<Value> {
        self.record(method, args);
        self.views
            .get(method)
            .cloned()
            .ok_or_else(|| ContractError::caller(format!("execution reverted: {method}")))
    }

    async fn send(&self, method: &str, args: &[Value]) -> ContractResult<TxReceipt> {
        self.record(method, args);
        if method == "safeMint" && args.first().and_then(Value::as_str) == self.rejected_recipient.as_deref() {
            return Err(ContractError::caller("ERC721: mint to the zero address"));
        }

        let n = self.calls.lock().unwrap().len();
        let tx_hash = format!("0x{n:064x}");
        let status = !self.reverting.lock().unwrap().iter().any(|m| m == method);

        let mut events = Vec::new();
        if method == "safeMint" {
            let mut next = self.next_token.lock().unwrap();
            let mut args_map = serde_json::Map::new();
            args_map.insert("from".into(), json!("0x0000000000000000000000000000000000000000"));
            args_map.insert("to".into(), args[0].clone());
            args_map.insert("tokenId".into(), json!(next.to_string()));
            *next += 1;
            events.push(ContractEvent {
                name: "Transfer".into(),
                args: args_map,
            });
        }

        Ok(TxReceipt {
            tx_hash,
            status,
            block_number: Some(100),
            gas_used: Some(21_000),
            events,
        })
    }
}

// -- JSON-RPC node -------------------------------------------------------------

/// Answers JSON-RPC requests from a method -> response-object table.
///
/// Each entry is the part of the envelope besides `jsonrpc`/`id`, e.g.
/// `{"result": "0x1"}` or `{"error": {...}}`.
pub struct RpcStub {
    pub url: String,
    pub seen: Arc<Mutex<Vec<Value>>>,
}

impl RpcStub {
    pub async fn start(table: Vec<(&str, Value)>) -> Self {
        let table: Arc<HashMap<String, Value>> =
            Arc::new(table.into_iter().map(|(k, v)| (k.to_string(), v)).collect());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let recorded = Arc::clone(&seen);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let table = Arc::clone(&table);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let Some(request) = read_json_body(&mut stream).await else {
                        return;
                    };
                    let method = request["method"].as_str().unwrap_or_default().to_string();
                    let mut reply = table.get(&method).cloned().unwrap_or_else(|| {
                        json!({ "error": { "code": -32601, "message": "method not found" } })
                    });
                    reply["jsonrpc"] = json!("2.0");
                    reply["id"] = request["id"].clone();
                    recorded.lock().unwrap().push(request);

                    let body = serde_json::to_vec(&reply).unwrap();
                    let head = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(&body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            url: format!("http://{addr}"),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

async fn read_json_body(stream: &mut tokio::net::TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        let n = stream.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);

        let Some(split) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..split]).to_ascii_lowercase();
        let len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())?;
        let body_start = split + 4;
        if buf.len() >= body_start + len {
            return serde_json::from_slice(&buf[body_start..body_start + len]).ok();
        }
    }
}
