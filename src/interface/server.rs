//! stdin/stdout 라인 단위 JSON-RPC 2.0 도구 서버.
//! stdout은 프로토콜 프레임 전용이며 로그는 stderr로만 나간다.

use anyhow::Result;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::composition::AppComposition;
use super::tools;

const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct ToolServer {
    composition: AppComposition,
}

impl ToolServer {
    pub fn new(composition: AppComposition) -> Self {
        Self { composition }
    }

    /// stdin이 닫힐 때까지 요청을 처리한다.
    /// 개별 도구 실패는 오류 결과로 응답할 뿐 루프를 끝내지 않는다.
    pub async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let Some(reply) = self.handle_line(&line).await else {
                continue;
            };

            stdout.write_all(reply.to_string().as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    /// 한 프레임을 처리한다. 알림(id 없음)에는 응답하지 않는다.
    async fn handle_line(&self, line: &str) -> Option<Value> {
        let request: Value = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                warn!("dropping unparsable frame: {err}");
                return Some(error_reply(Value::Null, -32700, "parse error"));
            }
        };

        let id = request.get("id").cloned();
        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        debug!(method, "incoming request");

        let id = match id {
            Some(id) => id,
            None => return None,
        };

        let reply = match method {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "adopilot",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                },
            }),
            "tools/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "tools": tools::tool_descriptors() },
            }),
            "tools/call" => {
                let params = request.get("params").cloned().unwrap_or(Value::Null);
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let arguments = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));

                let result = tools::handle_call(&self.composition, &name, arguments).await;
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result,
                })
            }
            "ping" => json!({ "jsonrpc": "2.0", "id": id, "result": {} }),
            other => {
                warn!("unknown method: {other}");
                error_reply(id, -32601, "method not found")
            }
        };

        Some(reply)
    }
}

fn error_reply(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}
