use crate::errors::GatewayError;
use crate::models::chat::BackendQuery;
use log::warn;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

/// Client for the question-answering backend. One outbound call per
/// invocation, no retries; the request timeout is explicit so a hung backend
/// degrades into the unreachable path instead of stalling the gateway.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: HttpClient,
    url: String,
}

impl BackendClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Forwards a user message as `{query}` and returns the backend's JSON
    /// body. Non-2xx responses and transport/parse failures come back as
    /// `GatewayError` variants for the caller to absorb.
    pub async fn ask(&self, message: &str) -> Result<Value, GatewayError> {
        let req = BackendQuery {
            query: message.to_string(),
        };

        let resp = match self.http.post(&self.url).json(&req).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Backend unreachable at {}: {}", self.url, e);
                return Err(GatewayError::BackendUnreachable(e));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            warn!("Backend rejected query: {} - {}", status, body);
            return Err(GatewayError::BackendRejected { status, body });
        }

        match resp.json::<Value>().await {
            Ok(json) => Ok(json),
            Err(e) => {
                warn!("Backend returned unparseable body: {}", e);
                Err(GatewayError::BackendUnreachable(e))
            }
        }
    }
}

/// Ordered-fallback extraction over the backend's untyped payload:
/// `answer` wins over `reply`, and the whole raw value is the last resort.
/// `null` fields count as absent; non-string matches render as compact JSON.
pub fn extract_reply(value: &Value) -> String {
    for key in ["answer", "reply"] {
        match value.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
        }
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
