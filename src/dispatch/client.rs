use super::DispatchError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for the remote `/query` responder
#[derive(Clone, Debug)]
pub struct QueryClient {
    client: Client,
    endpoint: String,
}

impl QueryClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One stateless exchange. No retries.
    pub async fn send(&self, query: &str) -> Result<String, DispatchError> {
        debug!("POST {} ({} chars)", self.endpoint, query.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest { query })
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .map(|e| e.error);
            return Err(DispatchError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        parse_reply(&body)
    }
}

/// Extract the reply from a success body
pub fn parse_reply(body: &str) -> Result<String, DispatchError> {
    serde_json::from_str::<QueryResponse>(body)
        .map(|r| r.response)
        .map_err(|e| DispatchError::MalformedPayload(e.to_string()))
}
