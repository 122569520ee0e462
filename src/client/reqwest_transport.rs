use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::{Client, Method};
use serde_json::Value;

use super::{ResolvedRequest, Transport};
use super::request::HttpMethod;
use crate::errors::{ClientError, TransportError};

/// Keep-alive HTTP transport backed by a single pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client; its connection pool is shared by every request
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                ClientError::configuration("transport", format!("could not be built: {}", e))
            })?;

        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn classify(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::ConnectionError(e.to_string())
        } else {
            TransportError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ResolvedRequest) -> Result<Value, ClientError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), request.endpoint.clone())
            .query(&request.query);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_null() {
            builder = builder.json(&request.body);
        }

        let response = builder.send().await.map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation API error ({}): {}", status, error_text);
            return Err(TransportError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            }
            .into());
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::ParseError(e.to_string()))?;

        Ok(body)
    }
}
