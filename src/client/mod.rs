/*!
 * Client for the remote translation service.
 *
 * The client is split into:
 * - `ServiceConfig`: validated, immutable service configuration
 * - `request`: resource path templating and header construction
 * - `Transport`: the seam where a request leaves the process
 * - `reqwest_transport`: the keep-alive HTTP transport used in production
 */

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::errors::ClientError;

pub mod request;
pub mod reqwest_transport;

pub use self::request::{
    HeaderMap, HttpMethod, RequestSpec, ResolvedRequest, build_headers, join_endpoint,
    resolve_path,
};
pub use self::reqwest_transport::ReqwestTransport;

/// Header carrying the subscription key
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Header carrying the subscription region
pub const SUBSCRIPTION_REGION_HEADER: &str = "ocp-apim-subscription-region";

/// Validated configuration of the translation service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    base_endpoint: Url,
    credential_key: String,
    credential_region: String,
    resource_placeholders: HashMap<String, String>,
}

impl ServiceConfig {
    /// Validate and build a service configuration.
    ///
    /// The endpoint must be an `https` URL with a host, and both credential
    /// fields must be non-empty. The error names the first offending field.
    pub fn new(
        base_endpoint: &str,
        credential_key: &str,
        credential_region: &str,
    ) -> Result<Self, ClientError> {
        let base_endpoint = base_endpoint.trim();
        if base_endpoint.is_empty() {
            return Err(ClientError::configuration(
                "base_endpoint",
                "is a required configuration property",
            ));
        }

        let url = Url::parse(base_endpoint).map_err(|e| {
            ClientError::configuration(
                "base_endpoint",
                format!("is invalid, it must be a valid https URL ({})", e),
            )
        })?;
        if url.scheme() != "https" || url.host_str().is_none_or(str::is_empty) {
            return Err(ClientError::configuration(
                "base_endpoint",
                "is invalid, it must be a valid https URL",
            ));
        }

        if credential_key.trim().is_empty() {
            return Err(ClientError::configuration(
                "credential_key",
                "is a required configuration property",
            ));
        }
        if credential_region.trim().is_empty() {
            return Err(ClientError::configuration(
                "credential_region",
                "is a required configuration property",
            ));
        }

        Ok(Self {
            base_endpoint: url,
            credential_key: credential_key.trim().to_string(),
            credential_region: credential_region.trim().to_string(),
            resource_placeholders: HashMap::new(),
        })
    }

    /// Add a client-level resource placeholder
    pub fn with_placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource_placeholders.insert(name.into(), value.into());
        self
    }

    /// Add several client-level resource placeholders
    pub fn with_placeholders(mut self, placeholders: HashMap<String, String>) -> Self {
        self.resource_placeholders.extend(placeholders);
        self
    }

    pub fn base_endpoint(&self) -> &Url {
        &self.base_endpoint
    }

    pub fn credential_key(&self) -> &str {
        &self.credential_key
    }

    pub fn credential_region(&self) -> &str {
        &self.credential_region
    }

    pub fn resource_placeholders(&self) -> &HashMap<String, String> {
        &self.resource_placeholders
    }
}

/// Headers sent with every request: content type and both credentials
pub fn default_headers(config: &ServiceConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers.insert(
        SUBSCRIPTION_KEY_HEADER.to_string(),
        config.credential_key.clone(),
    );
    headers.insert(
        SUBSCRIPTION_REGION_HEADER.to_string(),
        config.credential_region.clone(),
    );
    headers
}

/// Sends a resolved request and returns the parsed JSON response
///
/// Implementations must be shareable across concurrent requests and must not
/// retry; non-2xx answers come back as `TransportError::ApiError`.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn execute(&self, request: ResolvedRequest) -> Result<Value, ClientError>;
}

/// Translation service client
///
/// Holds only immutable state, so one instance can be shared behind an `Arc`
/// by any number of in-flight requests.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    id: Uuid,
    config: ServiceConfig,
    default_headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl ServiceClient {
    /// Create a client over an explicitly supplied transport
    pub fn new(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        let default_headers = default_headers(&config);
        Self {
            id: Uuid::new_v4(),
            config,
            default_headers,
            transport,
        }
    }

    /// Create a client over a fresh keep-alive HTTP transport
    pub fn with_default_transport(
        config: ServiceConfig,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(timeout_secs)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Resolve a request spec into a concrete request without sending it
    pub fn resolve(&self, spec: &RequestSpec) -> Result<ResolvedRequest, ClientError> {
        if spec.resource.is_empty() {
            return Err(ClientError::MissingResource);
        }

        let path = resolve_path(
            &spec.resource,
            &[&spec.extra_placeholders, &self.config.resource_placeholders],
        )?;
        let headers = build_headers(&self.default_headers, &spec.headers)?;
        let endpoint = join_endpoint(&self.config.base_endpoint, &path)?;

        Ok(ResolvedRequest {
            method: spec.method,
            endpoint,
            headers,
            query: spec.query.clone(),
            body: spec.body.clone(),
        })
    }

    /// Resolve and dispatch one request
    pub async fn send_request(&self, spec: RequestSpec) -> Result<Value, ClientError> {
        let request = self.resolve(&spec)?;
        debug!(
            "Client {} sending {} {}",
            self.id,
            request.method.as_str(),
            request.endpoint
        );
        self.transport.execute(request).await
    }
}
