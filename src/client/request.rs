use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::errors::ClientError;

// @const: Resource placeholder token, e.g. `{region}` or `{items[0]}`
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([-_a-zA-Z0-9\[\]]+)\}").expect("placeholder regex is valid")
});

// @const: Absolute URL prefix, e.g. `https://`
static ABSOLUTE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("absolute URL regex is valid")
});

/// Lowercase header name to value
pub type HeaderMap = BTreeMap<String, String>;

/// HTTP method of a service request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A request as described by the caller, before placeholders and headers are resolved
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// HTTP method, POST unless set otherwise
    pub method: HttpMethod,

    /// Resource path template, e.g. `translate` or `{account}/glossaries`
    pub resource: String,

    /// Call-site placeholder values; these win over client-level ones
    pub extra_placeholders: HashMap<String, String>,

    /// Query parameters in the order they are sent
    pub query: Vec<(String, String)>,

    /// JSON body
    pub body: Value,

    /// Extra headers applied in sequence over the defaults
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// Create a POST request for the given resource template
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Default::default()
        }
    }

    /// Set the HTTP method
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a call-site placeholder value
    pub fn placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_placeholders.insert(name.into(), value.into());
        self
    }

    /// Append a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body
    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Append a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully concrete request, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Value,
}

/// Substitute every `{name}` token in `template`.
///
/// Sources are searched in order and the first one holding the name wins, so
/// callers pass call-site values before configured ones. Fails on the first
/// token no source can satisfy; a partially substituted path is never returned.
pub fn resolve_path(
    template: &str,
    sources: &[&HashMap<String, String>],
) -> Result<String, ClientError> {
    let mut resolved = String::with_capacity(template.len());
    let mut last_end = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = sources
            .iter()
            .find_map(|source| source.get(name))
            .ok_or_else(|| ClientError::MissingPlaceholder(name.to_string()))?;

        resolved.push_str(&template[last_end..token.start()]);
        resolved.push_str(value);
        last_end = token.end();
    }

    resolved.push_str(&template[last_end..]);
    Ok(resolved)
}

/// Merge `supplied` over a copy of `defaults`.
///
/// Supplied names are lowercased and applied in order, so the last of two
/// case variants wins. An `authorization` header must use the `Bearer ` scheme.
pub fn build_headers(
    defaults: &HeaderMap,
    supplied: &[(String, String)],
) -> Result<HeaderMap, ClientError> {
    let mut headers = defaults.clone();
    for (name, value) in supplied {
        headers.insert(name.to_lowercase(), value.clone());
    }

    if let Some(authorization) = headers.get("authorization") {
        if !authorization.starts_with("Bearer ") {
            return Err(ClientError::InvalidHeader(authorization.clone()));
        }
    }

    Ok(headers)
}

/// Join a resolved resource path onto the base endpoint.
///
/// Only a path starting with `scheme://` counts as absolute, and it must be
/// `https` with a host. Anything else is joined with exactly one `/`.
pub fn join_endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    if ABSOLUTE_URL_REGEX.is_match(path) {
        let absolute = Url::parse(path)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", path, e)))?;
        if absolute.scheme() != "https" || absolute.host_str().is_none_or(str::is_empty) {
            return Err(ClientError::InvalidEndpoint(format!(
                "{}: absolute endpoints must be https URLs",
                path
            )));
        }
        return Ok(absolute);
    }

    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", joined, e)))
}
