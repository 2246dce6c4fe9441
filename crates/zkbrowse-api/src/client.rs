// Gateway HTTP client
//
// Wraps `reqwest::Client` with gateway URL construction and envelope
// unwrapping. Endpoint groups (clusters, nodes) are implemented as inherent
// methods in separate files to keep this module focused on transport.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the namespace gateway.
///
/// Handles the `{ success, message, data }` envelope and maps failure
/// messages to typed conditions. All methods return unwrapped `data`
/// payloads -- the envelope is stripped before the caller sees it.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new gateway client from a `TransportConfig`.
    ///
    /// The `base_url` is the gateway root (e.g. `http://localhost:8080`);
    /// every endpoint lives under `{base_url}/api/zk/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a gateway client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a gateway path: `{base}/api/zk/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/zk/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Ok(Url::parse(&full)?)
    }

    /// Build a cluster-registry URL: `{base}/api/clusters{suffix}`.
    pub(crate) fn registry_url(&self, suffix: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/clusters{}",
            self.base_url.as_str().trim_end_matches('/'),
            suffix
        );
        Ok(Url::parse(&full)?)
    }

    /// Build a gateway URL with query parameters appended.
    pub(crate) fn api_url_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, Error> {
        let mut url = self.api_url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the raw response.
    pub(crate) async fn get_raw(&self, url: Url) -> Result<reqwest::Response, Error> {
        debug!("GET {}", url);
        Ok(self.http.get(url).send().await?)
    }

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        let resp = self.get_raw(url).await?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;
        self.parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("PUT {}", url);
        let resp = self.http.put(url).json(body).send().await?;
        self.parse_envelope(resp).await
    }

    /// Send a DELETE request with JSON body and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("DELETE {}", url);
        let resp = self.http.delete(url).json(body).send().await?;
        self.parse_envelope(resp).await
    }

    /// Start a cluster-registry request.
    pub(crate) fn registry_request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// Send a registry request and decode its bare JSON body.
    ///
    /// The registry does not use the envelope. An empty or `null` body
    /// yields `None`.
    pub(crate) async fn send_bare<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<T>>(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Parse the `{ success, message, data }` envelope, returning `data` on
    /// success or a classified gateway error otherwise.
    ///
    /// The gateway's exception handler answers ZooKeeper failures with a
    /// 4xx/5xx status *and* an envelope, so the body is tried as an
    /// envelope before falling back to [`Error::Http`].
    pub(crate) async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        let envelope = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::Http {
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: e.to_string(),
                    body,
                });
            }
        };

        if !envelope.success {
            return Err(Error::from_gateway_message(envelope.message));
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        match envelope.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body,
                }),
        }
    }
}

/// Require a `data` payload, reporting its absence as a decode failure.
pub(crate) fn require_data<T>(data: Option<T>, what: &str) -> Result<T, Error> {
    data.ok_or_else(|| Error::Deserialization {
        message: format!("response for {what} carried no data"),
        body: String::new(),
    })
}
