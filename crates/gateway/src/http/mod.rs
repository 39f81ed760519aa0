//! reqwest-backed gateway for the quiz server's JSON API.

mod catalog_api;
mod mapping;
mod session_api;
mod settings_api;
mod task_api;

use reqwest::Client;
use url::Url;

use crate::api::GatewayError;

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// HTTP adapter over the quiz server. Cheap to clone; the inner client is shared.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns `GatewayError::Endpoint` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, cookie store, proxies).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Endpoint` if `base_url` is not an absolute http(s) URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, GatewayError> {
        let mut base_url =
            Url::parse(base_url.trim()).map_err(|e| GatewayError::Endpoint(e.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(GatewayError::Endpoint(format!(
                "{base_url} is not an http(s) base URL"
            )));
        }
        // `Url::join` replaces the last segment unless the path ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Endpoint(e.to_string()))
    }

    /// `path` followed by one percent-encoded segment taken verbatim from `segment`.
    fn endpoint_with_segment(&self, path: &str, segment: &str) -> Result<Url, GatewayError> {
        let mut url = self.endpoint(path)?;
        let not_a_base = format!("{url} cannot take path segments");
        url.path_segments_mut()
            .map_err(|()| GatewayError::Endpoint(not_a_base))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}
