//! Blocking request execution.

use tracing::debug;

use crate::error::{TopSitesError, TopSitesResult};

/// Executes one signed request and returns the response body.
///
/// Implementations block until the response is complete.
pub trait Transport {
    /// Send `request` and return the body of a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`TopSitesError::Transport`] on network failure and
    /// [`TopSitesError::Status`] on a non-success status.
    fn execute(&self, request: http::Request<()>) -> TopSitesResult<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: http::Request<()>) -> TopSitesResult<String> {
        (**self).execute(request)
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`TopSitesError::Transport`] if the TLS backend cannot be initialised.
    pub fn new() -> TopSitesResult<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: http::Request<()>) -> TopSitesResult<String> {
        let (parts, _body) = request.into_parts();

        debug!(method = %parts.method, uri = %parts.uri, "Sending request");

        let response = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        if !status.is_success() {
            return Err(TopSitesError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
