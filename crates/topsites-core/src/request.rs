//! Assembly of a signed `GET /api` request for one window.

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use topsites_auth::canonical::URI_PATH;
use topsites_auth::{QueryParameters, Signer};
use tracing::warn;

use crate::config::TopSitesConfig;
use crate::error::TopSitesResult;

/// Media type sent in `Accept` and `Content-Type`.
const XML_MEDIA_TYPE: &str = "application/xml";

/// Build the signed request for `query`.
///
/// The `Authorization` header signs `config.signing_host`, while the request
/// itself targets `config.endpoint_host`.
///
/// # Errors
///
/// Returns [`crate::TopSitesError::Http`] if the URI or a header value is invalid.
pub fn build_request(
    config: &TopSitesConfig,
    signer: &Signer<'_>,
    query: &QueryParameters,
) -> TopSitesResult<http::Request<()>> {
    for (name, value) in query.unsafe_values() {
        warn!(
            parameter = name,
            value = %value,
            "query value is sent without percent-encoding"
        );
    }

    let authorization = signer.authorize(query, &config.signing_host);
    let uri = format!(
        "https://{}{URI_PATH}?{}",
        config.endpoint_host,
        query.to_query_string()
    );

    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .header(ACCEPT, XML_MEDIA_TYPE)
        .header(CONTENT_TYPE, XML_MEDIA_TYPE)
        .header("x-amz-date", signer.time().timestamp())
        .header(AUTHORIZATION, authorization.to_string())
        .body(())?;

    Ok(request)
}
