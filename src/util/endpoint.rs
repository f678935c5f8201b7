use thiserror::Error;
use url::Url;

/// Errors from validating the catalog endpoint.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The URL string could not be parsed.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host to connect to.
    #[error("Endpoint URL has no host")]
    MissingHost,
}

/// Validates the catalog endpoint before any request is made.
///
/// Only `http` and `https` URLs with a host are accepted. Loopback and
/// private hosts are allowed: the endpoint is chosen by the user, not by
/// remote content.
///
/// # Examples
///
/// ```
/// use vitrine::util::validate_endpoint;
///
/// let url = validate_endpoint("https://shop.example.com/api/items").unwrap();
/// assert_eq!(url.host_str(), Some("shop.example.com"));
///
/// assert!(validate_endpoint("file:///etc/passwd").is_err());
/// ```
pub fn validate_endpoint(raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(EndpointError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(EndpointError::MissingHost);
    }

    Ok(url)
}
