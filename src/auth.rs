//! OAuth 1.0a request signing (HMAC-SHA1, user context).

use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::{Result, TwitterError};

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 percent-encoding as required by OAuth 1.0a.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Compute the `oauth_signature` for a request.
///
/// `url` must not carry a query string; query parameters belong in `params`.
/// JSON request bodies are not part of the signature.
pub fn signature(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
    oauth_params: &[(String, String)],
) -> Result<String> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
        .map_err(|e| TwitterError::ConfigError(format!("cannot build signing key: {e}")))?;
    mac.update(base_string.as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value with a fresh nonce and timestamp.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String> {
    let timestamp = Utc::now().timestamp().to_string();
    authorization_header_with(credentials, method, url, params, &generate_nonce(), &timestamp)
}

/// Build the `Authorization` header value for a fixed nonce and timestamp.
pub fn authorization_header_with(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
    nonce: &str,
    timestamp: &str,
) -> Result<String> {
    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), credentials.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
        ("oauth_timestamp".into(), timestamp.to_string()),
        ("oauth_token".into(), credentials.access_token.clone()),
        ("oauth_version".into(), OAUTH_VERSION.into()),
    ];

    let sig = signature(credentials, method, url, params, &oauth_params)?;
    oauth_params.push(("oauth_signature".into(), sig));
    oauth_params.sort();

    let parts: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v)))
        .collect();

    Ok(format!("OAuth {}", parts.join(", ")))
}
