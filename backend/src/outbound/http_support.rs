//! Transport helpers shared by the reqwest-backed adapters.
//!
//! Every driven port error offers the same four failure kinds, so status and
//! transport mapping is written once against [`AdapterError`].

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::ports::{MediaStoreError, PaymentGatewayError, SearchIndexError};

/// Failure kinds every HTTP adapter reports.
pub trait AdapterError: Sized {
    /// The backend could not be reached or failed server-side.
    fn transport(message: String) -> Self;
    /// The backend did not answer in time.
    fn timeout(message: String) -> Self;
    /// The backend refused the request.
    fn rejected(message: String) -> Self;
    /// The backend answered with an unreadable payload.
    fn decode(message: String) -> Self;
}

macro_rules! impl_adapter_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl AdapterError for $error {
                fn transport(message: String) -> Self {
                    <$error>::transport(message)
                }
                fn timeout(message: String) -> Self {
                    <$error>::timeout(message)
                }
                fn rejected(message: String) -> Self {
                    <$error>::rejected(message)
                }
                fn decode(message: String) -> Self {
                    <$error>::decode(message)
                }
            }
        )*
    };
}

impl_adapter_error!(SearchIndexError, MediaStoreError, PaymentGatewayError);

/// Build a client with a whole-request timeout.
///
/// # Errors
///
/// Returns an error when the reqwest client cannot be constructed.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Map a reqwest send/receive failure.
pub fn map_transport_error<E: AdapterError>(error: &reqwest::Error) -> E {
    if error.is_timeout() {
        E::timeout(error.to_string())
    } else {
        E::transport(error.to_string())
    }
}

/// Map a non-success status and its body.
pub fn map_status_error<E: AdapterError>(status: StatusCode, body: &[u8]) -> E {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => E::timeout(message),
        StatusCode::TOO_MANY_REQUESTS => E::transport(message),
        _ if status.is_client_error() => E::rejected(message),
        _ => E::transport(message),
    }
}

/// Whitespace-compacted, length-capped rendering of a response body.
pub fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Read the body of `response`, failing on a non-success status.
pub async fn success_body<E: AdapterError>(response: Response) -> Result<Vec<u8>, E> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| map_transport_error::<E>(&err))?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

/// Read and decode a JSON body, failing on a non-success status.
pub async fn read_json<T: DeserializeOwned, E: AdapterError>(response: Response) -> Result<T, E> {
    let body = success_body::<E>(response).await?;
    serde_json::from_slice(&body).map_err(|err| {
        E::decode(format!(
            "invalid JSON payload: {err}; body: {}",
            body_preview(&body)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "Transport")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, "Transport")]
    fn maps_http_statuses_to_port_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error: SearchIndexError = map_status_error(status, b"{\"error\":\"boom\"}");
        let actual = match error {
            SearchIndexError::Transport { .. } => "Transport",
            SearchIndexError::Timeout { .. } => "Timeout",
            SearchIndexError::Rejected { .. } => "Rejected",
            SearchIndexError::Decode { .. } => "Decode",
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn status_message_includes_code_and_preview() {
        let error: PaymentGatewayError =
            map_status_error(StatusCode::BAD_REQUEST, b"{\n  \"error\": \"no such price\"\n}");
        assert_eq!(error.message(), "status 400: { \"error\": \"no such price\" }");
    }

    #[test]
    fn empty_body_yields_bare_status() {
        let error: MediaStoreError = map_status_error(StatusCode::FORBIDDEN, b"");
        assert_eq!(error.message(), "status 403");
    }

    #[test]
    fn preview_is_truncated() {
        let long = "x".repeat(500);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }
}
