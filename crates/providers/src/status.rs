//! HTTP plumbing shared by every adapter: client construction, status
//! classification, and transport error mapping.

use reqwest::header::RETRY_AFTER;
use std::time::Duration;
use stoa_core::error::SelectError;
use tracing::warn;

/// Used when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Build an HTTP client with a request timeout.
///
/// Falls back to a default client (no request timeout) if the builder fails;
/// the caller's tier timeout still bounds every call.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(
                error = %e,
                "HTTP client builder failed, using default client without request timeout"
            );
            reqwest::Client::default()
        })
}

/// Map a non-success status to a [`SelectError`].
///
/// `None` for 2xx.
pub fn from_status(
    service: &str,
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Option<SelectError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(SelectError::Auth(format!("{service} rejected credentials ({status})"))),
        429 => Some(SelectError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }),
        404 => Some(SelectError::Unavailable(format!("{service} endpoint not found"))),
        _ => Some(SelectError::Transport(format!(
            "{service} returned {status}: {}",
            body.chars().take(200).collect::<String>()
        ))),
    }
}

/// Pass a successful response through, or turn it into the matching error.
pub async fn check(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, SelectError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    warn!(service, status, body = %body, "Remote selector returned error status");

    match from_status(service, status, retry_after, &body) {
        Some(err) => Err(err),
        None => Err(SelectError::Transport(format!("{service} returned {status}"))),
    }
}

/// Map a reqwest failure; undecodable bodies are malformed, the rest transport.
pub fn from_reqwest(service: &str, err: reqwest::Error) -> SelectError {
    if err.is_decode() {
        SelectError::MalformedResponse(format!("{service} response did not decode: {err}"))
    } else if err.is_timeout() {
        SelectError::Transport(format!("{service} request timed out"))
    } else {
        SelectError::Transport(format!("{service}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_not_an_error() {
        assert!(from_status("x", 200, None, "").is_none());
        assert!(from_status("x", 204, None, "").is_none());
    }

    #[test]
    fn auth_statuses() {
        assert!(matches!(from_status("x", 401, None, ""), Some(SelectError::Auth(_))));
        assert!(matches!(from_status("x", 403, None, ""), Some(SelectError::Auth(_))));
    }

    #[test]
    fn rate_limit_honours_retry_after() {
        assert_eq!(
            from_status("x", 429, Some(30), ""),
            Some(SelectError::RateLimited { retry_after_secs: 30 })
        );
        assert_eq!(
            from_status("x", 429, None, ""),
            Some(SelectError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            })
        );
    }

    #[test]
    fn not_found_is_unavailable() {
        assert!(matches!(
            from_status("x", 404, None, ""),
            Some(SelectError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn client_enforces_request_timeout() {
        use axum::{Router, routing::get};

        let app = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base = crate::test_support::spawn(app).await;

        let client = http_client(Duration::from_millis(100));
        let err = client.get(format!("{base}/slow")).send().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(from_reqwest("svc", err), SelectError::Transport(_)));
    }

    #[test]
    fn other_failures_are_transport() {
        for status in [400, 500, 502, 503] {
            match from_status("svc", status, None, "boom") {
                Some(SelectError::Transport(msg)) => {
                    assert!(msg.contains(&status.to_string()));
                    assert!(msg.contains("boom"));
                }
                other => panic!("Expected Transport for {status}, got: {other:?}"),
            }
        }
    }
}
