//! Data feed client

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::HttpRequest;

/// Applies to every feed request regardless of transport configuration.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(5);

/// A raw response from the iTRAK data feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataFeedResponse {
    #[serde(serialize_with = "lossy_text")]
    pub body: Bytes,
    pub status_code: u16,
    #[serde(serialize_with = "header_lists")]
    pub headers: HeaderMap,
}

impl DataFeedResponse {
    /// The body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Fetch the data feed at `url`.
///
/// # Errors
///
/// Returns `Error::Transport` if the feed cannot be reached within
/// [`FEED_TIMEOUT`], or `Error::BadStatus` for any status other than 200.
pub async fn fetch(url: &str, provider: &impl HttpRequest) -> Result<DataFeedResponse> {
    let request = http::Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(Bytes::new())
        .map_err(|e| Error::Transport(format!("building data feed request: {e}")))?;

    let response = tokio::time::timeout(FEED_TIMEOUT, HttpRequest::fetch(provider, request))
        .await
        .map_err(|elapsed| Error::Transport(format!("could not get data feed: {elapsed}")))?
        .map_err(|e| Error::Transport(format!("could not get data feed: {e:#}")))?;

    let (parts, body) = response.into_parts();
    if parts.status != StatusCode::OK {
        return Err(Error::BadStatus(parts.status.as_u16()));
    }
    debug!(bytes = body.len(), "fetched data feed");

    Ok(DataFeedResponse { body, status_code: parts.status.as_u16(), headers: parts.headers })
}

fn lossy_text<S: Serializer>(body: &Bytes, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

fn header_lists<S: Serializer>(
    headers: &HeaderMap, serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(headers.keys_len()))?;
    for name in headers.keys() {
        let values: Vec<Cow<'_, str>> =
            headers.get_all(name).iter().map(|v| String::from_utf8_lossy(v.as_bytes())).collect();
        map.serialize_entry(name.as_str(), &values)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use http::header::{CONTENT_TYPE, SET_COOKIE};
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_response() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let response = DataFeedResponse {
            body: Bytes::from_static(b"Vehicle ID:1 eof"),
            status_code: 200,
            headers,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "body": "Vehicle ID:1 eof",
                "status_code": 200,
                "headers": {
                    "content-type": ["text/plain"],
                    "set-cookie": ["a=1", "b=2"],
                },
            })
        );
    }

    #[test]
    fn lossy_body_text() {
        let response =
            DataFeedResponse { body: Bytes::from_static(b"ok\xff"), ..DataFeedResponse::default() };
        assert_eq!(response.text(), "ok\u{fffd}");
    }
}
