use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use realtime::{HttpError, not_found};
use updater::{DataFeedResponse, LastResponseCache};

pub fn router(cache: Arc<LastResponseCache>) -> Router {
    Router::new().route("/datafeed", get(datafeed)).with_state(cache)
}

/// The last response received from the data feed.
#[axum::debug_handler]
async fn datafeed(
    State(cache): State<Arc<LastResponseCache>>,
) -> Result<Json<DataFeedResponse>, HttpError> {
    let Some(response) = cache.get() else {
        return Err(not_found!("no data feed response yet").into());
    };
    Ok(Json(DataFeedResponse::clone(&response)))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn empty_cache_not_found() {
        let cache = Arc::new(LastResponseCache::new());
        let response = datafeed(State(cache)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_cached_response() {
        let cache = Arc::new(LastResponseCache::new());
        cache.set(DataFeedResponse {
            body: Bytes::from_static(b"Vehicle ID:1832 eof"),
            status_code: 200,
            ..DataFeedResponse::default()
        });

        let Ok(Json(served)) = datafeed(State(Arc::clone(&cache))).await else {
            panic!("should serve cached response");
        };
        let value = serde_json::to_value(&served).expect("should serialize");
        assert_eq!(value["body"], "Vehicle ID:1832 eof");
        assert_eq!(value["status_code"], 200);
    }
}
