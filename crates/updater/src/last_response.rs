use std::sync::{Arc, Mutex, PoisonError};

use crate::feed::DataFeedResponse;

/// Holds the most recent data feed response for diagnostics.
///
/// Reads and writes take the same lock. Only one response is kept; setting a
/// new one discards the previous.
#[derive(Debug, Default)]
pub struct LastResponseCache {
    response: Mutex<Option<Arc<DataFeedResponse>>>,
}

impl LastResponseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, response: DataFeedResponse) {
        let mut guard = self.response.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(response));
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<DataFeedResponse>> {
        self.response.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
