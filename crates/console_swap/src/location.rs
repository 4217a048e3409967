use std::sync::Mutex;

use url::Url;

use crate::{FailureKind, FetchError};

/// The client's visible URL.
///
/// Only the query string ever changes here, and only strictly after the
/// corresponding content swap succeeded, so history never desynchronizes
/// from content on a failed or superseded request.
#[derive(Debug)]
pub struct Location {
    inner: Mutex<Url>,
}

impl Location {
    pub fn new(href: &str) -> Result<Self, FetchError> {
        let url = Url::parse(href)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self {
            inner: Mutex::new(url),
        })
    }

    pub fn href(&self) -> String {
        self.inner.lock().unwrap().to_string()
    }

    /// Current query string without the leading `?`.
    pub fn query(&self) -> String {
        self.inner
            .lock()
            .unwrap()
            .query()
            .unwrap_or_default()
            .to_string()
    }

    /// Replaces the query string; an empty string removes it.
    pub fn set_query(&self, query: &str) {
        let mut url = self.inner.lock().unwrap();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(query));
        }
    }
}
