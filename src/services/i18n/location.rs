//! URL surface carrying the active language as a query parameter

use reqwest::Url;

/// Current page location
pub trait Location: Send {
    /// Current URL of the page
    fn url(&self) -> Url;

    /// Replaces the current URL without navigating or adding a
    /// history entry
    fn replace(&mut self, url: Url);
}

/// Reads the value of the query parameter `param` if present
pub fn query_value(url: &Url, param: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

/// Creates a copy of `url` with the query parameter `param` set to `value`,
/// other query parameters keep their order
pub fn with_query_value(url: &Url, param: &str, value: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair(param, value);
    url
}

/// In-memory location that tracks the length of its history
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    url: Url,
    history_len: usize,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            history_len: 1,
        }
    }

    /// Pushes a new history entry, used to simulate a navigation
    pub fn navigate(&mut self, url: Url) {
        self.url = url;
        self.history_len += 1;
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

impl Location for MemoryLocation {
    fn url(&self) -> Url {
        self.url.clone()
    }

    fn replace(&mut self, url: Url) {
        self.url = url;
    }
}
