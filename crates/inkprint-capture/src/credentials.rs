//! API keys and the ordered pool they are consumed from

use std::fmt;

/// A screenshot API key
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building requests
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***{} chars)", self.0.len())
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Ordered keys consumed left to right
///
/// The cursor only moves forward. Once it passes the last key the pool is
/// exhausted for the rest of the run.
///
/// # Examples
///
/// ```
/// use inkprint_capture::CredentialPool;
///
/// let mut pool = CredentialPool::from_comma_separated("k1, k2");
/// assert_eq!(pool.current().map(|k| k.as_str()), Some("k1"));
/// assert_eq!(pool.next().map(|k| k.as_str().to_string()), Some("k2".to_string()));
/// assert!(pool.next().is_none());
/// assert!(pool.is_exhausted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    keys: Vec<ApiKey>,
    cursor: usize,
}

impl CredentialPool {
    /// Build a pool, dropping blank keys
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ApiKey>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .map(|k| ApiKey::new(k.as_str().trim()))
            .filter(|k| !k.as_str().is_empty())
            .collect();
        Self { keys, cursor: 0 }
    }

    /// Build a pool from `"key1,key2,..."`
    pub fn from_comma_separated(keys: &str) -> Self {
        Self::new(keys.split(','))
    }

    /// Key to use now, `None` once exhausted
    pub fn current(&self) -> Option<&ApiKey> {
        self.keys.get(self.cursor)
    }

    /// Give up on the current key and move to the next one
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&ApiKey> {
        if self.cursor < self.keys.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Index of the current key
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Keys not yet given up on, including the current one
    pub fn remaining(&self) -> usize {
        self.keys.len() - self.cursor
    }

    /// True when every key has been given up on (or there were none)
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.keys.len()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the pool holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Start again from the first key
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
