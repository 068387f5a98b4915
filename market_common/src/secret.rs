use std::fmt;

/// A wrapper for configuration values that must never appear in logs or debug output. Both
/// `Debug` and `Display` render as `****`; the value is only reachable through an explicit
/// [`reveal`](Secret::reveal) call, so every read of it is visible at the call site.
#[derive(Clone, Default)]
pub struct Secret<T> {
    value: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and hand the value back.
    pub fn reveal_owned(self) -> T {
        self.value
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
