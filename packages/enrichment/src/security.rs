//! Redacted holder for the two secrets the pipeline carries: the Tavily API
//! key and the Google service-account JSON.
//!
//! Both sit inside `Debug`-derived config structs, so the wrapper prints
//! `[REDACTED]` and the raw value is only reachable through `expose`.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Raw value. Used for the Tavily bearer header and for parsing the
    /// service-account key, nowhere else.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
