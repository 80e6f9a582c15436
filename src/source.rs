//! Where environment values come from.
//!
//! Parsing never touches `std::env` directly; it asks an [`EnvSource`]. The
//! process environment is [`StdEnv`], tests use [`MockEnv`], and any
//! `Fn(&str) -> Option<String>` works as a one-off lookup.

use std::collections::HashMap;
use std::fmt;

/// A variable is set but its value is not valid unicode. Holds the lossy rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotUnicode(pub String);

impl fmt::Display for NotUnicode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value '{}' is not valid unicode", self.0)
    }
}

impl std::error::Error for NotUnicode {}

/// Read-only lookup of environment values by exact key
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Like `get`, but tells a set-but-undecodable value apart from an unset one
    fn lookup(&self, key: &str) -> Result<Option<String>, NotUnicode> {
        Ok(self.get(key))
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).ok().flatten()
    }

    fn lookup(&self, key: &str) -> Result<Option<String>, NotUnicode> {
        match std::env::var_os(key) {
            None => Ok(None),
            Some(raw) => raw
                .into_string()
                .map(Some)
                .map_err(|raw| NotUnicode(raw.to_string_lossy().into_owned())),
        }
    }
}

/// Environment backed by a map, for tests and for values collected elsewhere
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

impl EnvSource for MockEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}
