//! Normalized view over the incoming query parameters.

use std::{collections::HashMap, fmt};

/// Parameter selecting the action.
pub const ACTION: &str = "action";
/// Parameter selecting the method combined with the action.
pub const METHOD: &str = "method";
/// Parameter naming the JSONP wrapper function.
pub const CALLBACK: &str = "callback";

/// Key/value parameters of a single request.
///
/// Built once from the raw query pairs and never mutated afterwards. When a
/// key repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    /// Builds the parameter set from raw key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self { values }
    }

    /// Number of distinct parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the request carried no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `key` was supplied, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not the empty string.
    ///
    /// No trimming is applied: a value of spaces counts as present.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Raw `action` value.
    pub fn action(&self) -> Option<&str> {
        self.get(ACTION)
    }

    /// Raw `method` value.
    pub fn method(&self) -> Option<&str> {
        self.get(METHOD)
    }

    /// JSONP callback name, when a non-empty one was supplied.
    pub fn callback(&self) -> Option<&str> {
        self.non_empty(CALLBACK)
    }
}

/// Allowed values of the `action` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Create or replace.
    Put,
    /// Remove.
    Delete,
}

impl Action {
    /// Every allowed action.
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Parses an action name. Matching is exact; `PUT` is not `put`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == raw)
    }

    /// Lower-case action name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
