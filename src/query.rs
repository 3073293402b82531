//! Canonical query string generation.
//!
//! The canonical string is both the signed payload and, for GET requests, the
//! literal query string. Keys are sorted, list values use the `key[]=item`
//! bracket convention, and values are strictly percent-encoded with spaces
//! rendered as `+`.

use std::time::{SystemTime, UNIX_EPOCH};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const API_KEY_PARAM: &str = "api_key";
pub const TIMESTAMP_PARAM: &str = "request_timestamp";

/// Everything but ASCII alphanumerics and `-_.~` is encoded.
const STRICT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Single(value.clone())
    }
}

macro_rules! display_param_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Single(value.to_string())
                }
            }
        )*
    };
}

display_param_value!(u32, u64, i32, i64, f64, bool);

impl<T: Into<String>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Request parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert only when a value is present; `None` leaves the key out entirely.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, STRICT).to_string()
}

/// Build the canonical query string for `params`, injecting `api_key` and
/// `request_timestamp` first.
pub fn canonicalize(mut params: Params, api_key: &str, timestamp: u64) -> String {
    params.insert(API_KEY_PARAM, api_key);
    params.insert(TIMESTAMP_PARAM, timestamp);

    let mut entries = params.entries;
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in &entries {
        let key = encode(key);
        match value {
            ParamValue::Single(v) => pairs.push(format!("{}={}", key, encode(v))),
            ParamValue::List(items) => {
                pairs.extend(items.iter().map(|v| format!("{}[]={}", key, encode(v))));
            }
        }
    }

    pairs.join("&").replace("%20", "+")
}

/// Current Unix time in seconds, rounded to the nearest second.
pub fn unix_timestamp() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    (millis + 500) / 1000
}
