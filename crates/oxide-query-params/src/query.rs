//! The raw query parameter mapping.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::percent_decode_str;

/// Query parameters: each key maps to the values it was given, in order.
///
/// Keys iterate in lexicographic order, which keeps rendered clauses
/// stable for the same set of parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, Vec<String>>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to a key.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Appends a value to a key in place.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Parses a URL query string such as `name=bob&id:IN=1,2&LIMIT=10`.
    ///
    /// A leading `?` is ignored, `+` decodes to a space, and percent
    /// escapes are decoded. Repeated keys collect all their values.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .fold(Self::new(), |query, (key, value)| query.param(key, value))
    }

    /// Gets the values of a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Returns whether the query has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterates over keys and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

impl<K, V> FromIterator<(K, Vec<V>)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut query = Self::new();
        for (key, values) in iter {
            let entry = query.params.entry(key.into()).or_default();
            entry.extend(values.into_iter().map(Into::into));
        }
        query
    }
}

impl From<HashMap<String, Vec<String>>> for Query {
    fn from(params: HashMap<String, Vec<String>>) -> Self {
        params.into_iter().collect()
    }
}

impl From<BTreeMap<String, Vec<String>>> for Query {
    fn from(params: BTreeMap<String, Vec<String>>) -> Self {
        Self { params }
    }
}
