//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ",";

/// Options controlling how query parameters are parsed.
///
/// Deserializes from partial documents; missing options take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Separator splitting a single parameter value into several tokens.
    pub delimiter: String,
    /// Skip filters on fields missing from the validation table instead of
    /// failing.
    pub ignore_unknown_filters: bool,
}

impl ParserConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delimiter.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the unknown filter policy.
    #[must_use]
    pub fn ignore_unknown_filters(mut self, ignore: bool) -> Self {
        self.ignore_unknown_filters = ignore;
        self
    }

    /// Splits `value` on the delimiter. Tokens are returned as written.
    ///
    /// An empty delimiter never splits.
    pub(crate) fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            return vec![value];
        }
        value.split(self.delimiter.as_str()).collect()
    }

    /// Like [`ParserConfig::split`], trimming each token. Used for field
    /// lists (`FIELDS`, `SORT`), never for filter values.
    pub(crate) fn split_trimmed<'a>(&self, value: &'a str) -> Vec<&'a str> {
        self.split(value).into_iter().map(str::trim).collect()
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            ignore_unknown_filters: false,
        }
    }
}
