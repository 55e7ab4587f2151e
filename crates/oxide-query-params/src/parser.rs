//! The query parser.
//!
//! One call to [`QueryParser::parse`] walks every key of the query, routes
//! reserved keys (`FIELDS`, `OFFSET`, `LIMIT`, `SORT`) to their handlers and
//! everything else through the filter pipeline: key grammar, allow-list
//! lookup, value coercion and validation.

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{QueryError, Result};
use crate::filter::{Filter, FilterValue, Sort};
use crate::key::{FilterKey, ParamKey};
use crate::method::Method;
use crate::query::Query;
use crate::validation::{ValidationRule, Validations};
use crate::value::{SqlValue, ValueType};

/// Parses query parameters into SQL clause fragments.
///
/// # Example
///
/// ```rust
/// use oxide_query_params::{Query, QueryParser, Validations, ValueType};
///
/// let query = Query::from_query_string("id:IN=1,2,3&SORT=-name&LIMIT=10");
/// let validations = Validations::new()
///     .typed("id", ValueType::Int)
///     .field("name");
///
/// let (parser, result) = QueryParser::new_parse(query, validations);
/// result.unwrap();
///
/// assert_eq!(parser.where_clause(), "id IN (?, ?, ?)");
/// assert_eq!(parser.sort(), "ORDER BY name DESC");
/// assert_eq!(parser.limit(), "LIMIT 10");
/// assert_eq!(parser.args().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    pub(crate) query: Query,
    pub(crate) validations: Validations,
    pub(crate) config: ParserConfig,

    pub(crate) fields: Vec<String>,
    pub(crate) offset: u64,
    pub(crate) limit: u64,
    pub(crate) sorts: Vec<Sort>,
    pub(crate) filters: Vec<Filter>,

    error_message: Option<String>,
}

impl QueryParser {
    /// Creates a parser with the default configuration.
    pub fn new(query: impl Into<Query>, validations: Validations) -> Self {
        Self::with_config(query, validations, ParserConfig::default())
    }

    /// Creates a parser with an explicit configuration.
    pub fn with_config(
        query: impl Into<Query>,
        validations: Validations,
        config: ParserConfig,
    ) -> Self {
        Self {
            query: query.into(),
            validations,
            config,
            ..Self::default()
        }
    }

    /// Creates a parser and runs [`QueryParser::parse`] right away.
    pub fn new_parse(query: impl Into<Query>, validations: Validations) -> (Self, Result<()>) {
        let mut parser = Self::new(query, validations);
        let result = parser.parse();
        (parser, result)
    }

    /// Sets the delimiter for multi-valued parameters.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    /// Sets whether filters on fields missing from the validation table
    /// are skipped (`true`) or rejected (`false`).
    #[must_use]
    pub fn ignore_unknown_filters(mut self, ignore: bool) -> Self {
        self.config.ignore_unknown_filters = ignore;
        self
    }

    /// Replaces the query.
    #[must_use]
    pub fn set_query(mut self, query: impl Into<Query>) -> Self {
        self.query = query.into();
        self
    }

    /// Replaces the validation table.
    #[must_use]
    pub fn set_validations(mut self, validations: Validations) -> Self {
        self.validations = validations;
        self
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the query.
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Message of the error returned by the last failed parse.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Parses the query.
    ///
    /// Stops at the first error. State collected before the error is kept
    /// but should not be used.
    pub fn parse(&mut self) -> Result<()> {
        self.reset();

        let query = std::mem::take(&mut self.query);
        let result = query
            .iter()
            .try_for_each(|(key, values)| self.parse_key(key, values));
        self.query = query;

        if let Err(err) = &result {
            debug!(error = %err, "query rejected");
            self.error_message = Some(err.to_string());
        }
        result
    }

    fn reset(&mut self) {
        self.fields.clear();
        self.offset = 0;
        self.limit = 0;
        self.sorts.clear();
        self.filters.clear();
        self.error_message = None;
    }

    fn parse_key(&mut self, key: &str, values: &[String]) -> Result<()> {
        let kind = ParamKey::classify(key)?;
        let rule = self.reserved_rule(key, &kind).cloned();
        let rule = rule.as_ref();

        match kind {
            ParamKey::Fields => self.parse_fields(key, values, rule),
            ParamKey::Offset => {
                if let Some(offset) = parse_count(key, values, rule)? {
                    self.offset = offset;
                }
                Ok(())
            }
            ParamKey::Limit => {
                if let Some(limit) = parse_count(key, values, rule)? {
                    self.limit = limit;
                }
                Ok(())
            }
            ParamKey::Sort => self.parse_sort(key, values, rule),
            ParamKey::Filter(filter_key) => self.parse_filter(key, filter_key, values),
        }
    }

    /// Validator for a reserved key: the key as written wins over its
    /// canonical upper-case name. Filters have none.
    fn reserved_rule(&self, key: &str, kind: &ParamKey) -> Option<&ValidationRule> {
        let name = kind.reserved_name()?;
        self.validations
            .get(key)
            .or_else(|| self.validations.get(name))
    }

    fn parse_fields(
        &mut self,
        key: &str,
        values: &[String],
        rule: Option<&ValidationRule>,
    ) -> Result<()> {
        let value = single_value(key, values)?;
        let fields: Vec<String> = self
            .config
            .split_trimmed(value)
            .into_iter()
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(rule) = rule {
            for field in &fields {
                validate(rule, key, &SqlValue::Text(field.clone()))?;
            }
        }

        debug!(key, count = fields.len(), "parsed fields");
        self.fields = fields;
        Ok(())
    }

    fn parse_sort(
        &mut self,
        key: &str,
        values: &[String],
        rule: Option<&ValidationRule>,
    ) -> Result<()> {
        let value = single_value(key, values)?;
        let tokens: Vec<&str> = self
            .config
            .split_trimmed(value)
            .into_iter()
            .filter(|token| !token.is_empty())
            .collect();

        for token in tokens {
            let sort = Sort::parse(token).ok_or_else(|| {
                QueryError::BadFormat(format!("{key}: empty sort field in {token:?}"))
            })?;
            if let Some(rule) = rule {
                validate(rule, key, &SqlValue::Text(sort.by.clone()))?;
            }
            debug!(key, by = %sort.by, desc = sort.desc, "parsed sort");
            self.sorts.push(sort);
        }
        Ok(())
    }

    fn parse_filter(&mut self, key: &str, filter_key: FilterKey, values: &[String]) -> Result<()> {
        let FilterKey { name, method, .. } = filter_key;

        let Some(rule) = self.validations.get(&name) else {
            if self.config.ignore_unknown_filters {
                debug!(key, field = %name, "skipping filter on unknown field");
                return Ok(());
            }
            return Err(QueryError::FilterNotAllowed(name));
        };

        check_method(key, method, rule.value_type)?;

        let tokens = split_values(&self.config, key, values)?;
        if !method.is_multi() && tokens.len() != 1 {
            return Err(QueryError::BadFormat(format!(
                "{key}: method {method} takes exactly one value, got {}",
                tokens.len()
            )));
        }

        let mut coerced = Vec::with_capacity(tokens.len());
        for token in tokens {
            let value = rule.value_type.coerce(key, token)?;
            validate(rule, key, &value)?;
            coerced.push(value);
        }

        let value = if method.is_multi() {
            FilterValue::List(coerced)
        } else {
            coerced
                .pop()
                .map(FilterValue::Single)
                .ok_or_else(|| QueryError::BadFormat(format!("{key}: missing value")))?
        };

        debug!(key, field = %name, %method, "parsed filter");
        self.filters.push(Filter {
            key: key.to_string(),
            name,
            method,
            value,
        });
        Ok(())
    }
}

/// Parses an OFFSET or LIMIT value. Empty means absent.
///
/// The count must fit a non-negative `i64`; it is validated before it is
/// returned.
fn parse_count(
    key: &str,
    values: &[String],
    rule: Option<&ValidationRule>,
) -> Result<Option<u64>> {
    let value = single_value(key, values)?;
    if value.is_empty() {
        return Ok(None);
    }

    // The unsigned parse rejects signs other than `+`; the signed one
    // rejects anything above `i64::MAX`.
    let count = value
        .parse::<u64>()
        .and_then(|_| value.parse::<i64>())
        .map_err(|source| QueryError::InvalidInt {
            key: key.to_string(),
            source,
        })?;

    if let Some(rule) = rule {
        validate(rule, key, &SqlValue::Int(count))?;
    }

    debug!(key, count, "parsed paging");
    Ok(Some(count.unsigned_abs()))
}

fn single_value<'a>(key: &str, values: &'a [String]) -> Result<&'a str> {
    match values {
        [value] => Ok(value.as_str()),
        _ => Err(QueryError::BadFormat(format!(
            "{key} expects exactly one value, got {}",
            values.len()
        ))),
    }
}

/// Splits a single delimited value, or takes repeated values as they are.
/// Filter tokens are never trimmed.
fn split_values<'a>(
    config: &ParserConfig,
    key: &str,
    values: &'a [String],
) -> Result<Vec<&'a str>> {
    match values {
        [] => Err(QueryError::BadFormat(format!("{key}: missing value"))),
        [value] => Ok(config.split(value)),
        _ => Ok(values.iter().map(String::as_str).collect()),
    }
}

fn check_method(key: &str, method: Method, value_type: ValueType) -> Result<()> {
    let allowed = match value_type {
        ValueType::String => true,
        ValueType::Int | ValueType::Float => method != Method::Like,
        ValueType::Bool => method != Method::Like && !method.is_ordering(),
    };
    if allowed {
        Ok(())
    } else {
        Err(QueryError::MethodNotAllowed {
            key: key.to_string(),
            method,
        })
    }
}

fn validate(rule: &ValidationRule, key: &str, value: &SqlValue) -> Result<()> {
    rule.check(value).map_err(|message| QueryError::Validation {
        key: key.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_key_is_eq_filter() {
        let query = Query::new().param("name", "bob");
        let (parser, result) = QueryParser::new_parse(query, Validations::new().field("name"));
        result.unwrap();
        assert_eq!(parser.filters.len(), 1);
        assert_eq!(parser.filters[0].method, Method::Eq);
        assert_eq!(
            parser.filters[0].value,
            FilterValue::Single(SqlValue::Text("bob".into()))
        );
    }

    #[test]
    fn test_parse_resets_state() {
        let mut parser = QueryParser::new(Query::new().param("SORT", "a,b"), Validations::new());
        parser.parse().unwrap();
        parser.parse().unwrap();
        assert_eq!(parser.sorts.len(), 2);
    }

    #[test]
    fn test_error_message_is_recorded() {
        let validations =
            Validations::new().validated("id", ValueType::Int, crate::validation::min(10));
        let query = Query::new().param("id:GT", "3");
        let (parser, result) = QueryParser::new_parse(query, validations);
        assert!(matches!(result, Err(QueryError::Validation { .. })));
        assert_eq!(
            parser.error_message(),
            Some("id:GT: value must be at least 10")
        );
    }

    #[test]
    fn test_parse_count_range() {
        let count = |value: &str| parse_count("LIMIT", &[value.to_string()], None);
        assert_eq!(count("25").unwrap(), Some(25));
        assert_eq!(count("+25").unwrap(), Some(25));
        assert_eq!(count("").unwrap(), None);
        assert_eq!(
            count("9223372036854775807").unwrap(),
            Some(9_223_372_036_854_775_807)
        );
        for value in ["-1", "-0", "9223372036854775808", "18446744073709551615", " 5"] {
            assert!(
                matches!(count(value), Err(QueryError::InvalidInt { .. })),
                "expected InvalidInt for {value:?}"
            );
        }
    }

    #[test]
    fn test_reserved_rule_uses_canonical_name() {
        let parser = QueryParser::new(Query::new(), Validations::new().typed("LIMIT", ValueType::Int));
        assert!(parser.reserved_rule("limit", &ParamKey::Limit).is_some());
        assert!(parser.reserved_rule("offset", &ParamKey::Offset).is_none());
        let filter = ParamKey::classify("LIMIT:EQ").unwrap();
        assert!(parser.reserved_rule("LIMIT", &filter).is_none());
    }

    #[test]
    fn test_method_type_compatibility() {
        assert!(check_method("k", Method::Like, ValueType::String).is_ok());
        assert!(check_method("k", Method::Gt, ValueType::Float).is_ok());
        assert!(check_method("k", Method::Like, ValueType::Int).is_err());
        assert!(check_method("k", Method::Lt, ValueType::Bool).is_err());
        assert!(check_method("k", Method::Ne, ValueType::Bool).is_ok());
    }

    #[test]
    fn test_split_values() {
        let config = ParserConfig::default();
        let single = vec!["1, 2".to_string()];
        assert_eq!(split_values(&config, "k", &single).unwrap(), vec!["1", " 2"]);
        let repeated = vec!["1".to_string(), " 2 ".to_string()];
        assert_eq!(split_values(&config, "k", &repeated).unwrap(), vec!["1", " 2 "]);
        assert!(split_values(&config, "k", &[]).is_err());
    }
}
