//! Classification of query keys and the filter key grammar.
//!
//! A filter key has the shape `NAME[:METHOD[:INDEX]]`. The optional index
//! only serves to make keys unique, so that `price:GT:1` and `price:GT:2`
//! can both be present in one query.

use crate::error::{QueryError, Result};
use crate::method::Method;

/// A parsed filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    /// Field name.
    pub name: String,
    /// Comparison method, `EQ` when omitted.
    pub method: Method,
    /// Disambiguating index, if any.
    pub index: Option<String>,
}

impl FilterKey {
    /// Parses a filter key.
    pub fn parse(key: &str) -> Result<Self> {
        let mut parts = key.split(':');
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(bad_key(key));
        }

        let method = match parts.next() {
            None => Method::Eq,
            Some(token) => Method::from_token(token).ok_or_else(|| bad_key(key))?,
        };

        let index = match parts.next() {
            None => None,
            Some("") => return Err(bad_key(key)),
            Some(index) => Some(index.to_string()),
        };

        if parts.next().is_some() {
            return Err(bad_key(key));
        }

        Ok(Self {
            name: name.to_string(),
            method,
            index,
        })
    }
}

fn bad_key(key: &str) -> QueryError {
    QueryError::BadFormat(format!("malformed filter key {key:?}"))
}

/// What a query key refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    /// `FIELDS`: projection list.
    Fields,
    /// `OFFSET`: number of rows to skip.
    Offset,
    /// `LIMIT`: maximum number of rows.
    Limit,
    /// `SORT`: ordering directives.
    Sort,
    /// Anything else is a filter.
    Filter(FilterKey),
}

impl ParamKey {
    /// Classifies a query key. Reserved names match case-insensitively.
    pub fn classify(key: &str) -> Result<Self> {
        let reserved = [Self::Fields, Self::Offset, Self::Limit, Self::Sort];
        for kind in reserved {
            if kind
                .reserved_name()
                .is_some_and(|name| key.eq_ignore_ascii_case(name))
            {
                return Ok(kind);
            }
        }
        FilterKey::parse(key).map(Self::Filter)
    }

    /// The canonical upper-case name of a reserved key.
    #[must_use]
    pub const fn reserved_name(&self) -> Option<&'static str> {
        match self {
            Self::Fields => Some("FIELDS"),
            Self::Offset => Some("OFFSET"),
            Self::Limit => Some("LIMIT"),
            Self::Sort => Some("SORT"),
            Self::Filter(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_defaults_to_eq() {
        let key = FilterKey::parse("name").unwrap();
        assert_eq!(key.name, "name");
        assert_eq!(key.method, Method::Eq);
        assert_eq!(key.index, None);
    }

    #[test]
    fn test_name_and_method() {
        let key = FilterKey::parse("age:GTE").unwrap();
        assert_eq!(key.name, "age");
        assert_eq!(key.method, Method::Gte);
    }

    #[test]
    fn test_indexed_key() {
        let key = FilterKey::parse("price:GT:1").unwrap();
        assert_eq!(key.method, Method::Gt);
        assert_eq!(key.index.as_deref(), Some("1"));
    }

    #[test]
    fn test_malformed_keys() {
        for key in ["", ":EQ", "a:", "a:eq", "a:BETWEEN", "a:EQ:", "a:EQ:1:2"] {
            assert!(
                matches!(FilterKey::parse(key), Err(QueryError::BadFormat(_))),
                "expected BadFormat for {key:?}"
            );
        }
    }

    #[test]
    fn test_reserved_keys_case_insensitive() {
        assert_eq!(ParamKey::classify("fields").unwrap(), ParamKey::Fields);
        assert_eq!(ParamKey::classify("Limit").unwrap(), ParamKey::Limit);
        assert_eq!(ParamKey::classify("OFFSET").unwrap(), ParamKey::Offset);
        assert_eq!(ParamKey::classify("sOrT").unwrap(), ParamKey::Sort);
        assert!(matches!(
            ParamKey::classify("limits").unwrap(),
            ParamKey::Filter(_)
        ));
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(ParamKey::classify("limit").unwrap().reserved_name(), Some("LIMIT"));
        assert_eq!(ParamKey::classify("id:IN").unwrap().reserved_name(), None);
    }
}
