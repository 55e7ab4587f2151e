//! Parsed filters and sort directives.

use crate::method::Method;
use crate::value::SqlValue;

/// The coerced value of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// One value, for every method except `IN`.
    Single(SqlValue),
    /// The list of an `IN` filter.
    List(Vec<SqlValue>),
}

impl FilterValue {
    /// Iterates over the contained values.
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        match self {
            Self::Single(value) => std::slice::from_ref(value).iter(),
            Self::List(values) => values.iter(),
        }
    }
}

/// One condition of the WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Query key the filter came from, e.g. `price:GT:1`.
    pub key: String,
    /// Field name.
    pub name: String,
    /// Comparison method.
    pub method: Method,
    /// Coerced value. `LIKE` values keep their `*` wildcards here.
    pub value: FilterValue,
}

impl Filter {
    /// Renders the condition, or `None` when the method has no
    /// placeholder form.
    pub(crate) fn to_sql(&self) -> Option<String> {
        match (self.method, &self.value) {
            (Method::In, FilterValue::List(values)) => {
                let placeholders = vec![SqlValue::placeholder(); values.len()].join(", ");
                Some(format!("{} IN ({placeholders})", self.name))
            }
            (
                Method::Eq
                | Method::Ne
                | Method::Gt
                | Method::Lt
                | Method::Gte
                | Method::Lte
                | Method::Like,
                FilterValue::Single(_),
            ) => Some(format!(
                "{} {} {}",
                self.name,
                self.method.sql_operator(),
                SqlValue::placeholder()
            )),
            _ => None,
        }
    }

    /// Values to bind, aligned with the placeholders of [`Filter::to_sql`].
    pub(crate) fn bind_values(&self) -> Vec<SqlValue> {
        if self.to_sql().is_none() {
            return Vec::new();
        }
        match (self.method, &self.value) {
            (Method::Like, FilterValue::Single(SqlValue::Text(pattern))) => {
                vec![SqlValue::Text(pattern.replace('*', "%"))]
            }
            (_, value) => value.values().cloned().collect(),
        }
    }
}

/// A sort directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Field to order by.
    pub by: String,
    /// Descending order.
    pub desc: bool,
}

impl Sort {
    /// Parses a token such as `-created_at` or `+name`.
    ///
    /// Returns `None` when nothing remains after the sign.
    pub fn parse(token: &str) -> Option<Self> {
        let (by, desc) = match token.as_bytes().first() {
            Some(b'-') => (&token[1..], true),
            Some(b'+') => (&token[1..], false),
            _ => (token, false),
        };
        if by.is_empty() {
            return None;
        }
        Some(Self {
            by: by.to_string(),
            desc,
        })
    }

    pub(crate) fn to_sql(&self) -> String {
        if self.desc {
            format!("{} DESC", self.by)
        } else {
            self.by.clone()
        }
    }
}
