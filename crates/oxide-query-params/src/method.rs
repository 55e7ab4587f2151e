//! Comparison methods accepted in filter keys.

use std::fmt;

/// A comparison method, written after the field name in a filter key
/// (`age:GT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Pattern match (LIKE), `*` acts as the wildcard
    Like,
    /// Negation (NOT)
    Not,
    /// Membership in a list (IN)
    In,
}

impl Method {
    /// All methods, in the order they are documented.
    pub const ALL: [Self; 9] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Like,
        Self::Not,
        Self::In,
    ];

    /// Parses a method token. Matching is case-sensitive.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "EQ" => Some(Self::Eq),
            "NE" => Some(Self::Ne),
            "GT" => Some(Self::Gt),
            "LT" => Some(Self::Lt),
            "GTE" => Some(Self::Gte),
            "LTE" => Some(Self::Lte),
            "LIKE" => Some(Self::Like),
            "NOT" => Some(Self::Not),
            "IN" => Some(Self::In),
            _ => None,
        }
    }

    /// Returns the method token as written in query keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Gte => "GTE",
            Self::Lte => "LTE",
            Self::Like => "LIKE",
            Self::Not => "NOT",
            Self::In => "IN",
        }
    }

    /// Returns the SQL operator for this method.
    #[must_use]
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::Not => "NOT",
            Self::In => "IN",
        }
    }

    /// Whether the method takes a list of values.
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self, Self::In)
    }

    /// Whether the method orders values (only meaningful for numbers and text).
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
