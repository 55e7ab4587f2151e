//! # oxide-query-params
//!
//! Turns URL query parameters into the pieces of a parameterized SQL query.
//!
//! This crate provides:
//! - A filter key grammar: `field`, `field:METHOD`, `field:METHOD:N`
//! - An allow-list of filterable fields with value types and validators
//! - Reserved keys for projection (`FIELDS`), ordering (`SORT`) and
//!   paging (`LIMIT`, `OFFSET`)
//! - Rendering of `WHERE`, `ORDER BY`, `LIMIT` and `OFFSET` fragments with
//!   `?` placeholders and the matching argument list
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_query_params::{Query, QueryParser, SqlValue, Validations, ValueType};
//! use oxide_query_params::validation::min_max;
//!
//! let query = Query::from_query_string(
//!     "fields=id,name&name:LIKE=jo*&age:GTE=18&SORT=-age&LIMIT=20",
//! );
//! let validations = Validations::new()
//!     .field("name")
//!     .validated("age", ValueType::Int, min_max(0, 150));
//!
//! let (parser, result) = QueryParser::new_parse(query, validations);
//! result.unwrap();
//!
//! assert_eq!(parser.fields(), "id, name");
//! assert_eq!(parser.where_clause(), "age >= ? AND name LIKE ?");
//! assert_eq!(
//!     parser.args(),
//!     vec![SqlValue::Int(18), SqlValue::Text("jo%".to_string())]
//! );
//! assert_eq!(parser.sort(), "ORDER BY age DESC");
//! assert_eq!(parser.limit(), "LIMIT 20");
//! ```
//!
//! ## Filter Methods
//!
//! | Key          | SQL                  |
//! |--------------|----------------------|
//! | `f` / `f:EQ` | `f = ?`              |
//! | `f:NE`       | `f != ?`             |
//! | `f:GT`       | `f > ?`              |
//! | `f:LT`       | `f < ?`              |
//! | `f:GTE`      | `f >= ?`             |
//! | `f:LTE`      | `f <= ?`             |
//! | `f:LIKE`     | `f LIKE ?` (`*` → `%`) |
//! | `f:IN`       | `f IN (?, ?, ...)`   |
//!
//! A third segment makes a key unique so one field can be filtered twice:
//! `price:GT:1=10&price:LT:2=20` renders `price > ? AND price < ?`.
//!
//! ## Validation Table
//!
//! Fields missing from the table are rejected with
//! [`QueryError::FilterNotAllowed`] unless unknown filters are ignored:
//!
//! ```rust
//! use oxide_query_params::{Query, QueryError, QueryParser, Validations};
//!
//! let query = Query::new().param("secret", "x");
//!
//! let (_, result) = QueryParser::new_parse(query.clone(), Validations::new());
//! assert!(matches!(result, Err(QueryError::FilterNotAllowed(_))));
//!
//! let mut parser = QueryParser::new(query, Validations::new()).ignore_unknown_filters(true);
//! parser.parse().unwrap();
//! assert_eq!(parser.where_clause(), "");
//! ```
//!
//! Tables can also be built from `name` / `name:type` keys:
//!
//! ```rust
//! use oxide_query_params::Validations;
//!
//! let validations = Validations::from_keys([("id:int", None), ("email", None)]).unwrap();
//! assert_eq!(validations.len(), 2);
//! ```

mod clause;
mod config;
mod error;
mod filter;
mod key;
mod method;
mod parser;
mod query;
pub mod validation;
mod value;

pub use config::{ParserConfig, DEFAULT_DELIMITER};
pub use error::{QueryError, Result};
pub use filter::{Filter, FilterValue, Sort};
pub use key::{FilterKey, ParamKey};
pub use method::Method;
pub use parser::QueryParser;
pub use query::Query;
pub use validation::{ValidationRule, Validations, Validator, ValidatorRef};
pub use value::{SqlValue, ValueType};
