#![allow(dead_code)]

use oxide_query_params::{Query, QueryError, QueryParser, Validations};

/// Builds a query from `(key, value)` pairs; repeated keys collect values.
pub fn query(pairs: &[(&str, &str)]) -> Query {
    pairs
        .iter()
        .fold(Query::new(), |query, (key, value)| query.param(*key, *value))
}

pub fn parse(pairs: &[(&str, &str)], validations: Validations) -> QueryParser {
    let (parser, result) = QueryParser::new_parse(query(pairs), validations);
    result.unwrap_or_else(|e| panic!("Failed to parse: {pairs:?}\nError: {e:?}"));
    parser
}

pub fn parse_err(pairs: &[(&str, &str)], validations: Validations) -> QueryError {
    let (_, result) = QueryParser::new_parse(query(pairs), validations);
    result.expect_err(&format!("Expected parse error for: {pairs:?}"))
}

/// Asserts that `where_clause()` has one placeholder per argument.
pub fn assert_aligned(parser: &QueryParser) {
    let clause = parser.where_clause();
    let placeholders = clause.matches('?').count();
    assert_eq!(
        placeholders,
        parser.args().len(),
        "Placeholder mismatch.\n  Where: {clause}\n  Args:  {:?}",
        parser.args()
    );
}
