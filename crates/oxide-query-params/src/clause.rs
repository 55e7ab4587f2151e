//! SQL fragments rendered from a parsed query.
//!
//! Every renderer is a pure read of the parser state, so they can be called
//! in any order and any number of times once parsing succeeded.
//! [`QueryParser::where_clause`] and [`QueryParser::args`] belong together:
//! the n-th `?` of the clause binds the n-th argument.

use crate::filter::{Filter, Sort};
use crate::parser::QueryParser;
use crate::value::SqlValue;

impl QueryParser {
    /// Projection list, or `*` when `FIELDS` was not given.
    pub fn fields(&self) -> String {
        if self.fields.is_empty() {
            return "*".to_string();
        }
        self.fields.join(", ")
    }

    /// `OFFSET n`, or an empty string when no offset is set.
    pub fn offset(&self) -> String {
        if self.offset > 0 {
            format!("OFFSET {}", self.offset)
        } else {
            String::new()
        }
    }

    /// `LIMIT n`, or an empty string when no limit is set.
    pub fn limit(&self) -> String {
        if self.limit > 0 {
            format!("LIMIT {}", self.limit)
        } else {
            String::new()
        }
    }

    /// `ORDER BY` clause; `+`/`-` prefixes in `SORT` pick the direction.
    pub fn sort(&self) -> String {
        if self.sorts.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self.sorts.iter().map(Sort::to_sql).collect();
        format!("ORDER BY {}", terms.join(", "))
    }

    /// Conditions for the WHERE clause, joined with `AND`, without the
    /// `WHERE` keyword.
    pub fn where_clause(&self) -> String {
        let terms: Vec<String> = self.filters.iter().filter_map(Filter::to_sql).collect();
        terms.join(" AND ")
    }

    /// Arguments for the placeholders of [`QueryParser::where_clause`].
    pub fn args(&self) -> Vec<SqlValue> {
        self.filters.iter().flat_map(Filter::bind_values).collect()
    }

    /// A complete `SELECT` statement over `table`.
    pub fn select_sql(&self, table: &str) -> String {
        let mut sql = format!("SELECT {} FROM {table}", self.fields());

        let where_clause = self.where_clause();
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        for clause in [self.sort(), self.limit(), self.offset()] {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }

        sql
    }

    /// Parsed `FIELDS` entries.
    pub fn fields_list(&self) -> &[String] {
        &self.fields
    }

    /// Parsed offset, 0 when not set.
    pub const fn offset_value(&self) -> u64 {
        self.offset
    }

    /// Parsed limit, 0 when not set.
    pub const fn limit_value(&self) -> u64 {
        self.limit
    }

    /// Parsed sort directives, in order.
    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Parsed filters, in order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Filters on the given field.
    pub fn filters_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Filter> + 'a {
        self.filters.iter().filter(move |filter| filter.name == name)
    }

    /// Whether `FIELDS` names the field.
    pub fn have_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }

    /// Whether any filter targets the field.
    pub fn have_filter(&self, name: &str) -> bool {
        self.filters_for(name).next().is_some()
    }

    /// Whether `SORT` names the field.
    pub fn have_sort(&self, name: &str) -> bool {
        self.sorts.iter().any(|sort| sort.by == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Query, QueryParser, Validations};

    #[test]
    fn test_empty_query_renders_defaults() {
        let (parser, result) = QueryParser::new_parse(Query::new(), Validations::new());
        result.unwrap();
        assert_eq!(parser.fields(), "*");
        assert_eq!(parser.where_clause(), "");
        assert_eq!(parser.sort(), "");
        assert_eq!(parser.limit(), "");
        assert_eq!(parser.offset(), "");
        assert!(parser.args().is_empty());
        assert_eq!(parser.select_sql("users"), "SELECT * FROM users");
    }

    #[test]
    fn test_select_sql_joins_fragments() {
        let query = Query::new()
            .param("fields", "id, name")
            .param("name:LIKE", "jo*")
            .param("SORT", "-id")
            .param("LIMIT", "5")
            .param("OFFSET", "10");
        let validations = Validations::new().field("name");
        let (parser, result) = QueryParser::new_parse(query, validations);
        result.unwrap();
        assert_eq!(
            parser.select_sql("users"),
            "SELECT id, name FROM users WHERE name LIKE ? ORDER BY id DESC LIMIT 5 OFFSET 10"
        );
        assert!(parser.have_field("id"));
        assert!(parser.have_filter("name"));
        assert!(parser.have_sort("id"));
        assert!(!parser.have_sort("name"));
        assert_eq!(parser.limit_value(), 5);
        assert_eq!(parser.offset_value(), 10);
    }
}
