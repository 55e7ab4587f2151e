//! A list endpoint turning its query string into a SELECT statement.
//!
//! Run with:
//! ```sh
//! cargo run -p oxide-query-params --example list_endpoint -- 'name:LIKE=jo*&SORT=-id&LIMIT=5'
//! ```

use oxide_query_params::validation::{matches, min_max, one_of};
use oxide_query_params::{ParserConfig, Query, QueryParser, Validations, ValueType};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let query_string = std::env::args().nth(1).unwrap_or_else(|| {
        "fields=id,name&status:IN=active,invited&id:GT=10&SORT=-id&LIMIT=20".to_string()
    });

    let columns = "^(id|name|email|status|created_at)$";
    let validations = Validations::new()
        .typed("id", ValueType::Int)
        .field("name")
        .field("email")
        .validated("status", ValueType::String, one_of(["active", "invited", "banned"]))
        .validated("FIELDS", ValueType::String, matches(columns)?)
        .validated("SORT", ValueType::String, matches(columns)?)
        .validated("LIMIT", ValueType::Int, min_max(1, 100));

    let config: ParserConfig = serde_json::from_str(r#"{"ignore_unknown_filters": true}"#)?;
    let mut parser =
        QueryParser::with_config(Query::from_query_string(&query_string), validations, config);

    if let Err(err) = parser.parse() {
        eprintln!("400 Bad Request: {err}");
        return Ok(());
    }

    info!(sql = %parser.select_sql("users"), "built query");
    println!("{}", parser.select_sql("users"));
    println!("{}", serde_json::to_string(&parser.args())?);
    Ok(())
}
