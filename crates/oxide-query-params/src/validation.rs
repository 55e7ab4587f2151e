//! The validation table: the allow-list of filterable fields, their value
//! types, and optional validators.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::value::{SqlValue, ValueType};

/// Trait for value validators.
///
/// Any `Fn(&SqlValue) -> Result<(), String>` is a validator.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &SqlValue) -> std::result::Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&SqlValue) -> std::result::Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &SqlValue) -> std::result::Result<(), String> {
        self(value)
    }
}

/// Shared handle to a validator.
pub type ValidatorRef = Arc<dyn Validator>;

/// One entry of the validation table.
#[derive(Clone)]
pub struct ValidationRule {
    /// Field name.
    pub field: String,
    /// Type the field's values are coerced to.
    pub value_type: ValueType,
    /// Optional validator run on each coerced value.
    pub validator: Option<ValidatorRef>,
}

impl ValidationRule {
    /// Creates a rule for a text field without a validator.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value_type: ValueType::String,
            validator: None,
        }
    }

    /// Sets the value type.
    #[must_use]
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Attaches a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Runs the validator, if any.
    pub fn check(&self, value: &SqlValue) -> std::result::Result<(), String> {
        self.validator
            .as_ref()
            .map_or(Ok(()), |validator| validator.validate(value))
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field", &self.field)
            .field("value_type", &self.value_type)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// The validation table, keyed by field name.
///
/// Reserved keys (`FIELDS`, `SORT`, `LIMIT`, `OFFSET`) can be registered
/// like any other field to attach a validator to them.
#[derive(Debug, Clone, Default)]
pub struct Validations {
    rules: HashMap<String, ValidationRule>,
}

impl Validations {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows a text field without a validator.
    #[must_use]
    pub fn field(self, field: impl Into<String>) -> Self {
        self.rule(ValidationRule::new(field))
    }

    /// Allows a field of the given type without a validator.
    #[must_use]
    pub fn typed(self, field: impl Into<String>, value_type: ValueType) -> Self {
        self.rule(ValidationRule::new(field).value_type(value_type))
    }

    /// Allows a field with a validator.
    #[must_use]
    pub fn validated(
        self,
        field: impl Into<String>,
        value_type: ValueType,
        validator: impl Validator + 'static,
    ) -> Self {
        self.rule(
            ValidationRule::new(field)
                .value_type(value_type)
                .validator(validator),
        )
    }

    /// Adds a rule, replacing any previous rule for the same field.
    #[must_use]
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.insert(rule.field.clone(), rule);
        self
    }

    /// Adds an entry using the `name` / `name:type` key convention.
    ///
    /// The key is split once here, so lookups are plain map reads.
    pub fn insert(&mut self, key: &str, validator: Option<ValidatorRef>) -> Result<()> {
        let (field, value_type) = match key.split_once(':') {
            Some((field, ty)) => (field, ty.parse::<ValueType>()?),
            None => (key, ValueType::String),
        };
        let rule = ValidationRule {
            field: field.to_string(),
            value_type,
            validator,
        };
        self.rules.insert(rule.field.clone(), rule);
        Ok(())
    }

    /// Builds a table from `name` / `name:type` keys.
    pub fn from_keys<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<ValidatorRef>)>,
        K: AsRef<str>,
    {
        let mut table = Self::new();
        for (key, validator) in entries {
            table.insert(key.as_ref(), validator)?;
        }
        Ok(table)
    }

    /// Looks up the rule for a field.
    pub fn get(&self, field: &str) -> Option<&ValidationRule> {
        self.rules.get(field)
    }

    /// Returns whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Rejects empty text.
pub fn not_empty() -> impl Validator {
    |value: &SqlValue| match value {
        SqlValue::Text(s) if s.is_empty() => Err("value must not be empty".to_string()),
        _ => Ok(()),
    }
}

/// Requires a numeric value of at least `min`.
pub fn min(min: i64) -> impl Validator {
    bounded(Some(min), None, format!("value must be at least {min}"))
}

/// Requires a numeric value of at most `max`.
pub fn max(max: i64) -> impl Validator {
    bounded(None, Some(max), format!("value must be at most {max}"))
}

/// Requires a numeric value within `min..=max`.
pub fn min_max(min: i64, max: i64) -> impl Validator {
    bounded(
        Some(min),
        Some(max),
        format!("value must be between {min} and {max}"),
    )
}

#[allow(clippy::cast_precision_loss)]
fn bounded(min: Option<i64>, max: Option<i64>, message: String) -> impl Validator {
    move |value: &SqlValue| {
        let num = value
            .as_f64()
            .ok_or_else(|| "value must be a number".to_string())?;
        if min.is_some_and(|min| num < min as f64) || max.is_some_and(|max| num > max as f64) {
            return Err(message.clone());
        }
        Ok(())
    }
}

/// Requires the value to equal one of `allowed`.
pub fn one_of<I, V>(allowed: I) -> impl Validator
where
    I: IntoIterator<Item = V>,
    V: Into<SqlValue>,
{
    let allowed: Vec<SqlValue> = allowed.into_iter().map(Into::into).collect();
    move |value: &SqlValue| {
        if allowed.contains(value) {
            Ok(())
        } else {
            Err(format!("{value} is not in scope"))
        }
    }
}

/// Requires text matching a regex pattern.
pub fn matches(pattern: &str) -> std::result::Result<impl Validator, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(move |value: &SqlValue| match value.as_text() {
        Some(text) if re.is_match(text) => Ok(()),
        _ => Err(format!("{value} does not match {}", re.as_str())),
    })
}

/// Runs several validators in order; the first failure wins.
pub fn all(validators: Vec<ValidatorRef>) -> impl Validator {
    move |value: &SqlValue| {
        validators
            .iter()
            .try_for_each(|validator| validator.validate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn test_typed_keys_are_split_on_insert() {
        let table = Validations::from_keys([("id:int", None), ("name", None)]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("id").unwrap().value_type, ValueType::Int);
        assert_eq!(table.get("name").unwrap().value_type, ValueType::String);
        assert!(table.get("id:int").is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Validations::from_keys([("id:integer", None)]).unwrap_err();
        assert!(matches!(err, QueryError::UnknownType(ref t) if t == "integer"));
    }

    #[test]
    fn test_builder_rules() {
        let table = Validations::new()
            .field("name")
            .typed("active", ValueType::Bool)
            .validated("age", ValueType::Int, min(18));
        let age = table.get("age").unwrap();
        assert!(age.check(&SqlValue::Int(21)).is_ok());
        assert!(age.check(&SqlValue::Int(3)).is_err());
        assert!(table.get("name").unwrap().check(&SqlValue::Int(3)).is_ok());
    }

    #[test]
    fn test_not_empty() {
        let v = not_empty();
        assert!(v.validate(&SqlValue::Text("x".into())).is_ok());
        assert!(v.validate(&SqlValue::Text(String::new())).is_err());
    }

    #[test]
    fn test_min_max() {
        let v = min_max(1, 10);
        assert!(v.validate(&SqlValue::Int(1)).is_ok());
        assert!(v.validate(&SqlValue::Float(9.5)).is_ok());
        assert!(v.validate(&SqlValue::Int(11)).is_err());
        assert_eq!(
            v.validate(&SqlValue::Text("5".into())),
            Err("value must be a number".to_string())
        );
        assert_eq!(
            max(3).validate(&SqlValue::Int(4)),
            Err("value must be at most 3".to_string())
        );
    }

    #[test]
    fn test_one_of() {
        let v = one_of(["draft", "published"]);
        assert!(v.validate(&SqlValue::Text("draft".into())).is_ok());
        assert_eq!(
            v.validate(&SqlValue::Text("deleted".into())),
            Err("deleted is not in scope".to_string())
        );

        let v = one_of([1_i64, 2]);
        assert!(v.validate(&SqlValue::Int(2)).is_ok());
        assert!(v.validate(&SqlValue::Text("2".into())).is_err());
    }

    #[test]
    fn test_matches() {
        let v = matches(r"^[a-z_]+$").unwrap();
        assert!(v.validate(&SqlValue::Text("created_at".into())).is_ok());
        assert!(v.validate(&SqlValue::Text("id; DROP".into())).is_err());
        assert!(matches("(").is_err());
    }

    #[test]
    fn test_all_stops_at_first_failure() {
        let v = all(vec![
            Arc::new(min(0)) as ValidatorRef,
            Arc::new(max(5)) as ValidatorRef,
        ]);
        assert!(v.validate(&SqlValue::Int(3)).is_ok());
        assert_eq!(
            v.validate(&SqlValue::Int(-1)),
            Err("value must be at least 0".to_string())
        );
    }
}
