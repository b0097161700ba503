//! Composite query schemas: resource filters merged with the fixed base
//! parameters (`limit`, `page`, `sort`, `order`, `fields`).

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::decode::RawQuery;
use crate::issue::{Issue, QueryError};
use crate::query::{SortOrder, ValidatedQuery};
use crate::rule::Rule;

pub const LIMIT: &str = "limit";
pub const PAGE: &str = "page";
pub const SORT: &str = "sort";
pub const ORDER: &str = "order";
pub const FIELDS: &str = "fields";

const BASE_KEYS: [&str; 5] = [LIMIT, PAGE, SORT, ORDER, FIELDS];

pub const PAGE_WITHOUT_LIMIT: &str =
    "If you include the page parameter, you must also include the limit parameter.";

/// Errors in a schema definition. These surface at startup, never per request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("resource declares no fields")]
    EmptyFields,
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("filter '{key}' collides with a built-in query parameter")]
    Collision { key: String },
    #[error("filterable field '{0}' is not a declared field")]
    FilterableNotInFields(String),
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Ordered set of resource-specific parameter rules.
#[derive(Debug, Clone, Default)]
pub struct FilterSchema {
    rules: Vec<(String, Rule)>,
}

impl FilterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `name`. Insertion order is validation order.
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        let name = name.into();
        match self.rules.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((name, rule)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|(k, _)| k == name).map(|(_, r)| r)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Extend<(String, Rule)> for FilterSchema {
    fn extend<T: IntoIterator<Item = (String, Rule)>>(&mut self, iter: T) {
        for (name, rule) in iter {
            *self = std::mem::take(self).rule(name, rule);
        }
    }
}

/// A validator for one endpoint operation.
#[derive(Debug, Clone)]
pub struct QuerySchema {
    fields: Vec<String>,
    entries: Vec<(String, Rule)>,
    paginated: bool,
}

impl QuerySchema {
    /// Collection schema: `filters` followed by the full base contract.
    pub fn synthesize(fields: &[String], filters: &FilterSchema) -> Result<Self, SchemaError> {
        check_fields(fields)?;
        let mut entries = filter_entries(filters)?;
        entries.push((LIMIT.into(), Rule::positive_int()));
        entries.push((PAGE.into(), Rule::positive_int().with_default(1)));
        entries.push((SORT.into(), Rule::one_of(fields.iter().cloned())));
        entries.push((
            ORDER.into(),
            Rule::one_of([SortOrder::Asc.as_str(), SortOrder::Desc.as_str()])
                .with_default(SortOrder::Asc.as_str()),
        ));
        entries.push((FIELDS.into(), fields_rule(fields)));
        Ok(Self {
            fields: fields.to_vec(),
            entries,
            paginated: true,
        })
    }

    /// Single-record schema: `params` followed by `fields`.
    pub fn for_record(fields: &[String], params: &FilterSchema) -> Result<Self, SchemaError> {
        check_fields(fields)?;
        let mut entries = filter_entries(params)?;
        entries.push((FIELDS.into(), fields_rule(fields)));
        Ok(Self {
            fields: fields.to_vec(),
            entries,
            paginated: false,
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Decode and validate a raw query string.
    pub fn parse_str(&self, raw: &str) -> Result<ValidatedQuery, QueryError> {
        self.parse(&RawQuery::decode(raw))
    }

    /// Validate a decoded query, applying defaults and coercions.
    pub fn parse(&self, raw: &RawQuery) -> Result<ValidatedQuery, QueryError> {
        let mut issues = Vec::new();
        let mut values = Map::new();

        for (name, rule) in &self.entries {
            let checked = match raw.get(name) {
                Some(value) => rule.check_param(name, value),
                None => match rule.default_value() {
                    Some(default) => Ok(default.clone()),
                    None => continue,
                },
            };
            match checked {
                Ok(value) => {
                    values.insert(name.clone(), value);
                }
                Err(issue) if issue.is_terminal() => return Err(QueryError::single(issue)),
                Err(issue) => issues.push(issue),
            }
        }

        let unknown: Vec<String> = raw
            .keys()
            .filter(|k| !self.entries.iter().any(|(name, _)| name.as_str() == *k))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            issues.push(Issue::unrecognized(unknown));
        }

        if issues.is_empty() && self.paginated && raw.contains(PAGE) && !raw.contains(LIMIT) {
            issues.push(Issue::page_without_limit());
        }

        if !issues.is_empty() {
            return Err(QueryError::from_issues(issues));
        }
        Ok(self.assemble(values))
    }

    fn assemble(&self, mut values: Map<String, Value>) -> ValidatedQuery {
        let limit = values.remove(LIMIT).as_ref().and_then(count_value);
        let page = values.remove(PAGE).as_ref().and_then(count_value).unwrap_or(1);
        let sort = values
            .remove(SORT)
            .and_then(|v| v.as_str().map(str::to_string));
        let order = values
            .remove(ORDER)
            .and_then(|v| v.as_str().and_then(SortOrder::parse))
            .unwrap_or_default();
        let fields = match values.remove(FIELDS) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => self.fields.clone(),
        };
        ValidatedQuery::new(limit, page, sort, order, fields, values)
    }
}

/// Positive integer parameter as a count. Integers past `u64` arrive as
/// floats and saturate to `usize::MAX`.
fn count_value(v: &Value) -> Option<usize> {
    v.as_u64()
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .or_else(|| v.as_f64().map(|f| f as usize))
}

fn fields_rule(fields: &[String]) -> Rule {
    Rule::list(Rule::one_of(fields.iter().cloned())).with_default(fields.to_vec())
}

fn check_fields(fields: &[String]) -> Result<(), SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::EmptyFields);
    }
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.as_str()) {
            return Err(SchemaError::DuplicateField(field.clone()));
        }
    }
    Ok(())
}

fn filter_entries(filters: &FilterSchema) -> Result<Vec<(String, Rule)>, SchemaError> {
    filters
        .iter()
        .map(|(name, rule)| {
            if BASE_KEYS.contains(&name) {
                Err(SchemaError::Collision {
                    key: name.to_string(),
                })
            } else {
                Ok((name.to_string(), rule.clone()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<String> {
        ["name", "stackSize", "renewable"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn schema() -> QuerySchema {
        let filters = FilterSchema::new()
            .rule("stackSize", Rule::one_of([1, 16, 64]))
            .rule("renewable", Rule::boolean());
        QuerySchema::synthesize(&fields(), &filters).unwrap()
    }

    #[test]
    fn defaults_fill_in() {
        let q = schema().parse_str("").unwrap();
        assert_eq!(q.limit, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.sort, None);
        assert_eq!(q.order, SortOrder::Asc);
        assert_eq!(q.fields, fields());
        assert!(q.filters().is_empty());
    }

    #[test]
    fn filters_are_coerced() {
        let q = schema()
            .parse_str("stackSize=64&renewable=false&limit=2&page=3&sort=name&order=desc")
            .unwrap();
        assert_eq!(q.filter("stackSize"), Some(&json!(64)));
        assert_eq!(q.filter("renewable"), Some(&json!(false)));
        assert_eq!((q.limit, q.page), (Some(2), 3));
        assert_eq!(q.sort.as_deref(), Some("name"));
        assert_eq!(q.order, SortOrder::Desc);
    }

    #[test]
    fn oversized_counts_saturate() {
        let q = schema()
            .parse_str("limit=2&page=100000000000000000000")
            .unwrap();
        assert_eq!((q.limit, q.page), (Some(2), usize::MAX));
        let q = schema()
            .parse_str("limit=100000000000000000000&page=2")
            .unwrap();
        assert_eq!((q.limit, q.page), (Some(usize::MAX), 2));
    }

    #[test]
    fn collision_is_rejected() {
        let filters = FilterSchema::new().rule("limit", Rule::number());
        assert_eq!(
            QuerySchema::synthesize(&fields(), &filters).unwrap_err(),
            SchemaError::Collision { key: "limit".into() }
        );
    }

    #[test]
    fn field_list_is_checked() {
        assert_eq!(
            QuerySchema::synthesize(&[], &FilterSchema::new()).unwrap_err(),
            SchemaError::EmptyFields
        );
        let dup = vec!["name".to_string(), "name".to_string()];
        assert_eq!(
            QuerySchema::synthesize(&dup, &FilterSchema::new()).unwrap_err(),
            SchemaError::DuplicateField("name".into())
        );
    }

    #[test]
    fn page_without_limit_only_when_otherwise_valid() {
        let err = schema().parse_str("page=2").unwrap_err();
        assert_eq!(err.message(), PAGE_WITHOUT_LIMIT);

        let err = schema().parse_str("page=2&sort=bogus").unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(
            err.message(),
            "Query parameter \"sort\" must be one of the following: name, stackSize, renewable."
        );
    }

    #[test]
    fn filter_issues_come_before_base_issues() {
        let err = schema().parse_str("limit=0&stackSize=3").unwrap_err();
        assert_eq!(err.issues().len(), 2);
        assert_eq!(err.issues()[0].parameter(), Some("stackSize"));
    }

    #[test]
    fn boolean_failure_wins() {
        let err = schema().parse_str("stackSize=3&renewable=maybe").unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.message(), "Query parameter \"renewable\" must be of type boolean.");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = schema().parse_str("colour=red").unwrap_err();
        assert_eq!(
            err.message(),
            "Error when validating query parameters: Unrecognized key(s) in object: 'colour'"
        );
    }

    #[test]
    fn record_schema_has_no_pagination() {
        let params = FilterSchema::new().rule("itemFields", Rule::list(Rule::string()));
        let schema = QuerySchema::for_record(&fields(), &params).unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["itemFields", "fields"]);
        assert!(schema.parse_str("page=1").is_err());
        let q = schema.parse_str("fields=name&itemFields=image").unwrap();
        assert_eq!(q.fields, vec!["name".to_string()]);
        assert_eq!(q.filter("itemFields"), Some(&json!(["image"])));
    }
}
