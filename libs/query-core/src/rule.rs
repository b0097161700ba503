//! Value rules for individual query parameters.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::decode::RawValue;
use crate::issue::{Issue, IssueKind, PathSegment};
use crate::schema::SchemaError;
use crate::value::{coerce_number, display_number, display_option, number_value};

#[derive(Debug, Clone)]
pub enum RuleKind {
    String { pattern: Option<Regex> },
    Number { int: bool, min: Option<f64>, max: Option<f64> },
    Boolean,
    OneOf(Vec<Value>),
    List(Box<Rule>),
}

/// Validation and coercion rule for one query parameter.
///
/// ```
/// use query_core::Rule;
/// let variance = Rule::number().min(0.0).max(255.0).with_default(20);
/// assert!(variance.default_value().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    default: Option<Value>,
}

impl Rule {
    fn of(kind: RuleKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::of(RuleKind::String { pattern: None })
    }

    /// String matching `pattern`, case-insensitively.
    pub fn pattern(pattern: &str) -> Result<Self, SchemaError> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::of(RuleKind::String { pattern: Some(re) }))
    }

    pub fn number() -> Self {
        Self::of(RuleKind::Number {
            int: false,
            min: None,
            max: None,
        })
    }

    pub fn positive_int() -> Self {
        Self::number().int().min(1.0)
    }

    pub fn non_negative_int() -> Self {
        Self::number().int().min(0.0)
    }

    pub fn non_negative_number() -> Self {
        Self::number().min(0.0)
    }

    pub fn int(mut self) -> Self {
        if let RuleKind::Number { int, .. } = &mut self.kind {
            *int = true;
        }
        self
    }

    pub fn min(mut self, bound: f64) -> Self {
        if let RuleKind::Number { min, .. } = &mut self.kind {
            *min = Some(bound);
        }
        self
    }

    pub fn max(mut self, bound: f64) -> Self {
        if let RuleKind::Number { max, .. } = &mut self.kind {
            *max = Some(bound);
        }
        self
    }

    /// `"true"` / `"false"`, coerced to a JSON boolean.
    pub fn boolean() -> Self {
        Self::of(RuleKind::Boolean)
    }

    /// One of the given options. The option's own JSON value is what ends up in
    /// the validated query, so `[1, 16, 64]` yields numbers.
    pub fn one_of<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::of(RuleKind::OneOf(options.into_iter().map(Into::into).collect()))
    }

    /// Non-empty list whose elements follow `item`.
    pub fn list(item: Rule) -> Self {
        Self::of(RuleKind::List(Box::new(item)))
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Validate a single top-level parameter.
    pub(crate) fn check_param(&self, name: &str, raw: &RawValue) -> Result<Value, Issue> {
        let mut path = vec![PathSegment::Key(name.to_string())];
        self.check(&mut path, raw)
    }

    fn check(&self, path: &mut Vec<PathSegment>, raw: &RawValue) -> Result<Value, Issue> {
        fn fail(path: &[PathSegment], kind: IssueKind) -> Result<Value, Issue> {
            Err(Issue::new(path.to_vec(), kind))
        }
        let type_mismatch = |path: &[PathSegment], expected: &'static str| {
            fail(
                path,
                IssueKind::InvalidType {
                    expected,
                    received: raw.type_name(),
                },
            )
        };

        match &self.kind {
            RuleKind::String { pattern } => {
                let RawValue::Str(s) = raw else {
                    return type_mismatch(&path[..], "string");
                };
                if let Some(re) = pattern {
                    if !re.is_match(s) {
                        return fail(path, IssueKind::Constraint("Invalid".to_string()));
                    }
                }
                Ok(Value::String(s.clone()))
            }
            RuleKind::Number { int, min, max } => {
                let n = match raw {
                    RawValue::Str(s) => coerce_number(s),
                    _ => None,
                };
                let Some(n) = n else {
                    return fail(
                        path,
                        IssueKind::InvalidType {
                            expected: "number",
                            received: raw.type_name(),
                        },
                    );
                };
                if *int && n.fract() != 0.0 {
                    return fail(
                        path,
                        IssueKind::Constraint("Expected integer, received float".to_string()),
                    );
                }
                if let Some(min) = min.filter(|m| n < *m) {
                    return fail(
                        path,
                        IssueKind::Constraint(format!(
                            "Number must be greater than or equal to {}",
                            display_number(min)
                        )),
                    );
                }
                if let Some(max) = max.filter(|m| n > *m) {
                    return fail(
                        path,
                        IssueKind::Constraint(format!(
                            "Number must be less than or equal to {}",
                            display_number(max)
                        )),
                    );
                }
                Ok(number_value(n))
            }
            RuleKind::Boolean => match raw {
                RawValue::Str(s) if s == "true" => Ok(Value::Bool(true)),
                RawValue::Str(s) if s == "false" => Ok(Value::Bool(false)),
                RawValue::Str(_) => fail(path, IssueKind::NotBoolean),
                _ => type_mismatch(&path[..], "string"),
            },
            RuleKind::OneOf(options) => {
                let RawValue::Str(s) = raw else {
                    return type_mismatch(&path[..], "string");
                };
                match options.iter().find(|o| display_option(o) == *s) {
                    Some(option) => Ok(option.clone()),
                    None => fail(
                        path,
                        IssueKind::InvalidEnum {
                            options: options.iter().map(display_option).collect(),
                        },
                    ),
                }
            }
            RuleKind::List(item) => {
                let items: Vec<&RawValue> = match raw {
                    RawValue::List(items) => items.iter().collect(),
                    RawValue::Str(_) => vec![raw],
                    RawValue::Map(_) => return type_mismatch(&path[..], "array"),
                };
                if items.is_empty() {
                    return fail(
                        path,
                        IssueKind::Constraint("Array must contain at least 1 element(s)".to_string()),
                    );
                }
                let mut out = Vec::with_capacity(items.len());
                for (i, element) in items.into_iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    let checked = item.check(path, element);
                    path.pop();
                    out.push(checked?);
                }
                Ok(Value::Array(out))
            }
        }
    }
}
