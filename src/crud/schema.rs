//! Client-side validation schemas for CRUD forms
//!
//! Typed request payloads (login, registration) use `validator` derives;
//! CRUD forms are dynamic value maps, so their schemas are data too: a rule
//! list per field, evaluated locally before anything is sent.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::FieldError;

use super::FormValues;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern")
});

/// One validation rule. Apart from `Required`, rules only fire on present,
/// non-blank values.
pub enum Rule {
    Required(&'static str),
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
    Email(&'static str),
    Pattern(Regex, &'static str),
    Min(f64, &'static str),
    Max(f64, &'static str),
    /// Arrays must contain at least one element.
    NonEmpty(&'static str),
}

/// Per-field rule lists, evaluated in declaration order.
#[derive(Default)]
pub struct Schema {
    rules: IndexMap<&'static str, Vec<Rule>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.rules.entry(name).or_default().extend(rules);
        self
    }

    /// Validate a value map. All failing fields are reported, first failing
    /// rule per field.
    pub fn validate(&self, values: &FormValues) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for (field, rules) in &self.rules {
            let value = values.get(*field);
            for rule in rules {
                if let Some(message) = check(rule, value) {
                    errors.push(FieldError::new(*field, message));
                    break;
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check(rule: &Rule, value: Option<&Value>) -> Option<&'static str> {
    if let Rule::Required(message) = rule {
        return is_blank(value).then_some(*message);
    }
    if is_blank(value) {
        return None;
    }
    let value = value?;
    match rule {
        Rule::Required(_) => None,
        Rule::MinLength(min, message) => {
            (value.as_str().map(|s| s.chars().count()).unwrap_or(0) < *min).then_some(*message)
        }
        Rule::MaxLength(max, message) => value
            .as_str()
            .map(|s| s.chars().count() > *max)
            .unwrap_or(false)
            .then_some(*message),
        Rule::Email(message) => value
            .as_str()
            .map(|s| !EMAIL_RE.is_match(s))
            .unwrap_or(true)
            .then_some(*message),
        Rule::Pattern(pattern, message) => value
            .as_str()
            .map(|s| !pattern.is_match(s))
            .unwrap_or(true)
            .then_some(*message),
        Rule::Min(min, message) => as_number(value)
            .map(|n| n < *min)
            .unwrap_or(true)
            .then_some(*message),
        Rule::Max(max, message) => as_number(value)
            .map(|n| n > *max)
            .unwrap_or(true)
            .then_some(*message),
        Rule::NonEmpty(message) => value
            .as_array()
            .map(|items| items.is_empty())
            .unwrap_or(true)
            .then_some(*message),
    }
}
