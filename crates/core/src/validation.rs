//! Field-level validation issues.
//!
//! Payloads are validated with `validator` derives. A rejected payload is
//! reported to the caller as an ordered list of [`FieldIssue`]s, one per
//! failed rule, each naming the offending field in `path`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::ValidationErrors;

/// Message attached to `required` rules: the field is absent or `null`.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Issue code for a missing value or a value of the wrong JSON type.
pub const CODE_INVALID_TYPE: &str = "invalid_type";

/// Issue code for a string shorter than its minimum length.
pub const CODE_TOO_SMALL: &str = "too_small";

/// One rejected rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub code: String,
    pub message: String,
    /// Field path; empty when the body as a whole was unreadable.
    pub path: Vec<String>,
}

impl FieldIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>, field: Option<&str>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: field.map(|f| vec![f.to_string()]).unwrap_or_default(),
        }
    }

    /// Issue for a body that could not be read into the payload type at all.
    pub fn unreadable_body(err: &serde_json::Error) -> Self {
        Self::new(CODE_INVALID_TYPE, err.to_string(), None)
    }

    /// The field this issue refers to, if any.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Flatten `validator` errors into issues, ordered by `position(field)`.
///
/// Issues for the same field keep the order the rules were declared in.
pub fn collect_issues(
    errors: &ValidationErrors,
    position: impl Fn(&str) -> usize,
) -> Vec<FieldIssue> {
    let mut issues: Vec<(usize, FieldIssue)> = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let name: &str = &field;
        for error in field_errors {
            let message = error
                .message
                .as_deref()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Invalid value for {name}"));
            issues.push((
                position(name),
                FieldIssue::new(issue_code(&error.code), message, Some(name)),
            ));
        }
    }

    issues.sort_by_key(|(pos, _)| *pos);
    issues.into_iter().map(|(_, issue)| issue).collect()
}

/// Issues for declared fields whose JSON value has the wrong type.
///
/// Every field in `fields` takes a string; those also listed in `id_fields`
/// take an integer as well. Absent and `null` values are left to the
/// `required` rules.
pub fn type_issues(
    body: &Map<String, Value>,
    fields: &[&str],
    id_fields: &[&str],
) -> Vec<FieldIssue> {
    fields
        .iter()
        .filter_map(|field| match body.get(*field)? {
            Value::Null | Value::String(_) => None,
            Value::Number(n) if n.is_i64() && id_fields.contains(field) => None,
            other => Some(FieldIssue::new(
                CODE_INVALID_TYPE,
                format!("Expected string, received {}", json_kind(other)),
                Some(field),
            )),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Map `validator` rule codes onto the issue codes exposed by the API.
fn issue_code(rule: &str) -> &str {
    match rule {
        "required" => CODE_INVALID_TYPE,
        "length" => CODE_TOO_SMALL,
        other => other,
    }
}
