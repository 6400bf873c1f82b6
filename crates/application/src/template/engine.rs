//! Template substitution engine

use serde_json::{Map, Value};

use super::TemplateError;
use super::parser::{Segment, parse_template};

/// Fills every `{field}` in `template` from `source`.
///
/// Strings are inserted as-is; any other JSON value is inserted in its JSON
/// text form (`7`, `true`, `null`, `[1,2]`).
///
/// # Errors
///
/// Returns an error if the template is malformed or references a field
/// missing from `source`.
pub fn substitute(template: &str, source: &Map<String, Value>) -> Result<String, TemplateError> {
    let segments = parse_template(template)?;
    let mut result = String::with_capacity(template.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Field(field) => {
                let value = source.get(&field.name).ok_or_else(|| {
                    TemplateError::UnknownField {
                        name: field.name.clone(),
                        position: field.span.start,
                    }
                })?;
                result.push_str(&render_value(value));
            }
        }
    }

    Ok(result)
}

/// Renders a value the way it appears in a substituted template.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
