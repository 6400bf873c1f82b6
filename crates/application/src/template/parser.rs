//! Template parser for `{field}` syntax
//!
//! Splits a template into literal text and field references. `{{` and `}}`
//! stand for literal braces.

use std::ops::Range;

use super::TemplateError;

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, with escaped braces already collapsed.
    Literal(String),
    /// A `{name}` reference.
    Field(FieldReference),
}

/// Represents a field reference in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    /// The field name (without braces).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl FieldReference {
    /// Creates a new field reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a template into segments.
///
/// # Errors
///
/// Returns an error for an unclosed `{`, a lone `}`, an empty `{}` or a
/// field name carrying a conversion or format spec (`{x!r}`, `{x:>4}`).
///
/// # Examples
///
/// ```
/// use alt_application::template::parser::{parse_template, Segment};
///
/// let segments = parse_template("http://{host}/{{raw}}").unwrap();
/// assert_eq!(segments.len(), 3);
/// assert!(matches!(&segments[1], Segment::Field(f) if f.name == "host"));
/// assert_eq!(segments[2], Segment::Literal("/{raw}".to_string()));
/// ```
pub fn parse_template(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut end = None;
                for (j, ch) in chars.by_ref() {
                    match ch {
                        '}' => {
                            end = Some(j + 1);
                            break;
                        }
                        '{' => return Err(TemplateError::UnexpectedOpen { position: j }),
                        _ => name.push(ch),
                    }
                }

                let Some(end) = end else {
                    return Err(TemplateError::Unclosed { position: i });
                };
                if name.is_empty() {
                    return Err(TemplateError::EmptyField { position: i });
                }
                if name.contains(['!', ':']) {
                    return Err(TemplateError::UnsupportedSpec(name));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(FieldReference::new(name, i..end)));
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose { position: i });
                }
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, span: Range<usize>) -> Segment {
        Segment::Field(FieldReference::new(name, span))
    }

    #[test]
    fn test_parse_simple_field() {
        let segments = parse_template("{name}").unwrap();
        assert_eq!(segments, vec![field("name", 0..6)]);
    }

    #[test]
    fn test_parse_fields_in_url() {
        let segments = parse_template("http://{host}:{port}/api/{id}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("http://".to_string()),
                field("host", 7..13),
                Segment::Literal(":".to_string()),
                field("port", 14..20),
                Segment::Literal("/api/".to_string()),
                field("id", 25..29),
            ]
        );
    }

    #[test]
    fn test_no_fields() {
        let segments = parse_template("Hello, World!").unwrap();
        assert_eq!(segments, vec![Segment::Literal("Hello, World!".to_string())]);
        assert!(parse_template("").unwrap().is_empty());
    }

    #[test]
    fn test_escaped_braces() {
        let segments = parse_template(r#"{{"id": {id}}}"#).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal(r#"{"id": "#.to_string()),
                field("id", 8..12),
                Segment::Literal("}".to_string()),
            ]
        );
    }

    #[test]
    fn test_adjacent_fields() {
        let segments = parse_template("{a}{b}{c}").unwrap();
        assert_eq!(
            segments,
            vec![field("a", 0..3), field("b", 3..6), field("c", 6..9)]
        );
    }

    #[test]
    fn test_unclosed_field() {
        assert_eq!(
            parse_template("abc{name"),
            Err(TemplateError::Unclosed { position: 3 })
        );
    }

    #[test]
    fn test_nested_open_brace() {
        assert_eq!(
            parse_template("{a{b}"),
            Err(TemplateError::UnexpectedOpen { position: 2 })
        );
    }

    #[test]
    fn test_lone_close_brace() {
        assert_eq!(
            parse_template("a}b"),
            Err(TemplateError::UnmatchedClose { position: 1 })
        );
    }

    #[test]
    fn test_empty_field() {
        assert_eq!(
            parse_template("x{}"),
            Err(TemplateError::EmptyField { position: 1 })
        );
    }

    #[test]
    fn test_format_spec_rejected() {
        assert_eq!(
            parse_template("{id:>4}"),
            Err(TemplateError::UnsupportedSpec("id:>4".to_string()))
        );
    }
}
