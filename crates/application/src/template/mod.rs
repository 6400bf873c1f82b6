//! Template substitution module
//!
//! Fills `{field}` references in url-like arguments from the data set the
//! test runs with, so a data set can reference its own fields.
//!
//! # Usage
//!
//! ```
//! use alt_application::template::substitute;
//! use serde_json::json;
//!
//! let source = json!({"host": "x.com", "id": 7});
//! let url = substitute("http://{host}/api/{id}", source.as_object().unwrap()).unwrap();
//! assert_eq!(url, "http://x.com/api/7");
//! ```

pub mod engine;
pub mod parser;

use thiserror::Error;

pub use engine::{render_value, substitute};
pub use parser::{FieldReference, Segment, parse_template};

/// Errors raised while parsing or filling a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` was never closed.
    #[error("unclosed '{{' at position {position}")]
    Unclosed {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A `{` appeared inside a field name.
    #[error("unexpected '{{' inside field at position {position}")]
    UnexpectedOpen {
        /// Byte offset of the offending brace.
        position: usize,
    },

    /// A lone `}` outside any field.
    #[error("single '}}' encountered at position {position}")]
    UnmatchedClose {
        /// Byte offset of the brace.
        position: usize,
    },

    /// `{}` with no field name.
    #[error("empty field name at position {position}")]
    EmptyField {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// Conversion or format spec in a field.
    #[error("unsupported format spec in field '{0}'")]
    UnsupportedSpec(String),

    /// The field is not present in the source mapping.
    #[error("unknown field '{name}' at position {position}")]
    UnknownField {
        /// The field name.
        name: String,
        /// Byte offset of the reference's opening brace.
        position: usize,
    },
}
