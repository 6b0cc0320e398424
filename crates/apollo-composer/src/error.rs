use crate::ast::Name;
use thiserror::Error;

/// Errors raised while parsing, building or editing a document.
///
/// Missing edit targets are deliberately not errors: writes create the fields
/// they descend through, and removals of something that is not there are
/// no-ops.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The input text was rejected by the parser. The message carries every
    /// parser error verbatim, one per line.
    #[error("syntax error: {message}")]
    Syntax { message: String },

    /// The input text contained a type-system definition. Only executable
    /// definitions (operations and fragments) are representable.
    #[error("executable documents cannot contain a {kind}")]
    TypeSystemDefinition { kind: &'static str },

    /// An integer literal in the input does not fit GraphQL's 32-bit `Int`.
    #[error("integer literal `{text}` overflows Int")]
    IntOverflow { text: String },

    /// A subfield carried its own path. Paths only make sense on the
    /// outermost field of an edit.
    #[error("subfield `{name}` cannot set its own path")]
    NestedPath { name: Name },
}
