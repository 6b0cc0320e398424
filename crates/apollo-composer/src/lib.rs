#![doc = include_str!("../README.md")]

#[macro_use]
mod macros;
pub mod ast;
mod builder;
mod edits;
mod error;
mod fragments;
mod merge;
mod node;
pub mod path;
mod transform;

pub use self::ast::Document;
pub use self::ast::Parser;
pub use self::builder::build;
pub use self::builder::Op;
pub use self::edits::FieldOptions;
pub use self::edits::Subfield;
pub use self::edits::VariableOptions;
pub use self::error::Error;
pub use self::node::Node;
pub use self::path::Path;
pub use self::path::PathElement;
