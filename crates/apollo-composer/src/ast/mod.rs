//! *Abstract Syntax Tree* for GraphQL executable documents
//!
//! This AST represents documents that conform to the executable subset of the
//! GraphQL [syntactic grammar]: operations and fragment definitions. These
//! documents may or may not be [valid] — the crate is schemaless and performs
//! no validation of its own.
//!
//! [syntactic grammar]: https://spec.graphql.org/October2021/#sec-Language
//! [valid]: https://spec.graphql.org/October2021/#sec-Validation
//!
//! ## Parsing
//!
//! Use [`Document::parse`], or [`Parser`] to configure parser limits.
//! Parsing is delegated to [`apollo_parser`]; its errors are surfaced
//! verbatim through [`Error::Syntax`][crate::Error::Syntax].
//!
//! ## Structural sharing and mutation
//!
//! Nodes inside documents are wrapped in [`Node`], a reference-counted smart
//! pointer. This allows sharing nodes between documents without cloning
//! entire subtrees. To modify a node, the [`make_mut`][Node::make_mut]
//! method provides copy-on-write semantics. Every editing operation on
//! [`Document`] relies on this: it returns a new document that shares all
//! untouched subtrees with the original.
//!
//! ## Serialization
//!
//! [`Document`] and its node types implement [`Display`][std::fmt::Display]
//! and [`ToString`] by serializing to GraphQL syntax with a default
//! configuration. `serialize` methods return a builder that has chaining
//! methods for setting serialization configuration, and also implements
//! `Display` and `ToString`.

use crate::Node;

mod impls;
mod parse;
pub(crate) mod serialize;

pub use self::parse::Parser;
pub use self::serialize::Serialize;

/// A GraphQL identifier
pub type Name = String;

/// Refers to the name of a GraphQL type defined elsewhere
pub type NamedType = Name;

#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Document>();
    assert_sync::<Document>();
};

/// An executable definition: everything a [`Document`] can contain.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Definition {
    Operation(Node<OperationDefinition>),
    Fragment(Node<FragmentDefinition>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: NamedType,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Node<Value>>,
}

/// The type of a [`VariableDefinition`].
///
/// Non-null never wraps non-null: `non_null` marks are part of the
/// `NonNullNamed` and `NonNullList` variants instead of being a wrapper.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Named(NamedType),
    NonNullNamed(NamedType),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Argument {
    pub name: Name,
    pub value: Node<Value>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Selection {
    Field(Node<Field>),
    FragmentSpread(Node<FragmentSpread>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
    pub directives: Vec<Node<Directive>>,
    /// A leaf field has an empty selection set
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    /// The value after escape sequences are resolved
    String(String),
    Float(ordered_float::OrderedFloat<f64>),
    Int(i32),
    Boolean(bool),
    List(Vec<Node<Value>>),
    Object(Vec<(Name, Node<Value>)>),
}
