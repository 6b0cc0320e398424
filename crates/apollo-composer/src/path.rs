//! Path-addressed navigation inside a document.
//!
//! A [`Path`] names one selection set (or one field) nested somewhere inside
//! a document, one [`PathElement`] per level. Every editing operation on
//! [`Document`] resolves its target through the same traversal, built by
//! folding path elements:
//!
//! - A field element descends into the field whose response key equals the
//!   element name. If no such field exists it is created on the way down
//!   with the element's name, alias and arguments and an empty selection
//!   set, so edits can grow a tree in any order.
//! - An inline-fragment element descends into the first inline fragment
//!   with an equal type condition. Inline fragments are never created on
//!   demand: without a match the traversal quietly does nothing.
//!
//! The first element is special. If it is a field element whose name equals
//! the name of a fragment definition in the document, the traversal consumes
//! it and roots itself at that fragment's selection set. Otherwise the whole
//! path is resolved inside every operation definition.

use crate::ast::Argument;
use crate::ast::Definition;
use crate::ast::Document;
use crate::ast::Field;
use crate::ast::Name;
use crate::ast::NamedType;
use crate::ast::Selection;
use crate::ast::Value;
use crate::Node;

/// One level of nesting inside a document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathElement {
    /// Descend into the field with this response key, creating it with this
    /// alias and these arguments if it does not exist yet
    Field {
        name: Name,
        alias: Option<Name>,
        arguments: Vec<(Name, Value)>,
    },
    /// Descend into the first inline fragment with this type condition
    InlineFragment { type_condition: Option<NamedType> },
}

impl PathElement {
    /// A plain field element with no alias and no arguments
    pub fn field(name: impl Into<Name>) -> Self {
        PathElement::Field {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
        }
    }

    /// An inline-fragment element, `None` for `... { }` without a type
    /// condition
    pub fn inline(type_condition: Option<NamedType>) -> Self {
        PathElement::InlineFragment { type_condition }
    }

    /// Sets the alias a field element creates missing fields with.
    /// Has no effect on inline-fragment elements.
    pub fn aliased(mut self, alias: impl Into<Name>) -> Self {
        if let PathElement::Field { alias: slot, .. } = &mut self {
            *slot = Some(alias.into());
        }
        self
    }

    /// Adds an argument that a field element creates missing fields with.
    /// Has no effect on inline-fragment elements.
    pub fn argument(mut self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
        if let PathElement::Field { arguments, .. } = &mut self {
            arguments.push((name.into(), value.into()));
        }
        self
    }
}

/// An ordered sequence of [`PathElement`]s addressing a place in a document.
///
/// The empty path addresses the root selection set of every operation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// The empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain field element
    pub fn field(self, name: impl Into<Name>) -> Self {
        self.push(PathElement::field(name))
    }

    /// Appends an inline-fragment element with a type condition
    pub fn on_type(self, type_condition: impl Into<NamedType>) -> Self {
        self.push(PathElement::inline(Some(type_condition.into())))
    }

    /// Appends an inline-fragment element without a type condition
    pub fn on_untyped(self) -> Self {
        self.push(PathElement::inline(None))
    }

    /// Appends any element
    pub fn push(mut self, element: PathElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn elements(&self) -> &[PathElement] {
        &self.elements
    }
}

impl From<&str> for Path {
    fn from(name: &str) -> Self {
        Path::new().field(name)
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(names: [&str; N]) -> Self {
        names.iter().fold(Path::new(), |path, name| path.field(*name))
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Applies `update` to the selection set the path ends on, once per root the
/// path resolves to, and returns the updated document.
pub(crate) fn update_selection_sets<F>(document: &Document, path: &Path, update: F) -> Document
where
    F: Fn(&mut Vec<Selection>),
{
    let (fragment_root, elements) = split_fragment_root(document, path);
    let mut document = document.clone();
    for definition in &mut document.definitions {
        match definition {
            Definition::Fragment(fragment) => {
                if fragment_root.as_ref() == Some(&fragment.name) {
                    descend(&mut fragment.make_mut().selection_set, elements, &update)
                }
            }
            Definition::Operation(operation) => {
                if fragment_root.is_none() {
                    descend(&mut operation.make_mut().selection_set, elements, &update)
                }
            }
        }
    }
    document
}

/// Applies `update` to the field the path ends on, once per root the path
/// resolves to, and returns the updated document. A path that does not end
/// on a field (empty, or ending on an unmatched inline fragment) leaves the
/// document unchanged.
pub(crate) fn update_fields<F>(document: &Document, path: &Path, update: F) -> Document
where
    F: Fn(&mut Field),
{
    let (fragment_root, elements) = split_fragment_root(document, path);
    let mut document = document.clone();
    for definition in &mut document.definitions {
        match definition {
            Definition::Fragment(fragment) => {
                if fragment_root.as_ref() == Some(&fragment.name) {
                    descend_field(&mut fragment.make_mut().selection_set, elements, &update)
                }
            }
            Definition::Operation(operation) => {
                if fragment_root.is_none() {
                    descend_field(&mut operation.make_mut().selection_set, elements, &update)
                }
            }
        }
    }
    document
}

fn split_fragment_root<'path>(
    document: &Document,
    path: &'path Path,
) -> (Option<Name>, &'path [PathElement]) {
    if let Some((PathElement::Field { name, .. }, rest)) = path.elements().split_first() {
        if document.fragment_by_name(name).is_some() {
            return (Some(name.clone()), rest);
        }
    }
    (None, path.elements())
}

fn descend<F>(selections: &mut Vec<Selection>, elements: &[PathElement], update: &F)
where
    F: Fn(&mut Vec<Selection>),
{
    let (element, rest) = match elements.split_first() {
        None => return update(selections),
        Some(split) => split,
    };
    match element {
        PathElement::Field {
            name,
            alias,
            arguments,
        } => {
            let index = find_or_create_field(selections, name, alias, arguments);
            if let Selection::Field(field) = &mut selections[index] {
                descend(&mut field.make_mut().selection_set, rest, update)
            }
        }
        PathElement::InlineFragment { type_condition } => {
            for selection in selections.iter_mut() {
                if let Selection::InlineFragment(inline) = selection {
                    if inline.type_condition == *type_condition {
                        return descend(&mut inline.make_mut().selection_set, rest, update);
                    }
                }
            }
        }
    }
}

fn descend_field<F>(selections: &mut Vec<Selection>, elements: &[PathElement], update: &F)
where
    F: Fn(&mut Field),
{
    let (element, rest) = match elements.split_first() {
        None => return,
        Some(split) => split,
    };
    match element {
        PathElement::Field {
            name,
            alias,
            arguments,
        } => {
            let index = find_or_create_field(selections, name, alias, arguments);
            if let Selection::Field(field) = &mut selections[index] {
                let field = field.make_mut();
                if rest.is_empty() {
                    update(field)
                } else {
                    descend_field(&mut field.selection_set, rest, update)
                }
            }
        }
        PathElement::InlineFragment { type_condition } => {
            for selection in selections.iter_mut() {
                if let Selection::InlineFragment(inline) = selection {
                    if inline.type_condition == *type_condition {
                        return descend_field(&mut inline.make_mut().selection_set, rest, update);
                    }
                }
            }
        }
    }
}

fn find_or_create_field(
    selections: &mut Vec<Selection>,
    name: &Name,
    alias: &Option<Name>,
    arguments: &[(Name, Value)],
) -> usize {
    let found = selections.iter().position(|selection| {
        matches!(selection, Selection::Field(field) if field.response_key() == name)
    });
    match found {
        Some(index) => index,
        None => {
            let field = Field {
                alias: alias.clone(),
                name: name.clone(),
                arguments: arguments
                    .iter()
                    .map(|(name, value)| Node::new(Argument::new(name.clone(), value.clone())))
                    .collect(),
                directives: Vec::new(),
                selection_set: Vec::new(),
            };
            selections.push(Selection::Field(Node::new(field)));
            selections.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add_leaf(document: &Document, path: &Path, name: &str) -> Document {
        update_selection_sets(document, path, |selections| {
            selections.push(Selection::from(Field::new(name)))
        })
    }

    #[test]
    fn writes_create_missing_fields_on_the_way_down() {
        let doc = Document::parse("{ a }").unwrap();
        let path = Path::from(["user", "friends"]);
        let doc = add_leaf(&doc, &path, "id");
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ a user { friends { id } } }",
        );
    }

    #[test]
    fn created_fields_carry_alias_and_arguments_from_their_element() {
        let doc = Document {
            definitions: vec![Definition::Operation(Node::new(
                crate::ast::OperationDefinition::new(crate::ast::OperationType::Query),
            ))],
        };
        let path = Path::new().push(PathElement::field("user").aliased("me").argument("id", 1));
        let doc = add_leaf(&doc, &path, "name");
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ me: user(id: 1) { name } }",
        );
    }

    #[test]
    fn empty_path_addresses_every_operation_root() {
        let doc = Document::parse("query { a } mutation { b }").unwrap();
        let doc = add_leaf(&doc, &Path::new(), "c");
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ a c } mutation { b c }",
        );
    }

    #[test]
    fn a_leading_fragment_name_roots_the_path_at_that_fragment() {
        let doc = Document::parse("query { ...Parts } fragment Parts on Query { a }").unwrap();
        let doc = add_leaf(&doc, &Path::from("Parts"), "b");
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ ...Parts } fragment Parts on Query { a b }",
        );
    }

    #[test]
    fn inline_fragment_elements_match_by_type_condition() {
        let doc = Document::parse("{ pet { ... on Dog { barkVolume } } }").unwrap();
        let path = Path::from("pet").on_type("Dog");
        let doc = add_leaf(&doc, &path, "name");
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ pet { ... on Dog { barkVolume name } } }",
        );
    }

    #[test]
    fn unmatched_inline_fragment_elements_do_nothing() {
        let doc = Document::parse("{ pet { name } }").unwrap();
        let path = Path::from("pet").on_type("Dog");
        let edited = add_leaf(&doc, &path, "barkVolume");
        assert_eq!(edited, doc);
    }

    #[test]
    fn field_updates_reach_the_endpoint_field() {
        let doc = Document::parse("{ user { id } }").unwrap();
        let doc = update_fields(&doc, &Path::from("user"), |field| {
            field.arguments.push(Node::new(Argument::new("id", 4)))
        });
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ user(id: 4) { id } }",
        );
    }
}
