//! Named fragments, inline fragments, spreads, and spread inlining.

use crate::ast::Definition;
use crate::ast::Document;
use crate::ast::FragmentDefinition;
use crate::ast::FragmentSpread;
use crate::ast::InlineFragment;
use crate::ast::Name;
use crate::ast::NamedType;
use crate::ast::Selection;
use crate::edits::Subfield;
use crate::path::update_selection_sets;
use crate::path::Path;
use crate::Error;
use crate::Node;
use indexmap::IndexMap;

impl Document {
    /// Appends a fragment definition on the given type condition, selecting
    /// the given fields (which follow the same rules as
    /// [`add_field`][Self::add_field] subfields).
    pub fn define_fragment(
        &self,
        name: impl Into<Name>,
        type_condition: impl Into<NamedType>,
        fields: impl IntoIterator<Item = Subfield>,
    ) -> Result<Self, Error> {
        let mut fragment = FragmentDefinition::new(name, type_condition);
        for subfield in fields {
            subfield.check()?;
            fragment
                .selection_set
                .push(Selection::from(subfield.options.build(&subfield.name)));
        }
        let mut document = self.clone();
        document
            .definitions
            .push(Definition::Fragment(Node::new(fragment)));
        Ok(document)
    }

    /// Drops the fragment definitions named `name`. Spreads of the fragment
    /// are left alone.
    pub fn remove_fragment(&self, name: impl Into<Name>) -> Self {
        let name = name.into();
        let mut document = self.clone();
        document.definitions.retain(|definition| {
            !matches!(definition, Definition::Fragment(fragment) if fragment.name == name)
        });
        document
    }

    /// Appends an inline fragment to the selection set at `path`. Fields
    /// added later can address it with a path ending in an inline-fragment
    /// element with the same type condition.
    pub fn add_inline_fragment(
        &self,
        type_condition: Option<NamedType>,
        path: &Path,
        fields: impl IntoIterator<Item = Subfield>,
    ) -> Result<Self, Error> {
        let mut inline = InlineFragment::new(type_condition);
        for subfield in fields {
            subfield.check()?;
            inline
                .selection_set
                .push(Selection::from(subfield.options.build(&subfield.name)));
        }
        Ok(update_selection_sets(self, path, |selections| {
            selections.push(Selection::from(inline.clone()))
        }))
    }

    /// Appends a spread of the named fragment to the selection set at
    /// `path`. The fragment does not have to be defined yet (or ever — an
    /// unresolved spread is left alone by [`inline_fragments`][Self::inline_fragments]).
    pub fn spread_fragment(&self, name: impl Into<Name>, path: &Path) -> Self {
        let spread = FragmentSpread::new(name);
        update_selection_sets(self, path, |selections| {
            selections.push(Selection::from(spread.clone()))
        })
    }

    /// Replaces every spread of a fragment defined in this document with
    /// that fragment's selections, flattening chains of fragments, then
    /// drops every fragment definition. Spreads of unknown fragments stay
    /// where they are.
    pub fn inline_fragments(&self) -> Self {
        let fragments: IndexMap<Name, Node<FragmentDefinition>> = self
            .fragments()
            .map(|fragment| (fragment.name.clone(), fragment.clone()))
            .collect();
        let mut document = self.clone();
        for definition in &mut document.definitions {
            if let Definition::Operation(operation) = definition {
                let operation = operation.make_mut();
                let selection_set = std::mem::take(&mut operation.selection_set);
                operation.selection_set =
                    inline_spreads(selection_set, &fragments, &mut Vec::new());
            }
        }
        document
            .definitions
            .retain(|definition| matches!(definition, Definition::Operation(_)));
        document
    }
}

fn inline_spreads(
    selections: Vec<Selection>,
    fragments: &IndexMap<Name, Node<FragmentDefinition>>,
    // Fragments being expanded higher up the stack. A spread that cycles
    // back into one of them stays unresolved instead of recursing forever.
    expanding: &mut Vec<Name>,
) -> Vec<Selection> {
    let mut out = Vec::new();
    for selection in selections {
        match selection {
            Selection::FragmentSpread(spread) => {
                match fragments.get(&spread.fragment_name) {
                    Some(fragment) if !expanding.contains(&spread.fragment_name) => {
                        expanding.push(spread.fragment_name.clone());
                        let inlined =
                            inline_spreads(fragment.selection_set.clone(), fragments, expanding);
                        expanding.pop();
                        out.extend(inlined);
                    }
                    _ => out.push(Selection::FragmentSpread(spread)),
                }
            }
            Selection::Field(mut field) => {
                if !field.selection_set.is_empty() {
                    let field = field.make_mut();
                    let selection_set = std::mem::take(&mut field.selection_set);
                    field.selection_set = inline_spreads(selection_set, fragments, expanding);
                }
                out.push(Selection::Field(field));
            }
            Selection::InlineFragment(mut inline) => {
                {
                    let inline = inline.make_mut();
                    let selection_set = std::mem::take(&mut inline.selection_set);
                    inline.selection_set = inline_spreads(selection_set, fragments, expanding);
                }
                out.push(Selection::InlineFragment(inline));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chained_fragments_flatten() {
        let doc = Document::parse(
            "query { ...Outer }
             fragment Outer on Query { a ...Inner }
             fragment Inner on Query { b }",
        )
        .unwrap();
        let doc = doc.inline_fragments();
        assert_eq!(doc.serialize().no_indent().to_string(), "{ a b }");
    }

    #[test]
    fn unresolved_spreads_survive_and_definitions_do_not() {
        let doc = Document::parse(
            "query { ...Known ...Unknown }
             fragment Known on Query { a }",
        )
        .unwrap();
        let doc = doc.inline_fragments();
        assert_eq!(doc.serialize().no_indent().to_string(), "{ a ...Unknown }");
        assert_eq!(doc.fragments().count(), 0);
    }

    #[test]
    fn cyclic_fragments_stop_expanding_instead_of_recursing() {
        let doc = Document::parse(
            "query { ...A }
             fragment A on Query { a ...B }
             fragment B on Query { b ...A }",
        )
        .unwrap();
        let doc = doc.inline_fragments();
        assert_eq!(doc.serialize().no_indent().to_string(), "{ a b ...A }");
    }

    #[test]
    fn spreads_inside_inline_fragments_are_resolved() {
        let doc = Document::parse(
            "query { pet { ... on Dog { ...DogParts } } }
             fragment DogParts on Dog { barkVolume }",
        )
        .unwrap();
        let doc = doc.inline_fragments();
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ pet { ... on Dog { barkVolume } } }",
        );
    }
}
