//! Structural union of two documents.

use crate::ast::Argument;
use crate::ast::Definition;
use crate::ast::Document;
use crate::ast::Name;
use crate::ast::OperationDefinition;
use crate::ast::OperationType;
use crate::ast::Selection;
use crate::ast::Value;
use crate::Node;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// What a definition folds into during a merge: all operations of one type
/// become one operation, fragments keep their identity by name.
#[derive(Eq, Hash, PartialEq)]
enum SlotKey {
    Operation(OperationType),
    Fragment(Name),
}

impl Document {
    /// The structural union of two documents.
    ///
    /// Definitions fold into slots in first-occurrence order: every
    /// operation of one type folds onto the first of that type (variables
    /// unioned by name, directives unioned structurally, selection sets
    /// concatenated and then deduplicated recursively), and the first
    /// fragment definition of a given name wins whole.
    ///
    /// Two fields are duplicates when they agree on response key and on
    /// argument list up to argument order and object-field order. The
    /// earlier occurrence keeps its position; its selection set becomes the
    /// deduplicated union of both. Spreads and inline fragments are never
    /// deduplicated.
    pub fn merge(&self, other: &Document) -> Document {
        let mut slots: IndexMap<SlotKey, Definition> = IndexMap::new();
        for definition in self.definitions.iter().chain(&other.definitions) {
            match definition {
                Definition::Operation(operation) => {
                    match slots.entry(SlotKey::Operation(operation.operation_type)) {
                        Entry::Occupied(mut entry) => {
                            if let Definition::Operation(base) = entry.get_mut() {
                                fold_operation(base, operation)
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(definition.clone());
                        }
                    }
                }
                Definition::Fragment(fragment) => {
                    slots
                        .entry(SlotKey::Fragment(fragment.name.clone()))
                        .or_insert_with(|| definition.clone());
                }
            }
        }
        Document {
            definitions: slots.into_values().collect(),
        }
    }
}

fn fold_operation(base: &mut Node<OperationDefinition>, other: &OperationDefinition) {
    let base = base.make_mut();
    for variable in &other.variables {
        if !base
            .variables
            .iter()
            .any(|existing| existing.name == variable.name)
        {
            base.variables.push(variable.clone());
        }
    }
    for directive in &other.directives {
        if !base.directives.contains(directive) {
            base.directives.push(directive.clone());
        }
    }
    let mut combined = std::mem::take(&mut base.selection_set);
    combined.extend(other.selection_set.iter().cloned());
    base.selection_set = dedupe_selections(combined);
}

pub(crate) fn dedupe_selections(selections: Vec<Selection>) -> Vec<Selection> {
    let mut out: Vec<Selection> = Vec::new();
    let mut seen: IndexMap<(Name, String), usize> = IndexMap::new();
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                let key = (
                    field.response_key().clone(),
                    argument_signature(&field.arguments),
                );
                match seen.entry(key) {
                    Entry::Occupied(entry) => {
                        if let Selection::Field(earlier) = &mut out[*entry.get()] {
                            let earlier = earlier.make_mut();
                            let mut combined = std::mem::take(&mut earlier.selection_set);
                            combined.extend(field.selection_set.iter().cloned());
                            earlier.selection_set = dedupe_selections(combined);
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(out.len());
                        out.push(Selection::Field(field));
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// The canonical form of an argument list: sorted by name, each value
/// rendered on one line with object fields sorted by name at every depth.
/// Field order inside input objects never defeats deduplication.
fn argument_signature(arguments: &[Node<Argument>]) -> String {
    let mut parts: Vec<String> = arguments
        .iter()
        .map(|argument| {
            format!(
                "{}:{}",
                argument.name,
                canonical_value(&argument.value).serialize().no_indent()
            )
        })
        .collect();
    parts.sort();
    parts.join(",")
}

fn canonical_value(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| Node::new(canonical_value(item)))
                .collect(),
        ),
        Value::Object(fields) => {
            let mut fields: Vec<(Name, Node<Value>)> = fields
                .iter()
                .map(|(name, value)| (name.clone(), Node::new(canonical_value(value))))
                .collect();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(fields)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Document;
    use pretty_assertions::assert_eq;

    fn merged(a: &str, b: &str) -> String {
        let a = Document::parse(a).unwrap();
        let b = Document::parse(b).unwrap();
        a.merge(&b).serialize().no_indent().to_string()
    }

    #[test]
    fn same_fields_unify_recursively() {
        assert_eq!(
            merged("query { user { id } }", "query { user { name } }"),
            "{ user { id name } }",
        );
    }

    #[test]
    fn different_arguments_keep_fields_apart() {
        assert_eq!(
            merged("query { user(id: 1) { id } }", "query { user(id: 2) { id } }"),
            "{ user(id: 1) { id } user(id: 2) { id } }",
        );
    }

    #[test]
    fn argument_order_does_not_keep_fields_apart() {
        assert_eq!(
            merged(
                "query { items(first: 2, filter: { a: 1, b: 2 }) { id } }",
                "query { items(filter: { b: 2, a: 1 }, first: 2) { name } }",
            ),
            "{ items(first: 2, filter: {a: 1, b: 2}) { id name } }",
        );
    }

    #[test]
    fn operation_kinds_stay_separate() {
        assert_eq!(
            merged("query { user { id } }", "mutation { createUser { id } }"),
            "{ user { id } } mutation { createUser { id } }",
        );
    }

    #[test]
    fn variables_union_by_name_first_wins() {
        assert_eq!(
            merged(
                "query A($id: ID!) { user(id: $id) }",
                "query B($id: Int!, $n: Int) { user(id: $id) first(n: $n) }",
            ),
            "query A($id: ID!, $n: Int) { user(id: $id) first(n: $n) }",
        );
    }

    #[test]
    fn aliases_give_fields_their_own_identity() {
        assert_eq!(
            merged("query { a: user { id } }", "query { a: user { name } user { id } }"),
            "{ a: user { id name } user { id } }",
        );
    }
}
