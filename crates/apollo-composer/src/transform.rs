//! Whole-document rewrites: `__typename` injection and variable inlining.

use crate::ast::Definition;
use crate::ast::Directive;
use crate::ast::Document;
use crate::ast::Field;
use crate::ast::Name;
use crate::ast::Selection;
use crate::ast::Value;
use crate::Node;

impl Document {
    /// Appends a `__typename` field to every selection set in the document
    /// that does not already select one: operation roots, fields with
    /// subselections, inline fragments and fragment definitions. Leaf
    /// fields have no selection set and gain none.
    ///
    /// Applying this twice is the same as applying it once.
    pub fn inject_typenames(&self) -> Self {
        let mut document = self.clone();
        for definition in &mut document.definitions {
            match definition {
                Definition::Operation(operation) => {
                    inject_typename(&mut operation.make_mut().selection_set)
                }
                Definition::Fragment(fragment) => {
                    inject_typename(&mut fragment.make_mut().selection_set)
                }
            }
        }
        document
    }

    /// Substitutes a literal for every reference to each bound variable and
    /// drops the matching variable definitions from every operation.
    /// References are replaced in field and directive arguments, however
    /// deeply nested in list and object values, in operations and fragment
    /// definitions alike.
    pub fn inline_variables<N, V>(&self, bindings: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<Name>,
        V: Into<Value>,
    {
        let bindings: Vec<(Name, Value)> = bindings
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let mut document = self.clone();
        for definition in &mut document.definitions {
            match definition {
                Definition::Operation(operation) => {
                    let operation = operation.make_mut();
                    operation
                        .variables
                        .retain(|variable| lookup(&bindings, &variable.name).is_none());
                    substitute_in_directives(&mut operation.directives, &bindings);
                    substitute_in_selections(&mut operation.selection_set, &bindings);
                }
                Definition::Fragment(fragment) => {
                    let fragment = fragment.make_mut();
                    substitute_in_directives(&mut fragment.directives, &bindings);
                    substitute_in_selections(&mut fragment.selection_set, &bindings);
                }
            }
        }
        document
    }
}

fn inject_typename(selections: &mut Vec<Selection>) {
    for selection in selections.iter_mut() {
        match selection {
            Selection::Field(field) => {
                if !field.selection_set.is_empty() {
                    inject_typename(&mut field.make_mut().selection_set)
                }
            }
            Selection::InlineFragment(inline) => {
                inject_typename(&mut inline.make_mut().selection_set)
            }
            Selection::FragmentSpread(_) => {}
        }
    }
    let already_there = selections.iter().any(|selection| {
        matches!(
            selection,
            Selection::Field(field) if field.name == "__typename" && field.alias.is_none()
        )
    });
    if !already_there {
        selections.push(Selection::from(Field::new("__typename")));
    }
}

fn lookup<'bindings>(bindings: &'bindings [(Name, Value)], name: &str) -> Option<&'bindings Value> {
    bindings
        .iter()
        .find(|(bound, _)| bound.as_str() == name)
        .map(|(_, value)| value)
}

fn substitute_in_selections(selections: &mut Vec<Selection>, bindings: &[(Name, Value)]) {
    for selection in selections.iter_mut() {
        match selection {
            Selection::Field(field) => {
                let field = field.make_mut();
                for argument in &mut field.arguments {
                    substitute_value(&mut argument.make_mut().value, bindings);
                }
                substitute_in_directives(&mut field.directives, bindings);
                substitute_in_selections(&mut field.selection_set, bindings);
            }
            Selection::FragmentSpread(spread) => {
                substitute_in_directives(&mut spread.make_mut().directives, bindings)
            }
            Selection::InlineFragment(inline) => {
                let inline = inline.make_mut();
                substitute_in_directives(&mut inline.directives, bindings);
                substitute_in_selections(&mut inline.selection_set, bindings);
            }
        }
    }
}

fn substitute_in_directives(directives: &mut Vec<Node<Directive>>, bindings: &[(Name, Value)]) {
    for directive in directives {
        for argument in &mut directive.make_mut().arguments {
            substitute_value(&mut argument.make_mut().value, bindings);
        }
    }
}

fn substitute_value(value: &mut Node<Value>, bindings: &[(Name, Value)]) {
    let replacement = match &**value {
        Value::Variable(name) => lookup(bindings, name).cloned(),
        _ => None,
    };
    if let Some(literal) = replacement {
        *value = Node::new(literal);
        return;
    }
    match &**value {
        Value::List(_) | Value::Object(_) => match value.make_mut() {
            Value::List(items) => {
                for item in items {
                    substitute_value(item, bindings)
                }
            }
            Value::Object(fields) => {
                for (_name, item) in fields {
                    substitute_value(item, bindings)
                }
            }
            _ => {}
        },
        _ => {}
    }
}
