//! Build a document from an ordered list of operations.

use crate::ast::Definition;
use crate::ast::Document;
use crate::ast::Name;
use crate::ast::NamedType;
use crate::ast::OperationDefinition;
use crate::ast::OperationType;
use crate::ast::Value;
use crate::edits::FieldOptions;
use crate::edits::Subfield;
use crate::edits::VariableOptions;
use crate::path::Path;
use crate::Error;
use crate::Node;

/// One step of [`build`]: a closed registry of every editing operation this
/// crate offers, applied in list order.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// [`Document::add_field`]
    Field { name: Name, options: FieldOptions },
    /// [`Document::remove_field`]
    RemoveField { name: Name, path: Path },
    /// [`Document::replace_field`]
    ReplaceField { name: Name, options: FieldOptions },
    /// [`Document::add_argument`]
    Argument {
        name: Name,
        path: Path,
        value: Value,
    },
    /// [`Document::remove_argument`]
    RemoveArgument { name: Name, path: Path },
    /// [`Document::replace_argument`]
    ReplaceArgument {
        name: Name,
        path: Path,
        value: Value,
    },
    /// [`Document::add_directive`]
    Directive {
        name: Name,
        path: Path,
        arguments: Vec<(Name, Value)>,
    },
    /// [`Document::add_variable`]
    Variable {
        name: Name,
        options: VariableOptions,
    },
    /// [`Document::remove_variable`]
    RemoveVariable { name: Name },
    /// [`Document::set_operation_type`]
    OperationType { operation_type: OperationType },
    /// [`Document::set_operation_name`]
    OperationName { name: Name },
    /// [`Document::define_fragment`]
    Fragment {
        name: Name,
        type_condition: NamedType,
        fields: Vec<Subfield>,
    },
    /// [`Document::remove_fragment`]
    RemoveFragment { name: Name },
    /// [`Document::add_inline_fragment`]
    InlineFragment {
        type_condition: Option<NamedType>,
        path: Path,
        fields: Vec<Subfield>,
    },
    /// [`Document::spread_fragment`]
    SpreadFragment { name: Name, path: Path },
    /// [`Document::inline_fragments`]
    InlineFragments,
    /// [`Document::merge`]
    Merge { document: Document },
    /// [`Document::inject_typenames`]
    InjectTypenames,
    /// [`Document::inline_variables`]
    InlineVariables { bindings: Vec<(Name, Value)> },
}

impl Document {
    /// Applies one [`Op`] and returns the updated document
    pub fn apply(&self, op: Op) -> Result<Self, Error> {
        Ok(match op {
            Op::Field { name, options } => self.add_field(name, &options)?,
            Op::RemoveField { name, path } => self.remove_field(name, &path),
            Op::ReplaceField { name, options } => self.replace_field(name, &options),
            Op::Argument { name, path, value } => self.add_argument(name, &path, value),
            Op::RemoveArgument { name, path } => self.remove_argument(name, &path),
            Op::ReplaceArgument { name, path, value } => self.replace_argument(name, &path, value),
            Op::Directive {
                name,
                path,
                arguments,
            } => self.add_directive(name, &path, arguments),
            Op::Variable { name, options } => self.add_variable(name, &options),
            Op::RemoveVariable { name } => self.remove_variable(name),
            Op::OperationType { operation_type } => self.set_operation_type(operation_type),
            Op::OperationName { name } => self.set_operation_name(name),
            Op::Fragment {
                name,
                type_condition,
                fields,
            } => self.define_fragment(name, type_condition, fields)?,
            Op::RemoveFragment { name } => self.remove_fragment(name),
            Op::InlineFragment {
                type_condition,
                path,
                fields,
            } => self.add_inline_fragment(type_condition, &path, fields)?,
            Op::SpreadFragment { name, path } => self.spread_fragment(name, &path),
            Op::InlineFragments => self.inline_fragments(),
            Op::Merge { document } => self.merge(&document),
            Op::InjectTypenames => self.inject_typenames(),
            Op::InlineVariables { bindings } => self.inline_variables(bindings),
        })
    }
}

/// Folds an ordered list of [`Op`]s over a fresh document holding a single
/// empty `query` operation.
pub fn build(ops: impl IntoIterator<Item = Op>) -> Result<Document, Error> {
    let mut document = Document {
        definitions: vec![Definition::Operation(Node::new(OperationDefinition::new(
            OperationType::Query,
        )))],
    };
    for op in ops {
        document = document.apply(op)?;
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_starts_from_one_empty_query() {
        let document = build([]).unwrap();
        assert_eq!(document.operations().count(), 1);
        assert_eq!(document.serialize().no_indent().to_string(), "{}");
    }

    #[test]
    fn ops_apply_in_order() {
        let document = build([
            Op::Field {
                name: "user".into(),
                options: FieldOptions::new(),
            },
            Op::RemoveField {
                name: "user".into(),
                path: Path::new(),
            },
            Op::Field {
                name: "viewer".into(),
                options: FieldOptions::new(),
            },
        ])
        .unwrap();
        assert_eq!(document.serialize().no_indent().to_string(), "{ viewer }");
    }
}
