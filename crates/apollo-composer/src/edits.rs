//! Field, argument, directive and variable edits, each a thin wrapper over
//! the path navigator.

use crate::ast::Argument;
use crate::ast::Definition;
use crate::ast::Directive;
use crate::ast::Document;
use crate::ast::Field;
use crate::ast::FragmentSpread;
use crate::ast::InlineFragment;
use crate::ast::Name;
use crate::ast::NamedType;
use crate::ast::OperationType;
use crate::ast::Selection;
use crate::ast::Type;
use crate::ast::Value;
use crate::ast::VariableDefinition;
use crate::path::update_fields;
use crate::path::update_selection_sets;
use crate::path::Path;
use crate::Error;
use crate::Node;

/// Everything [`Document::add_field`] and [`Document::replace_field`] accept
/// besides the field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldOptions {
    alias: Option<Name>,
    arguments: Vec<(Name, Value)>,
    path: Path,
    fields: Vec<Subfield>,
    spreads: Vec<Name>,
    spread_on: Vec<(Option<NamedType>, Vec<Subfield>)>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The alias the field is selected under
    pub fn alias(mut self, alias: impl Into<Name>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Appends an argument
    pub fn argument(mut self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// Where in the document the field goes. Defaults to the root selection
    /// set of every operation.
    pub fn path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Appends a subfield under the new field
    pub fn field(mut self, subfield: impl Into<Subfield>) -> Self {
        self.fields.push(subfield.into());
        self
    }

    /// Appends a fragment spread under the new field
    pub fn spread(mut self, fragment_name: impl Into<Name>) -> Self {
        self.spreads.push(fragment_name.into());
        self
    }

    /// Appends an inline fragment under the new field, selecting the given
    /// subfields. Pass `None` for an inline fragment without a type
    /// condition.
    pub fn spread_on(
        mut self,
        type_condition: impl Into<Option<NamedType>>,
        fields: impl IntoIterator<Item = Subfield>,
    ) -> Self {
        self.spread_on
            .push((type_condition.into(), fields.into_iter().collect()));
        self
    }

    pub(crate) fn check_subfields(&self) -> Result<(), Error> {
        for subfield in &self.fields {
            subfield.check()?
        }
        for (_, subfields) in &self.spread_on {
            for subfield in subfields {
                subfield.check()?
            }
        }
        Ok(())
    }

    pub(crate) fn build(&self, name: &Name) -> Field {
        let mut selection_set: Vec<Selection> = self
            .fields
            .iter()
            .map(|subfield| Selection::from(subfield.options.build(&subfield.name)))
            .collect();
        for fragment_name in &self.spreads {
            selection_set.push(Selection::from(FragmentSpread::new(fragment_name.clone())));
        }
        for (type_condition, subfields) in &self.spread_on {
            let mut inline = InlineFragment::new(type_condition.clone());
            inline.selection_set = subfields
                .iter()
                .map(|subfield| Selection::from(subfield.options.build(&subfield.name)))
                .collect();
            selection_set.push(Selection::from(inline));
        }
        Field {
            alias: self.alias.clone(),
            name: name.clone(),
            arguments: self.arguments_as_nodes(),
            directives: Vec::new(),
            selection_set,
        }
    }

    fn arguments_as_nodes(&self) -> Vec<Node<Argument>> {
        self.arguments
            .iter()
            .map(|(name, value)| Node::new(Argument::new(name.clone(), value.clone())))
            .collect()
    }
}

/// A field nested under another field being added: a bare name, or a name
/// with its own [`FieldOptions`] (except a path, which only the outermost
/// field may carry).
#[derive(Clone, Debug, PartialEq)]
pub struct Subfield {
    pub(crate) name: Name,
    pub(crate) options: FieldOptions,
}

impl Subfield {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            options: FieldOptions::default(),
        }
    }

    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if !self.options.path.is_empty() {
            return Err(Error::NestedPath {
                name: self.name.clone(),
            });
        }
        self.options.check_subfields()
    }
}

impl From<&str> for Subfield {
    fn from(name: &str) -> Self {
        Subfield::new(name)
    }
}

/// Everything [`Document::add_variable`] accepts besides the variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableOptions {
    ty: Option<Type>,
    default: Option<Value>,
    optional: bool,
}

impl VariableOptions {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// The declared GraphQL type. When omitted, the type is inferred from
    /// the default value, and `String` is used when there is nothing to
    /// infer from.
    pub fn ty(mut self, ty: impl Into<Type>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// The default value
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Declare the variable nullable. Without this, the declared type is
    /// made non-null.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl Document {
    /// Appends a field to the selection set at `options.path`, in every
    /// operation (or in the fragment the path starts with). Subfields,
    /// spreads and inline fragments from the options are built under it.
    pub fn add_field(&self, name: impl Into<Name>, options: &FieldOptions) -> Result<Self, Error> {
        options.check_subfields()?;
        let name = name.into();
        Ok(update_selection_sets(self, &options.path, |selections| {
            selections.push(Selection::from(options.build(&name)))
        }))
    }

    /// Removes the first field whose response key is `name` from the
    /// selection set at `path`. Removing a field that is not there is a
    /// no-op.
    pub fn remove_field(&self, name: impl Into<Name>, path: &Path) -> Self {
        let name = name.into();
        update_selection_sets(self, path, |selections| {
            let found = selections.iter().position(|selection| {
                matches!(selection, Selection::Field(field) if *field.response_key() == name)
            });
            if let Some(index) = found {
                selections.remove(index);
            }
        })
    }

    /// Replaces the alias and arguments of the first field whose response
    /// key is `name` in the selection set at `options.path`, keeping its
    /// selection set. Replacing a field that is not there is a no-op.
    pub fn replace_field(&self, name: impl Into<Name>, options: &FieldOptions) -> Self {
        let name = name.into();
        update_selection_sets(self, &options.path, |selections| {
            let found = selections.iter_mut().find_map(|selection| match selection {
                Selection::Field(field) if *field.response_key() == name => Some(field),
                _ => None,
            });
            if let Some(field) = found {
                let field = field.make_mut();
                field.alias = options.alias.clone();
                field.arguments = options.arguments_as_nodes();
            }
        })
    }

    /// Appends an argument to the field at `path`
    pub fn add_argument(
        &self,
        name: impl Into<Name>,
        path: &Path,
        value: impl Into<Value>,
    ) -> Self {
        let argument = Argument::new(name, value);
        update_fields(self, path, |field| {
            field.arguments.push(Node::new(argument.clone()))
        })
    }

    /// Removes every argument named `name` from the field at `path`
    pub fn remove_argument(&self, name: impl Into<Name>, path: &Path) -> Self {
        let name = name.into();
        update_fields(self, path, |field| {
            field.arguments.retain(|argument| argument.name != name)
        })
    }

    /// Removes every argument named `name` from the field at `path` and
    /// appends the replacement at the end of the argument list
    pub fn replace_argument(
        &self,
        name: impl Into<Name>,
        path: &Path,
        value: impl Into<Value>,
    ) -> Self {
        let argument = Argument::new(name, value);
        update_fields(self, path, |field| {
            field.arguments.retain(|existing| existing.name != argument.name);
            field.arguments.push(Node::new(argument.clone()));
        })
    }

    /// Appends a directive to the field at `path`, or to every operation
    /// when the path is empty
    pub fn add_directive<N, V>(
        &self,
        name: impl Into<Name>,
        path: &Path,
        arguments: impl IntoIterator<Item = (N, V)>,
    ) -> Self
    where
        N: Into<Name>,
        V: Into<Value>,
    {
        let mut directive = Directive::new(name);
        directive.arguments = arguments
            .into_iter()
            .map(|(name, value)| Node::new(Argument::new(name, value)))
            .collect();
        if path.is_empty() {
            let mut document = self.clone();
            for definition in &mut document.definitions {
                if let Definition::Operation(operation) = definition {
                    operation
                        .make_mut()
                        .directives
                        .push(Node::new(directive.clone()));
                }
            }
            document
        } else {
            update_fields(self, path, |field| {
                field.directives.push(Node::new(directive.clone()))
            })
        }
    }

    /// Appends a variable definition to every operation. An operation with
    /// no name is named after its capitalized operation type, so that the
    /// declaration has somewhere presentable to live.
    pub fn add_variable(&self, name: impl Into<Name>, options: &VariableOptions) -> Self {
        let ty = options
            .ty
            .clone()
            .or_else(|| options.default.as_ref().and_then(Value::default_type))
            .unwrap_or_else(|| Type::new_named("String"));
        let ty = if options.optional { ty } else { ty.non_null() };
        let variable = VariableDefinition {
            name: name.into(),
            ty,
            default_value: options.default.clone().map(Node::new),
        };
        let mut document = self.clone();
        for definition in &mut document.definitions {
            if let Definition::Operation(operation) = definition {
                let operation = operation.make_mut();
                if operation.name.is_none() {
                    operation.name =
                        Some(operation.operation_type.default_operation_name().to_owned());
                }
                operation.variables.push(Node::new(variable.clone()));
            }
        }
        document
    }

    /// Drops the variable definitions named `name` from every operation
    pub fn remove_variable(&self, name: impl Into<Name>) -> Self {
        let name = name.into();
        let mut document = self.clone();
        for definition in &mut document.definitions {
            if let Definition::Operation(operation) = definition {
                if operation.variables.iter().any(|var| var.name == name) {
                    operation
                        .make_mut()
                        .variables
                        .retain(|var| var.name != name);
                }
            }
        }
        document
    }

    /// Sets the operation type of every operation
    pub fn set_operation_type(&self, operation_type: OperationType) -> Self {
        let mut document = self.clone();
        for definition in &mut document.definitions {
            if let Definition::Operation(operation) = definition {
                operation.make_mut().operation_type = operation_type;
            }
        }
        document
    }

    /// Names (or renames) every operation
    pub fn set_operation_name(&self, name: impl Into<Name>) -> Self {
        let name = name.into();
        let mut document = self.clone();
        for definition in &mut document.definitions {
            if let Definition::Operation(operation) = definition {
                operation.make_mut().name = Some(name.clone());
            }
        }
        document
    }
}
