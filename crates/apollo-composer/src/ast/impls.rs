use super::*;
use std::fmt;

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Return a new configurable parser
    pub fn parser() -> Parser {
        Parser::default()
    }

    /// Parse `input` with the default parser configuration
    pub fn parse(input: &str) -> Result<Self, crate::Error> {
        Self::parser().parse(input)
    }

    /// Iterate the operation definitions, in document order
    pub fn operations(&self) -> impl Iterator<Item = &Node<OperationDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
    }

    /// Iterate the fragment definitions, in document order
    pub fn fragments(&self) -> impl Iterator<Item = &Node<FragmentDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(_) => None,
            Definition::Fragment(fragment) => Some(fragment),
        })
    }

    /// Returns the first fragment definition with the given name, if any
    pub fn fragment_by_name(&self, name: &str) -> Option<&Node<FragmentDefinition>> {
        self.fragments().find(|fragment| fragment.name == name)
    }

    serialize_method!();
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Skip two not-useful indentation levels
        for def in &self.definitions {
            def.fmt(f)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl Definition {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Operation(_) => "OperationDefinition",
            Self::Fragment(_) => "FragmentDefinition",
        }
    }

    /// The operation name or fragment name, if any
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Operation(operation) => operation.name.as_ref(),
            Self::Fragment(fragment) => Some(&fragment.name),
        }
    }

    serialize_method!();
}

impl OperationDefinition {
    /// An operation of the given type with nothing in it yet
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            name: None,
            variables: Vec::new(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    serialize_method!();
}

impl FragmentDefinition {
    pub fn new(name: impl Into<Name>, type_condition: impl Into<NamedType>) -> Self {
        Self {
            name: name.into(),
            type_condition: type_condition.into(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    serialize_method!();
}

impl OperationType {
    /// Get the name of this operation type as it would appear in GraphQL source code.
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// The name given to an anonymous operation when one is needed,
    /// such as when declaring its first variable
    pub fn default_operation_name(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }
}

impl VariableDefinition {
    serialize_method!();
}

impl Type {
    /// Returns a new `Type::Named` with the given name
    pub fn new_named(name: impl Into<NamedType>) -> Self {
        Type::Named(name.into())
    }

    /// Returns this type made non-null, if it isn't already.
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            Type::NonNullNamed(_) => self,
            Type::NonNullList(_) => self,
        }
    }

    /// Returns a list type whose items are this type.
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }
}

impl From<&str> for Type {
    fn from(name: &str) -> Self {
        Type::new_named(name)
    }
}

impl From<String> for Type {
    fn from(name: String) -> Self {
        Type::Named(name)
    }
}

impl Directive {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Returns the value of the first argument with the given name, if any
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    serialize_method!();
}

impl Argument {
    pub fn new(name: impl Into<Name>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Node::new(value.into()),
        }
    }

    serialize_method!();
}

impl Selection {
    /// The response key of a field selection: its alias if it has one,
    /// its name otherwise. Spreads and inline fragments have none.
    pub fn response_key(&self) -> Option<&Name> {
        match self {
            Selection::Field(field) => Some(field.response_key()),
            Selection::FragmentSpread(_) | Selection::InlineFragment(_) => None,
        }
    }

    serialize_method!();
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(Node::new(field))
    }
}

impl From<FragmentSpread> for Selection {
    fn from(spread: FragmentSpread) -> Self {
        Selection::FragmentSpread(Node::new(spread))
    }
}

impl From<InlineFragment> for Selection {
    fn from(inline: InlineFragment) -> Self {
        Selection::InlineFragment(Node::new(inline))
    }
}

impl Field {
    /// A leaf field with the given name and no alias, arguments or directives
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    /// The key this field is identified by inside its selection set:
    /// the alias if there is one, the field name otherwise.
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    serialize_method!();
}

impl FragmentSpread {
    pub fn new(fragment_name: impl Into<Name>) -> Self {
        Self {
            fragment_name: fragment_name.into(),
            directives: Vec::new(),
        }
    }

    serialize_method!();
}

impl InlineFragment {
    pub fn new(type_condition: Option<NamedType>) -> Self {
        Self {
            type_condition,
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    serialize_method!();
}

impl Value {
    /// A symbolic enum value, such as `ASC` in `orderBy(direction: ASC)`
    pub fn enum_(name: impl Into<Name>) -> Self {
        Value::Enum(name.into())
    }

    /// A reference to the variable with the given name (without the `$`)
    pub fn variable(name: impl Into<Name>) -> Self {
        Value::Variable(name.into())
    }

    /// An input object value, preserving field order
    pub fn object(fields: impl IntoIterator<Item = (Name, Value)>) -> Self {
        Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, Node::new(value)))
                .collect(),
        )
    }

    /// The GraphQL type used for a variable declared with this value as its
    /// default but no explicit type. Composite and symbolic values have no
    /// inferable type, and a list infers one only when every element infers
    /// the same type.
    pub(crate) fn default_type(&self) -> Option<Type> {
        match self {
            Value::Null => Some(Type::new_named("NullValue")),
            Value::Int(_) => Some(Type::new_named("Integer")),
            Value::Float(_) => Some(Type::new_named("Float")),
            Value::Boolean(_) => Some(Type::new_named("Boolean")),
            Value::String(_) => Some(Type::new_named("String")),
            Value::List(items) => {
                let mut items = items.iter();
                let first = items.next()?.default_type()?;
                for item in items {
                    if item.default_type()? != first {
                        return None;
                    }
                }
                Some(first.non_null().list())
            }
            Value::Enum(_) | Value::Variable(_) | Value::Object(_) => None,
        }
    }

    serialize_method!();
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// A string starting with `$` becomes a reference to the variable named by
/// the rest of the string; anything else is a plain string value.
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        match value.strip_prefix('$') {
            Some(name) if !name.is_empty() => Value::Variable(name.into()),
            _ => Value::String(value.into()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::from(value.as_str())
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Value::List(
            values
                .into_iter()
                .map(|value| Node::new(value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dollar_strings_become_variables() {
        assert_eq!(Value::from("$id"), Value::Variable("id".into()));
        assert_eq!(Value::from("id"), Value::String("id".into()));
        // The explicit constructor takes the name without the sigil
        assert_eq!(Value::variable("id"), Value::from("$id"));
        // A bare dollar sign names no variable
        assert_eq!(Value::from("$"), Value::String("$".into()));
        assert_eq!(Value::from("price in $"), Value::String("price in $".into()));
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from(19), Value::Int(19));
        assert_eq!(Value::from(1.5), Value::Float(1.5.into()));
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::List(vec![Node::new(Value::Int(1)), Node::new(Value::Int(2))]),
        );
    }

    #[test]
    fn default_types_for_variable_declarations() {
        assert_eq!(Value::Null.default_type(), Some(Type::new_named("NullValue")));
        assert_eq!(
            Value::from(42).default_type(),
            Some(Type::new_named("Integer")),
        );
        assert_eq!(
            Value::from("hello").default_type(),
            Some(Type::new_named("String")),
        );
        assert_eq!(
            Value::from(vec!["a", "b"]).default_type(),
            Some(Type::new_named("String").non_null().list()),
        );
        assert_eq!(Value::from(Vec::<i32>::new()).default_type(), None);
        // Mixed element types have no unique element type
        assert_eq!(
            Value::from(vec![Value::Int(1), Value::from(2.5)]).default_type(),
            None,
        );
        assert_eq!(Value::enum_("ASC").default_type(), None);
        assert_eq!(Value::from("$id").default_type(), None);
    }
}
