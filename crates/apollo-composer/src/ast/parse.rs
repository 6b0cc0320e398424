use super::*;
use crate::Error;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;

/// Configuration for parsing an input string in GraphQL syntax into a
/// [`Document`]
#[derive(Debug, Default)]
pub struct Parser {
    recursion_limit: Option<usize>,
    token_limit: Option<usize>,
}

impl Parser {
    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(&mut self, value: usize) -> &mut Self {
        self.recursion_limit = Some(value);
        self
    }

    /// Configure the limit on the number of tokens to parse.
    /// If an input document is too big, parsing will be aborted.
    /// By default, there is no limit.
    pub fn token_limit(&mut self, value: usize) -> &mut Self {
        self.token_limit = Some(value);
        self
    }

    /// Parse `input` into a document.
    ///
    /// The underlying parser is fault-tolerant and collects syntax errors
    /// instead of stopping at the first one; any error fails the whole parse
    /// here, with every parser message carried verbatim in
    /// [`Error::Syntax`].
    pub fn parse(&self, input: &str) -> Result<Document, Error> {
        let mut parser = apollo_parser::Parser::new(input);
        if let Some(value) = self.recursion_limit {
            parser = parser.recursion_limit(value)
        }
        if let Some(value) = self.token_limit {
            parser = parser.token_limit(value)
        }
        let tree = parser.parse();
        let mut messages = tree.errors().map(|err| err.message()).peekable();
        if messages.peek().is_some() {
            return Err(Error::Syntax {
                message: messages.collect::<Vec<_>>().join("\n"),
            });
        }
        Document::from_cst(tree.document())
    }
}

impl Document {
    pub(crate) fn from_cst(document: cst::Document) -> Result<Self, Error> {
        let mut definitions = Vec::new();
        for def in document.definitions() {
            match &def {
                cst::Definition::OperationDefinition(def) => {
                    if let Some(def) = def.convert()? {
                        definitions.push(Definition::Operation(Node::new(def)))
                    }
                }
                cst::Definition::FragmentDefinition(def) => {
                    if let Some(def) = def.convert()? {
                        definitions.push(Definition::Fragment(Node::new(def)))
                    }
                }
                other => {
                    return Err(Error::TypeSystemDefinition {
                        kind: type_system_kind(other),
                    })
                }
            }
        }
        Ok(Self { definitions })
    }
}

fn type_system_kind(definition: &cst::Definition) -> &'static str {
    use cst::Definition as C;
    match definition {
        C::OperationDefinition(_) | C::FragmentDefinition(_) => "executable definition",
        C::DirectiveDefinition(_) => "directive definition",
        C::SchemaDefinition(_) => "schema definition",
        C::ScalarTypeDefinition(_) => "scalar type definition",
        C::ObjectTypeDefinition(_) => "object type definition",
        C::InterfaceTypeDefinition(_) => "interface type definition",
        C::UnionTypeDefinition(_) => "union type definition",
        C::EnumTypeDefinition(_) => "enum type definition",
        C::InputObjectTypeDefinition(_) => "input object type definition",
        C::SchemaExtension(_) => "schema extension",
        C::ScalarTypeExtension(_) => "scalar type extension",
        C::ObjectTypeExtension(_) => "object type extension",
        C::InterfaceTypeExtension(_) => "interface type extension",
        C::UnionTypeExtension(_) => "union type extension",
        C::EnumTypeExtension(_) => "enum type extension",
        C::InputObjectTypeExtension(_) => "input object type extension",
    }
}

/// Similar to `TryFrom`. The outer `Result` carries real conversion
/// failures; the `Option` tolerates CST nodes left incomplete by an aborted
/// parse, which [`Parser::parse`] has already turned into syntax errors.
trait Convert {
    type Target;
    fn convert(&self) -> Result<Option<Self::Target>, Error>;
}

/// Unwrap a converted sub-node, skipping the enclosing node when the
/// sub-node was incomplete
macro_rules! required {
    ($e: expr) => {
        match $e {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

fn collect<C, T>(iter: impl IntoIterator<Item = C>) -> Result<Vec<Node<T>>, Error>
where
    C: Convert<Target = T>,
{
    let mut items = Vec::new();
    for value in iter {
        if let Some(node) = value.convert()? {
            items.push(Node::new(node))
        }
    }
    Ok(items)
}

fn collect_opt<C1, C2, T, F, I>(opt: Option<C1>, children: F) -> Result<Vec<Node<T>>, Error>
where
    F: FnOnce(C1) -> I,
    I: IntoIterator<Item = C2>,
    C2: Convert<Target = T>,
{
    match opt {
        Some(cst) => collect(children(cst)),
        None => Ok(Vec::new()),
    }
}

impl<T: Convert> Convert for Option<T> {
    type Target = Option<T::Target>;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        match self {
            Some(inner) => match inner.convert()? {
                Some(target) => Ok(Some(Some(target))),
                // The sub-node was present but broken: skip the enclosing node
                None => Ok(None),
            },
            None => Ok(Some(None)),
        }
    }
}

impl Convert for cst::OperationDefinition {
    type Target = OperationDefinition;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let operation_type = match self.operation_type() {
            Some(ty) => required!(ty.convert()?),
            None => OperationType::Query,
        };
        Ok(Some(Self::Target {
            operation_type,
            name: required!(self.name().convert()?),
            variables: collect_opt(self.variable_definitions(), |x| x.variable_definitions())?,
            directives: collect_opt(self.directives(), |x| x.directives())?,
            selection_set: required!(required!(self.selection_set()).convert()?),
        }))
    }
}

impl Convert for cst::FragmentDefinition {
    type Target = FragmentDefinition;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let fragment_name = required!(self.fragment_name());
        Ok(Some(Self::Target {
            name: required!(required!(fragment_name.name()).convert()?),
            type_condition: required!(required!(self.type_condition()).convert()?),
            directives: collect_opt(self.directives(), |x| x.directives())?,
            selection_set: required!(required!(self.selection_set()).convert()?),
        }))
    }
}

impl Convert for cst::TypeCondition {
    type Target = NamedType;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let named_type = required!(self.named_type());
        required!(named_type.name()).convert()
    }
}

impl Convert for cst::OperationType {
    type Target = OperationType;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        Ok(if self.query_token().is_some() {
            Some(OperationType::Query)
        } else if self.mutation_token().is_some() {
            Some(OperationType::Mutation)
        } else if self.subscription_token().is_some() {
            Some(OperationType::Subscription)
        } else {
            None
        })
    }
}

impl Convert for cst::VariableDefinition {
    type Target = VariableDefinition;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let default_value = match self.default_value() {
            Some(default) => {
                let value = required!(default.value());
                Some(Node::new(required!(value.convert()?)))
            }
            None => None,
        };
        let variable = required!(self.variable());
        Ok(Some(Self::Target {
            name: required!(required!(variable.name()).convert()?),
            ty: required!(required!(self.ty()).convert()?),
            default_value,
        }))
    }
}

impl Convert for cst::Type {
    type Target = Type;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        use cst::Type as C;
        Ok(match self {
            C::NamedType(name) => Some(Type::Named(required!(required!(name.name()).convert()?))),
            C::ListType(inner) => {
                let item = required!(required!(inner.ty()).convert()?);
                Some(Type::List(Box::new(item)))
            }
            C::NonNullType(inner) => {
                if let Some(named) = inner.named_type() {
                    Some(Type::NonNullNamed(required!(
                        required!(named.name()).convert()?
                    )))
                } else if let Some(list) = inner.list_type() {
                    let item = required!(required!(list.ty()).convert()?);
                    Some(Type::NonNullList(Box::new(item)))
                } else {
                    None
                }
            }
        })
    }
}

impl Convert for cst::Directive {
    type Target = Directive;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        Ok(Some(Self::Target {
            name: required!(required!(self.name()).convert()?),
            arguments: collect_opt(self.arguments(), |x| x.arguments())?,
        }))
    }
}

impl Convert for cst::Argument {
    type Target = Argument;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let value = required!(self.value());
        Ok(Some(Self::Target {
            name: required!(required!(self.name()).convert()?),
            value: Node::new(required!(value.convert()?)),
        }))
    }
}

impl Convert for cst::SelectionSet {
    type Target = Vec<Selection>;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let mut selections = Vec::new();
        for selection in self.selections() {
            if let Some(selection) = selection.convert()? {
                selections.push(selection)
            }
        }
        Ok(Some(selections))
    }
}

impl Convert for cst::Selection {
    type Target = Selection;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        use cst::Selection as C;
        Ok(match self {
            C::Field(x) => x.convert()?.map(|field| Selection::Field(Node::new(field))),
            C::FragmentSpread(x) => x
                .convert()?
                .map(|spread| Selection::FragmentSpread(Node::new(spread))),
            C::InlineFragment(x) => x
                .convert()?
                .map(|inline| Selection::InlineFragment(Node::new(inline))),
        })
    }
}

impl Convert for cst::Field {
    type Target = Field;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        Ok(Some(Self::Target {
            alias: required!(self.alias().convert()?),
            name: required!(required!(self.name()).convert()?),
            arguments: collect_opt(self.arguments(), |x| x.arguments())?,
            directives: collect_opt(self.directives(), |x| x.directives())?,
            // Use an empty Vec for a field without sub-selections
            selection_set: required!(self.selection_set().convert()?).unwrap_or_default(),
        }))
    }
}

impl Convert for cst::FragmentSpread {
    type Target = FragmentSpread;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let fragment_name = required!(self.fragment_name());
        Ok(Some(Self::Target {
            fragment_name: required!(required!(fragment_name.name()).convert()?),
            directives: collect_opt(self.directives(), |x| x.directives())?,
        }))
    }
}

impl Convert for cst::InlineFragment {
    type Target = InlineFragment;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        Ok(Some(Self::Target {
            type_condition: required!(self.type_condition().convert()?),
            directives: collect_opt(self.directives(), |x| x.directives())?,
            selection_set: required!(required!(self.selection_set()).convert()?),
        }))
    }
}

impl Convert for cst::Value {
    type Target = Value;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        use cst::Value as C;
        Ok(match self {
            C::Variable(v) => required!(v.name()).convert()?.map(Value::Variable),
            C::StringValue(v) => Some(Value::String(String::from(v))),
            C::FloatValue(v) => match f64::try_from(v) {
                Ok(float) => Some(Value::Float(float.into())),
                Err(_) => None,
            },
            C::IntValue(v) => match i32::try_from(v) {
                Ok(int) => Some(Value::Int(int)),
                Err(_) => {
                    let token = required!(v.syntax().first_token());
                    return Err(Error::IntOverflow {
                        text: token.text().to_string(),
                    });
                }
            },
            C::BooleanValue(v) => match bool::try_from(v) {
                Ok(boolean) => Some(Value::Boolean(boolean)),
                Err(_) => None,
            },
            C::NullValue(_) => Some(Value::Null),
            C::EnumValue(v) => required!(v.name()).convert()?.map(Value::Enum),
            C::ListValue(v) => Some(Value::List(collect(v.values())?)),
            C::ObjectValue(v) => {
                let mut fields = Vec::new();
                for field in v.object_fields() {
                    if let Some(field) = field.convert()? {
                        fields.push(field)
                    }
                }
                Some(Value::Object(fields))
            }
        })
    }
}

impl Convert for cst::ObjectField {
    type Target = (Name, Node<Value>);

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        let name = required!(required!(self.name()).convert()?);
        let value = required!(required!(self.value()).convert()?);
        Ok(Some((name, Node::new(value))))
    }
}

impl Convert for cst::Alias {
    type Target = Name;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        required!(self.name()).convert()
    }
}

impl Convert for cst::Name {
    type Target = Name;

    fn convert(&self) -> Result<Option<Self::Target>, Error> {
        Ok(Some(self.text().as_str().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn syntax_errors_fail_the_parse() {
        let err = Document::parse("query {{").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn type_system_definitions_are_rejected() {
        let err = Document::parse("type Query { name: String }").unwrap_err();
        assert_eq!(
            err,
            Error::TypeSystemDefinition {
                kind: "object type definition"
            },
        );
    }

    #[test]
    fn int_literals_are_32_bit() {
        let err = Document::parse("{ user(id: 4294967296) }").unwrap_err();
        assert_eq!(
            err,
            Error::IntOverflow {
                text: "4294967296".into()
            },
        );
    }

    #[test]
    fn values_round_trip_through_the_cst() {
        let doc = Document::parse(
            r#"{ all(ids: [1, 2], opts: { depth: 2.5, mode: FAST, q: "x", none: null, on: true, ref: $r }) }"#,
        )
        .unwrap();
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            r#"{ all(ids: [1, 2], opts: {depth: 2.5, mode: FAST, q: "x", none: null, on: true, ref: $r}) }"#,
        );
    }
}
