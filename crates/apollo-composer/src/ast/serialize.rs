use super::*;
use std::fmt;
use std::fmt::Display;

/// Writes GraphQL syntax for a node and the subtree under it.
///
/// Obtained from the `serialize` method of any node type.
#[derive(Debug, Clone)]
pub struct Serialize<'a, T> {
    pub(crate) node: &'a T,
    pub(crate) config: Config<'a>,
}

#[derive(Debug, Clone)]
pub(crate) struct Config<'a> {
    indent_prefix: Option<&'a str>,
}

pub(crate) struct State<'config, 'fmt, 'fmt2> {
    config: Config<'config>,
    indent_level: usize,
    output: &'fmt mut fmt::Formatter<'fmt2>,
    /// Have we not written anything yet?
    output_empty: bool,
}

impl<'a, T> Serialize<'a, T> {
    /// Enable indentation and line breaks.
    ///
    /// `prefix` is repeated at the start of each line by the number of indentation levels.
    /// The default is `"  "`, two spaces.
    pub fn indent_prefix(mut self, prefix: &'a str) -> Self {
        self.config.indent_prefix = Some(prefix);
        self
    }

    /// Disable indentation and line breaks
    pub fn no_indent(mut self) -> Self {
        self.config.indent_prefix = None;
        self
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            indent_prefix: Some("  "),
        }
    }
}

macro_rules! display {
    ($state: expr, $e: expr) => {
        fmt::Display::fmt(&$e, $state.output)
    };
    ($state: expr, $($tt: tt)+) => {
        display!($state, format_args!($($tt)+))
    };
}

impl State<'_, '_, '_> {
    fn write(&mut self, str: &str) -> fmt::Result {
        self.output_empty = false;
        self.output.write_str(str)
    }

    fn indent(&mut self) -> fmt::Result {
        self.indent_level += 1;
        self.new_line_common(false)
    }

    fn indent_or_space(&mut self) -> fmt::Result {
        self.indent_level += 1;
        self.new_line_common(true)
    }

    fn dedent(&mut self) -> fmt::Result {
        self.indent_level -= 1; // checked underflow in debug mode
        self.new_line_common(false)
    }

    fn dedent_or_space(&mut self) -> fmt::Result {
        self.indent_level -= 1; // checked underflow in debug mode
        self.new_line_common(true)
    }

    fn new_line_or_space(&mut self) -> fmt::Result {
        self.new_line_common(true)
    }

    fn new_line_common(&mut self, space: bool) -> fmt::Result {
        if let Some(prefix) = self.config.indent_prefix {
            self.write("\n")?;
            for _ in 0..self.indent_level {
                self.write(prefix)?;
            }
        } else if space {
            self.write(" ")?
        }
        Ok(())
    }

    fn newlines_enabled(&self) -> bool {
        self.config.indent_prefix.is_some()
    }

    fn on_single_line<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let indent_prefix = self.config.indent_prefix.take();
        let result = f(self);
        self.config.indent_prefix = indent_prefix;
        result
    }
}

impl Document {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let mut definitions = self.definitions.iter();
        if let Some(first) = definitions.next() {
            first.serialize_impl(state)?;
            definitions.try_for_each(|def| {
                if state.newlines_enabled() {
                    // Empty line between top-level definitions
                    state.write("\n")?;
                }
                state.new_line_or_space()?;
                def.serialize_impl(state)
            })?;
            // Trailing newline
            if state.newlines_enabled() {
                state.write("\n")?;
            }
        }
        Ok(())
    }
}

impl Definition {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        match self {
            Definition::Operation(def) => def.serialize_impl(state),
            Definition::Fragment(def) => def.serialize_impl(state),
        }
    }
}

impl OperationDefinition {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        // Deconstruct to get a warning if we forget to serialize something
        let Self {
            operation_type,
            name,
            variables,
            directives,
            selection_set,
        } = self;
        // Only use shorthand when this is the first item.
        // If not, it might be following a `[lookahead != "{"]` grammar production
        let shorthand = state.output_empty
            && *operation_type == OperationType::Query
            && name.is_none()
            && variables.is_empty()
            && directives.is_empty();
        if !shorthand {
            state.write(operation_type.name())?;
            if let Some(name) = &name {
                state.write(" ")?;
                state.write(name)?;
            }
            if !variables.is_empty() {
                state.on_single_line(|state| {
                    comma_separated(state, "(", ")", variables, |state, var| {
                        var.serialize_impl(state)
                    })
                })?
            }
            serialize_directives(state, directives)?;
            state.write(" ")?;
        }
        curly_brackets_space_separated(state, selection_set, |state, sel| sel.serialize_impl(state))
    }
}

impl FragmentDefinition {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self {
            name,
            type_condition,
            directives,
            selection_set,
        } = self;
        display!(state, "fragment {} on {}", name, type_condition)?;
        serialize_directives(state, directives)?;
        state.write(" ")?;
        curly_brackets_space_separated(state, selection_set, |state, sel| sel.serialize_impl(state))
    }
}

impl VariableDefinition {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self {
            name,
            ty,
            default_value,
        } = self;
        state.write("$")?;
        state.write(name)?;
        state.write(": ")?;
        display!(state, ty)?;
        if let Some(value) = default_value {
            state.write(" = ")?;
            value.serialize_impl(state)?
        }
        Ok(())
    }
}

fn serialize_directives(state: &mut State<'_, '_, '_>, directives: &[Node<Directive>]) -> fmt::Result {
    for dir in directives {
        state.write(" ")?;
        dir.serialize_impl(state)?;
    }
    Ok(())
}

impl Directive {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self { name, arguments } = self;
        state.write("@")?;
        state.write(name)?;
        serialize_arguments(state, arguments)
    }
}

impl Argument {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        state.write(&self.name)?;
        state.write(": ")?;
        self.value.serialize_impl(state)
    }
}

fn serialize_arguments(state: &mut State<'_, '_, '_>, arguments: &[Node<Argument>]) -> fmt::Result {
    if !arguments.is_empty() {
        state.on_single_line(|state| {
            comma_separated(state, "(", ")", arguments, |state, argument| {
                argument.serialize_impl(state)
            })
        })?
    }
    Ok(())
}

impl Selection {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        match self {
            Selection::Field(x) => x.serialize_impl(state),
            Selection::FragmentSpread(x) => x.serialize_impl(state),
            Selection::InlineFragment(x) => x.serialize_impl(state),
        }
    }
}

impl Field {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        } = self;
        if let Some(alias) = alias {
            state.write(alias)?;
            state.write(": ")?;
        }
        state.write(name)?;
        serialize_arguments(state, arguments)?;
        serialize_directives(state, directives)?;
        if !selection_set.is_empty() {
            state.write(" ")?;
            curly_brackets_space_separated(state, selection_set, |state, sel| {
                sel.serialize_impl(state)
            })?
        }
        Ok(())
    }
}

impl FragmentSpread {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self {
            fragment_name,
            directives,
        } = self;
        state.write("...")?;
        state.write(fragment_name)?;
        serialize_directives(state, directives)
    }
}

impl InlineFragment {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        let Self {
            type_condition,
            directives,
            selection_set,
        } = self;
        if let Some(type_name) = type_condition {
            state.write("... on ")?;
            state.write(type_name)?;
        } else {
            state.write("...")?;
        }
        serialize_directives(state, directives)?;
        state.write(" ")?;
        curly_brackets_space_separated(state, selection_set, |state, sel| sel.serialize_impl(state))
    }
}

impl Value {
    fn serialize_impl(&self, state: &mut State<'_, '_, '_>) -> fmt::Result {
        match self {
            Value::Null => state.write("null"),
            Value::Boolean(true) => state.write("true"),
            Value::Boolean(false) => state.write("false"),
            Value::Enum(name) => state.write(name),
            Value::String(value) => serialize_string_value(state, value),
            Value::Variable(name) => display!(state, "${}", name),
            Value::Int(value) => display!(state, value),
            Value::Float(value) => {
                let text = value.to_string();
                state.write(&text)?;
                // The shortest representation of a whole number has no
                // fraction and would reparse as Int
                if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
                    state.write(".0")?;
                }
                Ok(())
            }
            Value::List(value) => comma_separated(state, "[", "]", value, |state, value| {
                value.serialize_impl(state)
            }),
            Value::Object(value) => {
                comma_separated(state, "{", "}", value, |state, (name, value)| {
                    state.write(name)?;
                    state.write(": ")?;
                    value.serialize_impl(state)
                })
            }
        }
    }
}

/// Example output: `[a, b, c]` or
///
/// ```text
/// [
///     a,
///     b,
///     c,
/// ]
/// ```
fn comma_separated<T>(
    state: &mut State<'_, '_, '_>,
    open: &str,
    close: &str,
    values: &[T],
    serialize_one: impl Fn(&mut State<'_, '_, '_>, &T) -> fmt::Result,
) -> fmt::Result {
    state.write(open)?;
    if let Some((first, rest)) = values.split_first() {
        state.indent()?;
        serialize_one(state, first)?;
        for value in rest {
            state.write(",")?;
            state.new_line_or_space()?;
            serialize_one(state, value)?;
        }
        // Trailing comma
        if state.newlines_enabled() {
            state.write(",")?;
        }
        state.dedent()?;
    }
    state.write(close)
}

/// Example output: `{ a b c }` or
///
/// ```text
/// {
///     a
///     b
///     c
/// }
/// ```
fn curly_brackets_space_separated<T>(
    state: &mut State<'_, '_, '_>,
    values: &[T],
    serialize_one: impl Fn(&mut State<'_, '_, '_>, &T) -> fmt::Result,
) -> fmt::Result {
    state.write("{")?;
    if let Some((first, rest)) = values.split_first() {
        state.indent_or_space()?;
        serialize_one(state, first)?;
        for value in rest {
            state.new_line_or_space()?;
            serialize_one(state, value)?;
        }
        state.dedent_or_space()?;
    }
    state.write("}")
}

fn serialize_string_value(state: &mut State<'_, '_, '_>, mut str: &str) -> fmt::Result {
    state.write("\"")?;
    loop {
        if let Some(i) = str.find(|c| (c < ' ' && c != '\t') || c == '"' || c == '\\') {
            let (without_escaping, rest) = str.split_at(i);
            state.write(without_escaping)?;
            // All characters that need escaping are in the ASCII range,
            // and so take a single byte in UTF-8.
            match rest.as_bytes()[0] {
                b'\x08' => state.write("\\b")?,
                b'\n' => state.write("\\n")?,
                b'\x0C' => state.write("\\f")?,
                b'\r' => state.write("\\r")?,
                b'"' => state.write("\\\"")?,
                b'\\' => state.write("\\\\")?,
                byte => display!(state, "\\u{:04X}", byte)?,
            }
            str = &rest[1..]
        } else {
            state.write(str)?;
            break;
        }
    }
    state.write("\"")
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => std::write!(f, "{name}"),
            Type::NonNullNamed(name) => std::write!(f, "{name}!"),
            Type::List(inner) => std::write!(f, "[{inner}]"),
            Type::NonNullList(inner) => std::write!(f, "[{inner}]!"),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

macro_rules! impl_display {
    ($($ty: path)+) => {
        $(
            /// Serialize to GraphQL syntax with the default configuration
            impl Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.serialize().fmt(f)
                }
            }

            /// Serialize to GraphQL syntax
            impl Display for Serialize<'_, $ty> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.node.serialize_impl(&mut State {
                        config: self.config.clone(),
                        indent_level: 0,
                        output: f,
                        output_empty: true,
                    })
                }
            }
        )+
    }
}

impl_display! {
    Document
    Definition
    OperationDefinition
    FragmentDefinition
    VariableDefinition
    Directive
    Argument
    Selection
    Field
    FragmentSpread
    InlineFragment
    Value
}

#[cfg(test)]
mod tests {
    use crate::ast::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn whole_floats_keep_their_decimal_point() {
        let doc = Document::parse("{ shelf(height: 2.0, depth: 0.5) }").unwrap();
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ shelf(height: 2.0, depth: 0.5) }",
        );
    }

    #[test]
    fn strings_are_escaped() {
        let doc = Document::parse(r#"{ search(term: "a \"b\" c\n") }"#).unwrap();
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            r#"{ search(term: "a \"b\" c\n") }"#,
        );
    }

    #[test]
    fn shorthand_is_only_used_for_a_leading_bare_query() {
        let doc = Document::parse("query { a } mutation { b }").unwrap();
        assert_eq!(
            doc.serialize().no_indent().to_string(),
            "{ a } mutation { b }",
        );
        let doc = Document::parse("query Q { a }").unwrap();
        assert_eq!(doc.serialize().no_indent().to_string(), "query Q { a }");
    }
}
