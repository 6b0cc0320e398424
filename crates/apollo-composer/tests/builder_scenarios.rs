//! End-to-end composition flows, each asserting the canonical single-line
//! serialization of the result.

use apollo_composer::ast::OperationType;
use apollo_composer::build;
use apollo_composer::Document;
use apollo_composer::FieldOptions;
use apollo_composer::Op;
use apollo_composer::Path;
use apollo_composer::VariableOptions;
use indoc::indoc;
use pretty_assertions::assert_eq;
use unindent::unindent;

fn compact(document: &Document) -> String {
    document.serialize().no_indent().to_string()
}

#[test]
fn named_query_grown_field_by_field() {
    let document = build([
        Op::OperationName {
            name: "contact".into(),
        },
        Op::Field {
            name: "user".into(),
            options: FieldOptions::new(),
        },
        Op::Field {
            name: "name".into(),
            options: FieldOptions::new().path(Path::from("user")),
        },
        Op::Field {
            name: "email".into(),
            options: FieldOptions::new().path(Path::from("user")),
        },
    ])
    .unwrap();
    assert_eq!(compact(&document), "query contact { user { name email } }");
    assert_eq!(
        document.to_string(),
        indoc! {"
            query contact {
              user {
                name
                email
              }
            }
        "},
    );
}

#[test]
fn parsed_query_extended_and_retyped() {
    let document = Document::parse("query { user(id: 19) { id } }").unwrap();
    let document = document
        .add_field(
            "mailbox_size",
            &FieldOptions::new().path(Path::from("user")),
        )
        .unwrap()
        .set_operation_type(OperationType::Subscription);
    assert_eq!(
        compact(&document),
        "subscription { user(id: 19) { id mailbox_size } }",
    );
    assert_eq!(
        document.to_string(),
        unindent(
            "
            subscription {
              user(id: 19) {
                id
                mailbox_size
              }
            }
            ",
        ),
    );
}

#[test]
fn fields_removed_at_the_root_and_below() {
    let document = Document::parse("query { apple { foo bar baz } banana }").unwrap();
    let document = document
        .remove_field("banana", &Path::new())
        .remove_field("baz", &Path::from("apple"));
    assert_eq!(compact(&document), "{ apple { foo bar } }");
}

#[test]
fn merged_queries_unify_their_fields() {
    let a = Document::parse("query { user { id } }").unwrap();
    let b = Document::parse("query { user { name } }").unwrap();
    assert_eq!(compact(&a.merge(&b)), "{ user { id name } }");
}

#[test]
fn merging_a_query_and_a_mutation_keeps_both() {
    let a = Document::parse("query { user { id } }").unwrap();
    let b = Document::parse("mutation { createUser { id } }").unwrap();
    let merged = a.merge(&b);
    assert_eq!(merged.definitions.len(), 2);
    assert_eq!(
        compact(&merged),
        "{ user { id } } mutation { createUser { id } }",
    );
}

#[test]
fn typenames_injected_at_every_level() {
    let document = Document::parse("query { apple { foo bar { baz } } }").unwrap();
    assert_eq!(
        compact(&document.inject_typenames()),
        "{ apple { foo bar { baz __typename } __typename } __typename }",
    );
}

#[test]
fn variable_declaration_spread_across_builder_ops() {
    let document = build([
        Op::Variable {
            name: "id".into(),
            options: VariableOptions::new().ty("ID"),
        },
        Op::Field {
            name: "user".into(),
            options: FieldOptions::new().argument("id", "$id"),
        },
        Op::Field {
            name: "name".into(),
            options: FieldOptions::new().path(Path::from("user")),
        },
        Op::OperationName {
            name: "GetUser".into(),
        },
    ])
    .unwrap();
    assert_eq!(
        compact(&document),
        "query GetUser($id: ID!) { user(id: $id) { name } }",
    );
}

#[test]
fn parsed_variables_inlined_as_literals() {
    let document = Document::parse("query Q($id: ID!) { get(id: $id) { name } }").unwrap();
    let document = document.inline_variables([("id", 42)]);
    assert_eq!(compact(&document), "query Q { get(id: 42) { name } }");
}

#[test]
fn fragments_defined_spread_and_inlined() {
    let document = build([
        Op::Fragment {
            name: "Contact".into(),
            type_condition: "User".into(),
            fields: vec!["name".into(), "email".into()],
        },
        Op::Field {
            name: "user".into(),
            options: FieldOptions::new(),
        },
        Op::SpreadFragment {
            name: "Contact".into(),
            path: Path::from("user"),
        },
    ])
    .unwrap();
    assert_eq!(
        compact(&document),
        "{ user { ...Contact } } fragment Contact on User { name email }",
    );
    assert_eq!(
        compact(&document.inline_fragments()),
        "{ user { name email } }",
    );
}

#[test]
fn inline_fragments_addressed_by_type_condition() {
    let document = build([
        Op::Field {
            name: "pet".into(),
            options: FieldOptions::new(),
        },
        Op::InlineFragment {
            type_condition: Some("Dog".into()),
            path: Path::from("pet"),
            fields: vec!["barkVolume".into()],
        },
        Op::Field {
            name: "name".into(),
            options: FieldOptions::new().path(Path::from("pet").on_type("Dog")),
        },
    ])
    .unwrap();
    assert_eq!(
        compact(&document),
        "{ pet { ... on Dog { barkVolume name } } }",
    );
}
