//! Pretty-printed serializer output, pinned with expect-test.

use apollo_composer::build;
use apollo_composer::Document;
use apollo_composer::FieldOptions;
use apollo_composer::Op;
use apollo_composer::Subfield;
use apollo_composer::VariableOptions;
use expect_test::expect;

#[test]
fn built_documents_print_with_default_indentation() {
    let document = build([
        Op::Variable {
            name: "id".into(),
            options: VariableOptions::new().ty("ID"),
        },
        Op::Field {
            name: "user".into(),
            options: FieldOptions::new()
                .argument("id", "$id")
                .field("name")
                .field(Subfield::new("friends").options(FieldOptions::new().field("id"))),
        },
        Op::OperationName {
            name: "GetUser".into(),
        },
    ])
    .unwrap();
    let expected = expect![[r#"
        query GetUser($id: ID!) {
          user(id: $id) {
            name
            friends {
              id
            }
          }
        }
    "#]];
    expected.assert_eq(&document.to_string());
}

#[test]
fn injected_typenames_print_in_place() {
    let document = Document::parse("query { pet { name ... on Dog { barkVolume } } }")
        .unwrap()
        .inject_typenames();
    let expected = expect![[r#"
        {
          pet {
            name
            ... on Dog {
              barkVolume
              __typename
            }
            __typename
          }
          __typename
        }
    "#]];
    expected.assert_eq(&document.to_string());
}

#[test]
fn merged_documents_print_with_a_blank_line_between_definitions() {
    let a = Document::parse("query { user { id } }").unwrap();
    let b = Document::parse("mutation { createUser { id } }").unwrap();
    let expected = expect![[r#"
        {
          user {
            id
          }
        }

        mutation {
          createUser {
            id
          }
        }
    "#]];
    expected.assert_eq(&a.merge(&b).to_string());
}
