//! Algebraic properties every operation is expected to keep.

use apollo_composer::Document;
use apollo_composer::FieldOptions;
use apollo_composer::Path;
use pretty_assertions::assert_eq;

const SAMPLES: &[&str] = &[
    "{ user { id name } }",
    "query Q($id: ID!, $labels: [String!] = [\"a\"]) { get(id: $id) { name } }",
    "subscription Watch { events(after: 1.5) { kind payload { data } } }",
    "query { pet { ... on Dog { barkVolume } ... { name } ...Common } } fragment Common on Pet { id }",
    "mutation M @audited(level: HIGH) { delete(where: { id: 3, force: true }) }",
];

#[test]
fn serialization_reparses_to_an_equal_document() {
    for sample in SAMPLES {
        let document = Document::parse(sample).unwrap();
        let indented = Document::parse(&document.to_string()).unwrap();
        assert_eq!(indented, document, "indented round trip of {sample:?}");
        let compact = document.serialize().no_indent().to_string();
        assert_eq!(
            Document::parse(&compact).unwrap(),
            document,
            "compact round trip of {sample:?}",
        );
    }
}

#[test]
fn removals_are_idempotent() {
    let document = Document::parse(
        "query Q($id: ID!) { apple(kind: \"fuji\", ripe: true) { seeds } ...Basket }
         fragment Basket on Query { pear }",
    )
    .unwrap();

    let once = document.remove_field("apple", &Path::new());
    assert_eq!(once.remove_field("apple", &Path::new()), once);

    let once = document.remove_argument("kind", &Path::from("apple"));
    assert_eq!(once.remove_argument("kind", &Path::from("apple")), once);

    let once = document.remove_variable("id");
    assert_eq!(once.remove_variable("id"), once);

    let once = document.remove_fragment("Basket");
    assert_eq!(once.remove_fragment("Basket"), once);
}

#[test]
fn additions_on_disjoint_paths_commute() {
    let base = Document::parse("{ left right }").unwrap();
    let into_left = FieldOptions::new().path(Path::from("left"));
    let into_right = FieldOptions::new().path(Path::from("right"));

    let left_first = base
        .add_field("a", &into_left)
        .unwrap()
        .add_field("b", &into_right)
        .unwrap();
    let right_first = base
        .add_field("b", &into_right)
        .unwrap()
        .add_field("a", &into_left)
        .unwrap();
    assert_eq!(left_first, right_first);
}

#[test]
fn merging_with_an_empty_document_changes_nothing() {
    let document = Document::parse(
        "query Q($id: ID!) { user(id: $id) { id } }
         fragment F on User { name }",
    )
    .unwrap();
    let empty = Document::new();
    assert_eq!(document.merge(&empty), document);
    assert_eq!(empty.merge(&document), document);
}

#[test]
fn merging_a_document_with_itself_deduplicates_it() {
    let document = Document::parse("query { user { id } user { name } }").unwrap();
    let expected = Document::parse("query { user { id name } }").unwrap();
    assert_eq!(document.merge(&document), expected);
}

#[test]
fn typename_injection_is_idempotent() {
    let document = Document::parse("{ apple { foo bar { baz } } }").unwrap();
    let once = document.inject_typenames();
    assert_eq!(once.inject_typenames(), once);
}

#[test]
fn variable_inlining_is_idempotent() {
    let document =
        Document::parse("query Q($id: ID!, $tags: [String!]) { get(id: $id, tags: $tags) }")
            .unwrap();
    let bindings = [("id", vec![4, 2]), ("tags", vec![7])];
    let once = document.inline_variables(bindings.clone());
    assert_eq!(once.inline_variables(bindings), once);
}

#[test]
fn inlining_leaves_no_fragment_definitions_or_resolvable_spreads() {
    let document = Document::parse(
        "query { a { ...X } b { ...Y } }
         fragment X on A { one ...Y }
         fragment Y on B { two }",
    )
    .unwrap();
    let inlined = document.inline_fragments();
    assert_eq!(inlined.fragments().count(), 0);
    assert_eq!(
        inlined.serialize().no_indent().to_string(),
        "{ a { one two } b { two } }",
    );
}
