//! Concrete syntax tree tests

use ion_element::text::{
    build_forest, forest_tokens, parse, tokenize, SyntaxTree, TreeError, COMMA_MISSING, NOT_VALID_ION,
    UNEXPECTED_DELIMITER,
};
use ion_element::IonType;

fn parse_lossless(input: &str) -> Vec<SyntaxTree<'_>> {
    let forest = parse(input).unwrap();
    let text: String = forest_tokens(&forest).map(|t| t.content).collect();
    assert_eq!(text, input);
    assert_eq!(forest_tokens(&forest).count(), tokenize(input).len());
    forest
}

fn values<'t, 'a>(nodes: &'t [SyntaxTree<'a>]) -> Vec<&'t SyntaxTree<'a>> {
    nodes.iter().filter(|node| node.is_value()).collect()
}

fn messages<'a>(forest: &'a [SyntaxTree]) -> Vec<&'a str> {
    forest
        .iter()
        .flat_map(SyntaxTree::syntax_errors)
        .map(|node| match node {
            SyntaxTree::SyntaxError { message, .. } => *message,
            _ => unreachable!(),
        })
        .collect()
}

#[test]
fn test_lossless() {
    for input in [
        "",
        "   ",
        "[1, 2, 3]",
        "{a:1,b:2}",
        "a::b::{ c: [d, 'e'::(f g)], 'h i': \"j\" } // tail",
        "(a (b (c)) d) /* x */ [[[]]]",
        "'''a''' '''b''' {{ aGk= }} {{ '''c''' }}",
        "[1 2] {a 1, b:, c: d e} ] , : :: \\ null.bogus x::",
        "2020-01-01T00:00Z 1.5 1e3 0x1F -0b11 12d0",
        "{a:{b:1}}",
        "{a:{}}",
        "[{a:{b:{}}}]",
        "{a:{{aGk=}}}",
        "}} {{",
    ] {
        parse_lossless(input);
    }
}

#[test]
fn test_list() {
    let forest = parse_lossless("[1, 2, 3]");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].ion_type(), Some(IonType::List));
    let items = values(forest[0].children());
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.ion_type() == Some(IonType::Int)));
    assert_eq!(items[1].text(), "2");
}

#[test]
fn test_struct() {
    let forest = parse_lossless("{a:1,b:2}");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].ion_type(), Some(IonType::Struct));

    let fields: Vec<&SyntaxTree> = forest[0]
        .children()
        .iter()
        .filter(|node| matches!(node, SyntaxTree::Field { .. }))
        .collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].field_name().map(|t| t.content), Some("a"));
    assert_eq!(fields[1].field_name().map(|t| t.content), Some("b"));
    assert_eq!(fields[1].field_value().map(SyntaxTree::text), Some("2".to_string()));
}

#[test]
fn test_nested_struct() {
    let forest = parse_lossless("{a:1,b:{c:{d:2}}}");
    assert_eq!(forest.len(), 1);
    assert!(messages(&forest).is_empty());

    let b = forest[0]
        .children()
        .iter()
        .find(|node| node.field_name().map(|t| t.content) == Some("b"))
        .and_then(SyntaxTree::field_value)
        .unwrap();
    assert_eq!(b.ion_type(), Some(IonType::Struct));
    assert_eq!(b.text(), "{c:{d:2}}");

    let forest = parse_lossless("[{a:{b:1}}, {}]");
    let items = values(forest[0].children());
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.ion_type() == Some(IonType::Struct)));

    let forest = parse_lossless("{a:{{aGk=}}}");
    let a = forest[0].children().iter().find_map(SyntaxTree::field_value).unwrap();
    assert_eq!(a.ion_type(), Some(IonType::Blob));
}

#[test]
fn test_comma_missing() {
    let forest = parse_lossless("[1 2]");
    assert_eq!(messages(&forest), [COMMA_MISSING]);

    let list = &forest[0];
    let error = list.children().iter().find(|node| !node.syntax_errors().is_empty()).unwrap();
    assert_eq!(error.text(), "2");
    assert_eq!(error.position().map(|p| p.column), Some(4));

    // sexps need no commas
    let forest = parse_lossless("(1 2)");
    assert!(messages(&forest).is_empty());
}

#[test]
fn test_annotations() {
    let forest = parse_lossless("a::b::c");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].ion_type(), Some(IonType::Symbol));
    assert_eq!(forest[0].annotations().map(|t| t.content).collect::<Vec<_>>(), ["a", "b"]);

    // a symbol not followed by `::` is a value of its own
    let forest = parse_lossless("(a b::c)");
    let items = values(forest[0].children());
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].annotations().count(), 0);
    assert_eq!(items[0].text(), "a");
    assert_eq!(items[1].annotations().map(|t| t.content).collect::<Vec<_>>(), ["b"]);

    let forest = parse_lossless("x :: /* c */ y :: {}");
    assert_eq!(values(&forest).len(), 1);
    assert_eq!(forest[0].annotations().count(), 2);
    assert_eq!(forest[0].ion_type(), Some(IonType::Struct));
}

#[test]
fn test_error_nodes() {
    let forest = parse_lossless("1 ] \\ 2");
    assert_eq!(messages(&forest), [UNEXPECTED_DELIMITER, NOT_VALID_ION]);
    assert_eq!(values(&forest).len(), 2);
}

#[test]
fn test_unbalanced() {
    match parse("{a: [1, 2}") {
        Err(TreeError::UnbalancedDelimiter { delimiter, position }) => {
            assert_eq!(delimiter, '{');
            assert_eq!((position.line, position.column, position.offset), (1, 1, 0));
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let err = parse("ok\n  (x").unwrap_err();
    assert_eq!(err.to_string(), "unbalanced delimiter '(' at line 2, column 3");
}

#[test]
fn test_build_forest_from_tokens() {
    let tokens = tokenize("[a] (b)");
    let forest = build_forest(&tokens).unwrap();
    assert_eq!(
        forest.iter().filter_map(SyntaxTree::ion_type).collect::<Vec<_>>(),
        [IonType::List, IonType::Sexp]
    );
}

#[test]
fn test_to_sexp_string() {
    let forest = parse_lossless("[x]");
    assert_eq!(forest[0].to_sexp_string(), "(list\n  \"[\"\n  (symbol\n    \"x\")\n  \"]\")");
}
