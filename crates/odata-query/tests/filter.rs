//! Behavioural tests for `$filter` parsing through the public API.
#![expect(clippy::expect_used, reason = "tests assert successful parses")]

use odata_query::{
    ErrorClass, ParseError, ParseNode, Parser, QueryError, TokenKind, filter_grammar,
    parse_filter_string,
};
use rstest::rstest;

fn parse(input: &str) -> ParseNode {
    parse_filter_string(input)
        .expect("filter should parse")
        .into_tree()
}

fn at<'a>(node: &'a ParseNode, path: &[usize]) -> &'a ParseNode {
    path.iter().fold(node, |current, &index| {
        current.child(index).expect("child should exist")
    })
}

fn value_at<'a>(node: &'a ParseNode, path: &[usize]) -> &'a str {
    at(node, path).token().value()
}

#[test]
fn negated_group_has_not_at_the_root() {
    let root = parse("not (A eq B)");
    assert_eq!(root.token().value(), "not");
    assert_eq!(root.children().len(), 1);
    assert_eq!(value_at(&root, &[0]), "eq");
}

#[test]
fn navigation_path_binds_tighter_than_comparison() {
    let root = parse("Address/City eq 'Redmond'");
    assert_eq!(root.token().value(), "eq");
    assert_eq!(value_at(&root, &[0]), "/");
    assert_eq!(value_at(&root, &[0, 0]), "Address");
    assert_eq!(value_at(&root, &[0, 1]), "City");
    assert_eq!(value_at(&root, &[1]), "'Redmond'");
}

#[test]
fn lambda_variable_binds_the_whole_predicate() {
    let root = parse("Tags/any(var:var/Key eq 'Site' and var/Value eq 'London')");
    assert_eq!(root.token().value(), "/");
    assert_eq!(value_at(&root, &[0]), "Tags");
    assert_eq!(value_at(&root, &[1]), "any");
    assert_eq!(at(&root, &[1]).token().kind(), TokenKind::Lambda);
    assert_eq!(value_at(&root, &[1, 0]), ":");
    assert_eq!(value_at(&root, &[1, 0, 0]), "var");
    assert_eq!(value_at(&root, &[1, 0, 1]), "and");
    assert_eq!(value_at(&root, &[1, 0, 1, 0]), "eq");
    assert_eq!(value_at(&root, &[1, 0, 1, 1]), "eq");
}

#[test]
fn function_name_is_only_a_function_before_a_call() {
    let root = parse("time(StartTime) eq time");
    assert_eq!(root.token().value(), "eq");
    let call = at(&root, &[0]);
    assert_eq!(call.token().kind(), TokenKind::Function);
    assert_eq!(call.children().len(), 1);
    let word = at(&root, &[1]);
    assert_eq!(word.token().kind(), TokenKind::Literal);
    assert!(word.is_leaf());
}

#[test]
fn datetime_comparison_keeps_the_full_literal() {
    let grammar = filter_grammar().expect("grammar should build");
    let tokens = grammar
        .tokenize("time lt 2015-10-14T23:30:00.104+02:00")
        .expect("input should tokenize");
    let pairs: Vec<_> = tokens.iter().map(|t| (t.value(), t.kind())).collect();
    assert_eq!(
        pairs,
        [
            ("time", TokenKind::Literal),
            ("lt", TokenKind::Logical),
            ("2015-10-14T23:30:00.104+02:00", TokenKind::DateTime),
        ]
    );
}

#[test]
fn geography_literal_is_a_prefixed_operand() {
    let root = parse("geo.intersects(Location, geography'POLYGON((0 0, 1 0, 1 1, 0 0))')");
    assert_eq!(root.token().value(), "geo.intersects");
    assert_eq!(value_at(&root, &[1]), "geography");
    assert_eq!(at(&root, &[1]).token().kind(), TokenKind::Geography);
    assert_eq!(value_at(&root, &[1, 0]), "'POLYGON((0 0, 1 0, 1 1, 0 0))'");
}

#[rstest]
#[case::and_over_or("A eq 1 or B eq 2 and C eq 3", "or", &[1], "and")]
#[case::arithmetic_over_comparison("Price mul 2 add 1 gt 10", "gt", &[0, 0], "mul")]
#[case::not_over_comparison("not Active eq true", "eq", &[0], "not")]
#[case::left_associative_sub("A sub B sub C", "sub", &[0], "sub")]
#[case::has_over_equality("Style has Flag eq true", "eq", &[0], "has")]
fn respects_operator_precedence(
    #[case] input: &str,
    #[case] root: &str,
    #[case] path: &[usize],
    #[case] nested: &str,
) {
    let tree = parse(input);
    assert_eq!(tree.token().value(), root);
    assert_eq!(value_at(&tree, path), nested);
}

#[rstest]
#[case::two_arguments("substring(Name, 1) eq 'ilk'")]
#[case::zero_arguments("Created lt now()")]
#[case::nested_calls("tolower(trim(Name)) eq 'milk'")]
#[case::guid("Id eq 01234567-89ab-cdef-0123-456789abcdef")]
#[case::null("Manager eq null")]
#[case::escaped_quote("LastName eq 'O''Neil'")]
#[case::nested_lambda("Orders/all(o:o/Lines/any(l:l/Qty gt 1))")]
fn accepts_odata_expressions(#[case] input: &str) {
    assert!(parse_filter_string(input).is_ok(), "`{input}` should parse");
}

#[test]
fn reparsing_yields_equal_trees() {
    let input = "contains(Name, 'milk') and Price le 2.55 or not Discontinued";
    assert_eq!(parse(input), parse(input));
}

#[test]
fn trailing_operator_is_an_arity_mismatch() {
    let err = parse_filter_string("Price add").expect_err("dangling operator");
    assert!(matches!(
        err,
        QueryError::Parse(ParseError::ArityMismatch { ref symbol, expected: 2, found: 1 })
            if symbol == "add"
    ));
}

#[rstest]
#[case::lex("Price lt #5")]
#[case::unbalanced("(Price lt 5")]
#[case::arity("startswith(Name) eq true")]
#[case::disconnected("Price 5")]
#[case::empty("")]
#[case::colon_outside_lambda("A:B")]
#[case::unknown_function_call("frobnicate(Name)")]
fn malformed_filters_are_bad_requests(#[case] input: &str) {
    let err = parse_filter_string(input).expect_err("filter must be rejected");
    assert_eq!(err.class(), ErrorClass::BadRequest, "{input}: {err}");
}

#[rstest]
#[case::spaces("   ")]
#[case::mixed_whitespace(" \t\n ")]
fn whitespace_only_filter_is_empty(#[case] input: &str) {
    let err = parse_filter_string(input).expect_err("nothing to parse");
    assert_eq!(err.as_parse_error(), Some(&ParseError::EmptyExpression));
}

#[test]
fn over_deep_filter_is_rejected_before_a_tree_exists() {
    let input = format!("{}A", "not ".repeat(200_000));
    let err = parse_filter_string(&input).expect_err("nesting is bounded");
    assert!(err.is_bad_request());
    assert!(matches!(
        err.as_parse_error(),
        Some(ParseError::TooDeep { limit }) if *limit == Parser::DEFAULT_MAX_DEPTH
    ));
}

#[test]
fn filter_within_the_depth_limit_clones_and_compares() {
    let input = format!("{}A", "not ".repeat(Parser::DEFAULT_MAX_DEPTH - 1));
    let root = parse(&input);
    assert_eq!(root.depth(), Parser::DEFAULT_MAX_DEPTH);
    assert_eq!(root.clone(), root);
}

#[test]
fn shared_grammar_is_usable_across_threads() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| scope.spawn(move || parse_filter_string(&format!("Price gt {n}")).is_ok()))
            .collect();
        for handle in handles {
            assert!(handle.join().expect("worker should not panic"));
        }
    });
}

#[test]
fn renders_tree_for_inspection() {
    let rendered = parse("Price lt 5").to_string();
    assert_eq!(rendered, "lt (logical)\n  Price (literal)\n  5 (integer)\n");
}
