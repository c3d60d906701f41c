//! Unit tests for the registry, postfix conversion and tree building.

use rstest::{fixture, rstest};

use super::{Associativity, Parser, ParseNode};
use crate::errors::{ParseError, SymbolKind};
use crate::test_support::{expect_err, expect_ok, tokens, values};
use crate::token::TokenKind::{
    CloseParen, Colon, Comma, Function, Integer, Lambda, Literal, OpenParen, Operator,
};
use crate::token::{Token, TokenKind};

#[fixture]
fn arithmetic() -> Parser {
    let mut parser = Parser::new();
    parser.define_function("sin", 1);
    parser.define_function("max", 2);
    parser.define_function("volume", 3);
    parser.define_function("now", 0);
    parser.define_operator("^", 2, Associativity::Right, 5);
    parser.define_operator("*", 2, Associativity::Left, 5);
    parser.define_operator("/", 2, Associativity::Left, 5);
    parser.define_operator("+", 2, Associativity::Left, 4);
    parser.define_operator("-", 2, Associativity::Left, 4);
    parser
}

#[fixture]
fn boolean() -> Parser {
    let mut parser = Parser::new();
    parser.define_operator("NOT", 1, Associativity::None, 3);
    parser.define_operator("AND", 2, Associativity::Left, 2);
    parser.define_operator("OR", 2, Associativity::Left, 1);
    parser
}

fn postfix_values(parser: &Parser, input: Vec<Token>) -> Vec<String> {
    let postfix = expect_ok(parser.infix_to_postfix(input), "conversion should succeed");
    values(&postfix).into_iter().map(str::to_owned).collect()
}

fn tree(parser: &Parser, input: Vec<Token>) -> ParseNode {
    let postfix = expect_ok(parser.infix_to_postfix(input), "conversion should succeed");
    expect_ok(parser.postfix_to_tree(postfix), "tree should build")
}

fn child_value<'a>(node: &'a ParseNode, path: &[usize]) -> Option<&'a str> {
    path.iter()
        .try_fold(node, |current, &index| current.child(index))
        .map(|found| found.token().value())
}

#[rstest]
fn converts_arithmetic_with_right_associative_power(arithmetic: Parser) {
    // 3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3
    let input = tokens(&[
        ("3", Integer),
        ("+", Operator),
        ("4", Integer),
        ("*", Operator),
        ("2", Integer),
        ("/", Operator),
        ("(", OpenParen),
        ("1", Integer),
        ("-", Operator),
        ("5", Integer),
        (")", CloseParen),
        ("^", Operator),
        ("2", Integer),
        ("^", Operator),
        ("3", Integer),
    ]);
    assert_eq!(
        postfix_values(&arithmetic, input),
        ["3", "4", "2", "*", "1", "5", "-", "2", "3", "^", "^", "/", "+"]
    );
}

#[rstest]
fn converts_boolean_with_prefix_not(boolean: Parser) {
    // (A OR NOT B) AND C OR B
    let input = tokens(&[
        ("(", OpenParen),
        ("A", Literal),
        ("OR", Operator),
        ("NOT", Operator),
        ("B", Literal),
        (")", CloseParen),
        ("AND", Operator),
        ("C", Literal),
        ("OR", Operator),
        ("B", Literal),
    ]);
    assert_eq!(
        postfix_values(&boolean, input),
        ["A", "B", "NOT", "OR", "C", "AND", "B", "OR"]
    );
}

#[rstest]
fn emits_functions_after_their_arguments(arithmetic: Parser) {
    // max(sin(5*pi)+3, sin(5)+volume(3,2,4)/2)
    let input = tokens(&[
        ("max", Function),
        ("(", OpenParen),
        ("sin", Function),
        ("(", OpenParen),
        ("5", Integer),
        ("*", Operator),
        ("pi", Literal),
        (")", CloseParen),
        ("+", Operator),
        ("3", Integer),
        (",", Comma),
        ("sin", Function),
        ("(", OpenParen),
        ("5", Integer),
        (")", CloseParen),
        ("+", Operator),
        ("volume", Function),
        ("(", OpenParen),
        ("3", Integer),
        (",", Comma),
        ("2", Integer),
        (",", Comma),
        ("4", Integer),
        (")", CloseParen),
        ("/", Operator),
        ("2", Integer),
        (")", CloseParen),
    ]);
    let postfix = postfix_values(&arithmetic, input.clone());
    assert_eq!(
        postfix,
        [
            "5", "pi", "*", "sin", "3", "+", "5", "sin", "3", "2", "4", "volume", "2", "/", "+",
            "max",
        ]
    );
    let root = tree(&arithmetic, input);
    assert_eq!(root.token().value(), "max");
    assert_eq!(root.children().len(), 2);
}

#[rstest]
fn builds_nested_tree(arithmetic: Parser) {
    // sin ( max ( 2, 3 ) / 3 * pi )
    let input = tokens(&[
        ("sin", Function),
        ("(", OpenParen),
        ("max", Function),
        ("(", OpenParen),
        ("2", Integer),
        (",", Comma),
        ("3", Integer),
        (")", CloseParen),
        ("/", Operator),
        ("3", Integer),
        ("*", Operator),
        ("pi", Literal),
        (")", CloseParen),
    ]);
    let root = tree(&arithmetic, input);
    assert_eq!(root.token().value(), "sin");
    assert_eq!(child_value(&root, &[0]), Some("*"));
    assert_eq!(child_value(&root, &[0, 1]), Some("pi"));
    assert_eq!(child_value(&root, &[0, 0]), Some("/"));
    assert_eq!(child_value(&root, &[0, 0, 1]), Some("3"));
    assert_eq!(child_value(&root, &[0, 0, 0]), Some("max"));
    assert_eq!(child_value(&root, &[0, 0, 0, 0]), Some("2"));
    assert_eq!(child_value(&root, &[0, 0, 0, 1]), Some("3"));
    assert_eq!(root.depth(), 5);
}

#[rstest]
fn accepts_zero_argument_calls(arithmetic: Parser) {
    let input = tokens(&[("now", Function), ("(", OpenParen), (")", CloseParen)]);
    let root = tree(&arithmetic, input);
    assert_eq!(root.token().value(), "now");
    assert!(root.is_leaf());
}

#[rstest]
fn tree_postfix_round_trips(arithmetic: Parser) {
    let input = tokens(&[
        ("max", Function),
        ("(", OpenParen),
        ("1", Integer),
        ("-", Operator),
        ("2", Integer),
        (",", Comma),
        ("3", Integer),
        (")", CloseParen),
        ("^", Operator),
        ("2", Integer),
    ]);
    let postfix = expect_ok(arithmetic.infix_to_postfix(input), "conversion should succeed");
    let root = expect_ok(arithmetic.postfix_to_tree(postfix.clone()), "tree should build");
    assert_eq!(root.postfix(), Vec::from(postfix));
    let rebuilt = expect_ok(arithmetic.postfix_to_tree(root.postfix()), "rebuild");
    assert_eq!(rebuilt, root);
}

#[rstest]
fn trailing_operator_fails_at_tree_building(arithmetic: Parser) {
    let input = tokens(&[("1", Integer), ("+", Operator)]);
    let postfix = expect_ok(
        arithmetic.infix_to_postfix(input),
        "dangling operators are left to tree building",
    );
    let err = expect_err(arithmetic.postfix_to_tree(postfix), "tree must not build");
    assert_eq!(
        err,
        ParseError::ArityMismatch {
            symbol: "+".into(),
            expected: 2,
            found: 1,
        }
    );
}

#[rstest]
#[case::empty(Vec::new(), ParseError::EmptyExpression)]
#[case::two_operands(
    tokens(&[("1", Integer), ("2", Integer)]),
    ParseError::Malformed { remaining: 2 }
)]
fn reports_unreduced_streams(
    arithmetic: Parser,
    #[case] input: Vec<Token>,
    #[case] expected: ParseError,
) {
    let postfix = expect_ok(arithmetic.infix_to_postfix(input), "conversion should succeed");
    assert_eq!(arithmetic.postfix_to_tree(postfix), Err(expected));
}

#[rstest]
#[case::unmatched_close(tokens(&[("1", Integer), (")", CloseParen)]), "unmatched ')'")]
#[case::unclosed_group(tokens(&[("(", OpenParen), ("1", Integer)]), "unclosed '('")]
#[case::unclosed_call(tokens(&[("sin", Function), ("(", OpenParen), ("1", Integer)]), "unclosed '('")]
#[case::empty_group(tokens(&[("(", OpenParen), (")", CloseParen)]), "empty parentheses")]
#[case::comma_outside_call(
    tokens(&[("1", Integer), (",", Comma), ("2", Integer)]),
    "',' outside an argument list"
)]
#[case::comma_in_group(
    tokens(&[("(", OpenParen), ("1", Integer), (",", Comma), ("2", Integer), (")", CloseParen)]),
    "',' outside an argument list"
)]
#[case::leading_comma(
    tokens(&[("max", Function), ("(", OpenParen), (",", Comma), ("2", Integer), (")", CloseParen)]),
    "missing argument before ','"
)]
#[case::doubled_comma(
    tokens(&[
        ("max", Function), ("(", OpenParen), ("1", Integer), (",", Comma),
        (",", Comma), ("2", Integer), (")", CloseParen),
    ]),
    "missing argument before ','"
)]
#[case::trailing_comma(
    tokens(&[("sin", Function), ("(", OpenParen), ("1", Integer), (",", Comma), (")", CloseParen)]),
    "trailing ',' in argument list"
)]
#[case::function_without_call(tokens(&[("sin", Function), ("1", Integer)]), "function name must be followed by '('")]
#[case::function_at_end(tokens(&[("sin", Function)]), "function name must be followed by '('")]
fn rejects_structural_errors(
    arithmetic: Parser,
    #[case] input: Vec<Token>,
    #[case] expected_reason: &str,
) {
    let err = expect_err(arithmetic.infix_to_postfix(input), "conversion must fail");
    let ParseError::Structural { reason, .. } = err else {
        panic!("expected a structural error, got {err:?}");
    };
    assert_eq!(reason, expected_reason);
}

#[rstest]
#[case::too_few(tokens(&[("max", Function), ("(", OpenParen), ("1", Integer), (")", CloseParen)]), 1)]
#[case::too_many(
    tokens(&[
        ("sin", Function), ("(", OpenParen), ("1", Integer), (",", Comma),
        ("2", Integer), (")", CloseParen),
    ]),
    2
)]
#[case::none_for_unary(tokens(&[("sin", Function), ("(", OpenParen), (")", CloseParen)]), 0)]
fn checks_call_argument_counts(
    arithmetic: Parser,
    #[case] input: Vec<Token>,
    #[case] found: usize,
) {
    let err = expect_err(arithmetic.infix_to_postfix(input), "conversion must fail");
    assert!(
        matches!(err, ParseError::ArityMismatch { found: actual, .. } if actual == found),
        "unexpected error {err:?}"
    );
}

#[rstest]
#[case::operator(tokens(&[("1", Integer), ("%", Operator), ("2", Integer)]), "%", SymbolKind::Operator)]
#[case::function(tokens(&[("cos", Function), ("(", OpenParen), ("1", Integer), (")", CloseParen)]), "cos", SymbolKind::Function)]
fn rejects_unregistered_symbols(
    arithmetic: Parser,
    #[case] input: Vec<Token>,
    #[case] symbol: &str,
    #[case] kind: SymbolKind,
) {
    assert_eq!(
        arithmetic.infix_to_postfix(input),
        Err(ParseError::UnknownSymbol {
            symbol: symbol.to_owned(),
            kind,
        })
    );
}

#[test]
fn colon_is_confined_to_lambda_calls() {
    let mut parser = Parser::new();
    parser.define_function("any", 1);
    parser.define_function("group", 1);
    parser.define_operator(":", 2, Associativity::Left, 0);
    parser.define_operator("eq", 2, Associativity::Left, 3);

    let lambda = tokens(&[
        ("any", Lambda),
        ("(", OpenParen),
        ("d", Literal),
        (":", Colon),
        ("d", Literal),
        ("eq", Operator),
        ("1", Integer),
        (")", CloseParen),
    ]);
    let root = tree(&parser, lambda);
    assert_eq!(child_value(&root, &[0]), Some(":"));
    assert_eq!(child_value(&root, &[0, 1]), Some("eq"));

    let plain_call = tokens(&[
        ("group", Function),
        ("(", OpenParen),
        ("d", Literal),
        (":", Colon),
        ("d", Literal),
        (")", CloseParen),
    ]);
    let err = expect_err(parser.infix_to_postfix(plain_call), "colon outside lambda");
    assert!(matches!(err, ParseError::Structural { ref token, .. } if token == ":"));
}

#[test]
fn redefinition_replaces_and_returns_previous() {
    let mut parser = Parser::new();
    assert!(parser.define_operator("+", 2, Associativity::Left, 4).is_none());
    let previous = parser.define_operator("+", 2, Associativity::Right, 9);
    assert_eq!(previous.map(|def| def.precedence), Some(4));
    assert_eq!(parser.operator("+").map(|def| def.precedence), Some(9));

    assert!(parser.define_function("f", 1).is_none());
    assert_eq!(parser.define_function("f", 3).map(|def| def.arity), Some(1));
    assert_eq!(parser.function("f").map(|def| def.arity), Some(3));
    assert_eq!(parser.function_names().collect::<Vec<_>>(), ["f"]);
}

fn not_chain(length: usize) -> Vec<Token> {
    let mut input: Vec<Token> = (0..length).map(|_| Token::new("NOT", Operator)).collect();
    input.push(Token::new("A", Literal));
    input
}

#[rstest]
#[case::at_the_limit(Parser::DEFAULT_MAX_DEPTH - 1, true)]
#[case::one_past_the_limit(Parser::DEFAULT_MAX_DEPTH, false)]
fn enforces_default_depth_limit(boolean: Parser, #[case] length: usize, #[case] accepted: bool) {
    let postfix = expect_ok(
        boolean.infix_to_postfix(not_chain(length)),
        "prefix chains convert at any length",
    );
    let result = boolean.postfix_to_tree(postfix);
    if accepted {
        let root = expect_ok(result, "tree within the limit");
        assert_eq!(root.depth(), Parser::DEFAULT_MAX_DEPTH);
        assert_eq!(root.clone(), root);
    } else {
        assert_eq!(
            result,
            Err(ParseError::TooDeep {
                limit: Parser::DEFAULT_MAX_DEPTH
            })
        );
    }
}

#[rstest]
fn raised_limit_builds_deep_chains_iteratively(mut boolean: Parser) {
    let depth = 20_000;
    boolean.set_max_depth(depth + 1);
    let root = tree(&boolean, not_chain(depth));
    assert_eq!(root.depth(), depth + 1);
    assert_eq!(root.postfix().len(), depth + 1);
    assert_eq!(root.to_string().lines().count(), depth + 1);
}

#[test]
fn renders_indented_tree() {
    let root = ParseNode::new(
        Token::new("eq", TokenKind::Logical),
        vec![
            ParseNode::leaf(Token::new("Name", Literal)),
            ParseNode::leaf(Token::new("'Milk'", TokenKind::String)),
        ],
    );
    assert_eq!(
        root.to_string(),
        "eq (logical)\n  Name (literal)\n  'Milk' (string)\n"
    );
}
