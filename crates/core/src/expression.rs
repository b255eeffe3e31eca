//! Sort-key expression parser.
//!
//! Turns the terse third positional argument (`"<= 2024-01-01"`, `"SHIP*"`,
//! `"between A B"`, ...) into a [`SortCondition`]. Parsing never fails:
//! input that matches no form becomes an implicit equality.

/// A parsed sort-key condition with its raw (untyped) operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    Eq(String),
    Lt(String),
    Le(String),
    Gt(String),
    Ge(String),
    Between(String, String),
    BeginsWith(String),
}

type Matcher = fn(&str) -> Option<SortCondition>;

/// Matchers in precedence order. The first one that matches wins.
const MATCHERS: &[Matcher] = &[
    less_or_equal,
    greater_or_equal,
    less_than,
    greater_than,
    equal,
    begins_with,
    trailing_star,
    between,
];

/// Parses a sort-key expression.
pub fn parse_sort_expr(input: &str) -> SortCondition {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(input))
        .unwrap_or_else(|| SortCondition::Eq(input.trim().to_string()))
}

fn less_or_equal(input: &str) -> Option<SortCondition> {
    leading_marker(input, "<=").map(SortCondition::Le)
}

fn greater_or_equal(input: &str) -> Option<SortCondition> {
    leading_marker(input, ">=").map(SortCondition::Ge)
}

fn less_than(input: &str) -> Option<SortCondition> {
    leading_marker(input, "<").map(SortCondition::Lt)
}

fn greater_than(input: &str) -> Option<SortCondition> {
    leading_marker(input, ">").map(SortCondition::Gt)
}

fn equal(input: &str) -> Option<SortCondition> {
    leading_marker(input, "=").map(SortCondition::Eq)
}

/// Matches `marker` at the start of the input, allowing whitespace around and
/// between the marker characters. Yields the trimmed, non-empty remainder.
fn leading_marker(input: &str, marker: &str) -> Option<String> {
    let mut rest = input.trim_start();
    for c in marker.chars() {
        rest = rest.strip_prefix(c)?.trim_start();
    }
    let operand = rest.trim_end();
    (!operand.is_empty()).then(|| operand.to_string())
}

/// `begins_with(X)`, `begins_with (X )` or `begins_with X`, anywhere in the input.
fn begins_with(input: &str) -> Option<SortCondition> {
    input.match_indices("begins_with").find_map(|(at, keyword)| {
        let rest = input[at + keyword.len()..].trim_start();
        let rest = rest.strip_prefix('(').unwrap_or(rest).trim_start();
        let operand = rest
            .split(|c: char| c == ')' || c.is_whitespace())
            .next()
            .filter(|token| !token.is_empty())?;
        Some(SortCondition::BeginsWith(operand.to_string()))
    })
}

/// `X*`: the first non-empty run of text followed by a `*`.
///
/// Leading whitespace is dropped but trailing whitespace is kept, so
/// `"ABCDEF *"` yields `"ABCDEF "`. A run made only of whitespace keeps its
/// last character.
fn trailing_star(input: &str) -> Option<SortCondition> {
    let (head, _) = input.rsplit_once('*')?;
    let run = head.split('*').find(|run| !run.is_empty())?;
    let operand = match run.trim_start_matches(|c: char| c.is_ascii_whitespace()) {
        "" => run.char_indices().last().map(|(i, _)| &run[i..])?,
        trimmed => trimmed,
    };
    Some(SortCondition::BeginsWith(operand.to_string()))
}

/// `between X Y`, anywhere in the input, each bound a single token.
fn between(input: &str) -> Option<SortCondition> {
    input.match_indices("between").find_map(|(at, keyword)| {
        let rest = &input[at + keyword.len()..];
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let mut tokens = rest.split_whitespace();
        let low = tokens.next()?;
        let high = tokens.next()?;
        Some(SortCondition::Between(low.to_string(), high.to_string()))
    })
}
