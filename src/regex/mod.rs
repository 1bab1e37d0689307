//! Regular expressions in fully parenthesized prefix notation.
//!
//! The grammar is
//!
//! ```text
//! expr    := literal | '.' '(' expr ',' expr ')' | '|' '(' expr ',' expr ')' | '*' '(' expr ')'
//! literal := a single letter | '_'
//! ```
//!
//! where `.` denotes concatenation, `|` union, `*` the Kleene star and `_` the empty word.
//! For example, `.(a,*(|(b,c)))` denotes the language of `a(b|c)*`.
//! Whitespace is ignored.

mod compile;

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
    str::FromStr,
};

use quickcheck::{Arbitrary, Gen};

use crate::{
    automaton::{Automaton, AutomatonError, Label, EPSILON_MARKER},
    options::Options,
};

pub use compile::Compiler;

const CONCAT: char = '.';
const UNION: char = '|';
const STAR: char = '*';
const OPERATORS: [char; 3] = [CONCAT, UNION, STAR];

/// The error type that can occur when validating, parsing or compiling regular expressions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    #[error("The expression is empty")]
    Empty,

    #[error("Unbalanced brackets: {0} opening and {1} closing")]
    Unbalanced(usize, usize),

    #[error("Expected {expected} commas but found {found}")]
    CommaMismatch { expected: usize, found: usize },

    #[error("Missing operator before the bracket at position {0}")]
    MissingOperator(usize),

    #[error("Invalid literal `{0}`, literals must be a single letter or `_`")]
    InvalidLiteral(String),

    #[error("Empty operand")]
    EmptyLiteral,

    #[error("Malformed expression `{0}`")]
    Malformed(String),

    #[error(transparent)]
    Construction(#[from] AutomatonError),
}

/// A regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    /// A single symbol, or the empty word.
    Literal(Label),
    Concat(Box<Regex>, Box<Regex>),
    Union(Box<Regex>, Box<Regex>),
    Star(Box<Regex>),
}

impl Regex {
    pub fn literal(c: char) -> Self {
        Regex::Literal(Label::from_char(c))
    }

    pub fn epsilon() -> Self {
        Regex::Literal(Label::Epsilon)
    }

    pub fn concat(left: Regex, right: Regex) -> Self {
        Regex::Concat(Box::new(left), Box::new(right))
    }

    pub fn union(left: Regex, right: Regex) -> Self {
        Regex::Union(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Regex) -> Self {
        Regex::Star(Box::new(inner))
    }

    /// The symbols occurring in the expression.
    pub fn alphabet(&self) -> BTreeSet<char> {
        match self {
            Regex::Literal(l) => l.symbol().into_iter().collect(),
            Regex::Concat(l, r) | Regex::Union(l, r) => {
                let mut alph = l.alphabet();
                alph.extend(r.alphabet());
                alph
            }
            Regex::Star(r) => r.alphabet(),
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Regex::Literal(l) => write!(f, "{}", l),
            Regex::Concat(l, r) => write!(f, "{}({},{})", CONCAT, l, r),
            Regex::Union(l, r) => write!(f, "{}({},{})", UNION, l, r),
            Regex::Star(r) => write!(f, "{}({})", STAR, r),
        }
    }
}

impl FromStr for Regex {
    type Err = RegexError;

    /// Validates and parses an expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        validate(&input)?;
        parse(&input)
    }
}

/// Checks the shape of an expression before it is parsed.
///
/// If the expression contains brackets, then the numbers of opening and closing brackets must be equal, the number of commas must equal the number of bracket pairs not belonging to a star, and every opening bracket must be immediately preceded by an operator.
/// An expression without brackets must be a single letter.
pub fn validate(input: &str) -> Result<(), RegexError> {
    let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(RegexError::Empty);
    }

    let count = |x: char| chars.iter().filter(|&&c| c == x).count();
    let opening = count('(');
    let closing = count(')');

    if opening == 0 && closing == 0 {
        return if chars.len() == 1 && chars[0].is_alphabetic() {
            Ok(())
        } else {
            Err(RegexError::InvalidLiteral(input.to_string()))
        };
    }

    if opening != closing {
        return Err(RegexError::Unbalanced(opening, closing));
    }

    let stars = count(STAR);
    let commas = count(',');
    let expected = opening.saturating_sub(stars);
    if stars > opening || expected != commas {
        return Err(RegexError::CommaMismatch {
            expected,
            found: commas,
        });
    }

    for (i, c) in chars.iter().enumerate() {
        if *c == '(' && (i == 0 || !OPERATORS.contains(&chars[i - 1])) {
            return Err(RegexError::MissingOperator(i));
        }
    }

    Ok(())
}

fn parse(input: &str) -> Result<Regex, RegexError> {
    if !input.contains('(') {
        return parse_literal(input);
    }

    let mut chars = input.chars();
    let op = chars.next().ok_or(RegexError::EmptyLiteral)?;
    if !OPERATORS.contains(&op) {
        return Err(RegexError::Malformed(input.to_string()));
    }
    let rest = chars.as_str();
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| RegexError::Malformed(input.to_string()))?;
    if !is_balanced(inner) {
        // The leading bracket is closed before the end of the expression
        return Err(RegexError::Malformed(input.to_string()));
    }

    match op {
        STAR => Ok(Regex::star(parse(inner)?)),
        _ => {
            let comma = middle_comma(inner).ok_or_else(|| RegexError::Malformed(input.to_string()))?;
            let left = parse(&inner[..comma])?;
            let right = parse(&inner[comma + 1..])?;
            if op == CONCAT {
                Ok(Regex::concat(left, right))
            } else {
                Ok(Regex::union(left, right))
            }
        }
    }
}

fn parse_literal(input: &str) -> Result<Regex, RegexError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(RegexError::EmptyLiteral),
        (Some(c), None) if c == EPSILON_MARKER || c.is_alphabetic() => Ok(Regex::literal(c)),
        _ => Err(RegexError::InvalidLiteral(input.to_string())),
    }
}

/// Returns the byte position of the first comma that is not nested in brackets.
fn middle_comma(inner: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_balanced(s: &str) -> bool {
    let mut depth = 0i64;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Parses and compiles an expression into an automaton.
/// Nothing is constructed if the expression is invalid.
pub fn compile(input: &str, options: &Options) -> Result<Automaton, RegexError> {
    let re: Regex = input.parse()?;
    log::debug!("Compiling {}", re);
    Compiler::new(options).compile(&re)
}

/* Arbitrary */

const ARBITRARY_LITERALS: [char; 4] = ['a', 'b', 'c', EPSILON_MARKER];
const ARBITRARY_DEPTH: usize = 3;

fn arbitrary_with_depth(g: &mut Gen, depth: usize) -> Regex {
    let literal = Regex::literal(*g.choose(&ARBITRARY_LITERALS).unwrap());
    if depth == 0 {
        return literal;
    }
    match g.choose(&[0, 1, 2, 3]).unwrap() {
        0 => literal,
        1 => Regex::concat(arbitrary_with_depth(g, depth - 1), arbitrary_with_depth(g, depth - 1)),
        2 => Regex::union(arbitrary_with_depth(g, depth - 1), arbitrary_with_depth(g, depth - 1)),
        _ => Regex::star(arbitrary_with_depth(g, depth - 1)),
    }
}

impl Arbitrary for Regex {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_with_depth(g, ARBITRARY_DEPTH)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Regex::Literal(_) => quickcheck::empty_shrinker(),
            Regex::Concat(l, r) | Regex::Union(l, r) => Box::new(vec![*l.clone(), *r.clone()].into_iter()),
            Regex::Star(r) => quickcheck::single_shrinker(*r.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_single_letter() {
        assert!(validate("a").is_ok());
        assert_eq!(validate("ab"), Err(RegexError::InvalidLiteral("ab".to_string())));
        assert_eq!(validate("_"), Err(RegexError::InvalidLiteral("_".to_string())));
        assert_eq!(validate(""), Err(RegexError::Empty));
    }

    #[test]
    fn validate_unbalanced() {
        assert_eq!(validate(".(a,b"), Err(RegexError::Unbalanced(1, 0)));
    }

    #[test]
    fn validate_comma_count() {
        assert_eq!(
            validate(".(a,b,c)"),
            Err(RegexError::CommaMismatch {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            validate("*(a,b)"),
            Err(RegexError::CommaMismatch {
                expected: 0,
                found: 1
            })
        );
    }

    #[test]
    fn validate_missing_operator() {
        assert_eq!(validate("(a,b)"), Err(RegexError::MissingOperator(0)));
        assert_eq!(validate(".(a,b(c,d))"), Err(RegexError::MissingOperator(5)));
    }

    #[test]
    fn validate_nested() {
        assert!(validate("|(.(a,b),*(c))").is_ok());
        assert!(validate(".(a, *(_))").is_ok());
    }

    #[test]
    fn parse_nested() {
        let re: Regex = "|(.(a,b),*(c))".parse().unwrap();
        assert_eq!(
            re,
            Regex::union(
                Regex::concat(Regex::literal('a'), Regex::literal('b')),
                Regex::star(Regex::literal('c'))
            )
        );
    }

    #[test]
    fn parse_nested_left_operand_with_comma() {
        let re: Regex = ".(|(a,b),c)".parse().unwrap();
        assert_eq!(
            re,
            Regex::concat(
                Regex::union(Regex::literal('a'), Regex::literal('b')),
                Regex::literal('c')
            )
        );
    }

    #[test]
    fn parse_epsilon_literal() {
        let re: Regex = "|(a,_)".parse().unwrap();
        assert_eq!(re, Regex::union(Regex::literal('a'), Regex::epsilon()));
    }

    #[test]
    fn parse_ignores_whitespace() {
        let re: Regex = " . ( a , b ) ".parse().unwrap();
        assert_eq!(re, Regex::concat(Regex::literal('a'), Regex::literal('b')));
    }

    #[test]
    fn parse_rejects_blank_operand() {
        assert_eq!(".(,a)".parse::<Regex>(), Err(RegexError::EmptyLiteral));
    }

    #[test]
    fn parse_rejects_long_literal() {
        assert_eq!(
            ".(ab,c)".parse::<Regex>(),
            Err(RegexError::InvalidLiteral("ab".to_string()))
        );
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert!(matches!(
            ".(a,b)|(c,d)".parse::<Regex>(),
            Err(RegexError::Malformed(_))
        ));
    }

    #[test]
    fn alphabet_excludes_epsilon() {
        let re: Regex = "|(.(a,_),*(c))".parse().unwrap();
        assert_eq!(re.alphabet().into_iter().collect::<String>(), "ac");
    }

    #[test]
    fn compile_rejects_invalid_without_automaton() {
        assert!(compile("|(a)", &Options::default()).is_err());
    }
}
