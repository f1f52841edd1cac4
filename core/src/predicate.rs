//! Named patterns over a place or event.

use crate::{ParseError, ParseResult, Substitution, Term, Tuple, UnifyError, UnifyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A place or event name applied to argument terms, e.g. `balance(A, 100)`.
///
/// Serialized as its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Predicate {
    name: String,
    arguments: Vec<Term>,
}

impl Predicate {
    /// Create a predicate from a name and already-classified terms.
    pub fn new(name: impl Into<String>, arguments: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Create a predicate, classifying each argument text as a variable or constant.
    pub fn with_args<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            name,
            arguments.into_iter().map(|a| Term::parse(a.as_ref())).collect(),
        )
    }

    /// Parse predicate text: `name`, `name()` or `name(a1, ..., an)`.
    pub fn parse(text: &str) -> ParseResult<Self> {
        let trimmed = text.trim();
        let (name, rest) = match trimmed.find('(') {
            Some(open) => (trimmed[..open].trim(), Some(&trimmed[open + 1..])),
            None => (trimmed, None),
        };
        if name.is_empty() {
            return Err(ParseError::missing_name(text));
        }

        let arguments = match rest {
            None => Vec::new(),
            Some(rest) => {
                let close = find_closing_paren(rest)
                    .ok_or_else(|| ParseError::unclosed_arguments(text))?;
                let trailing = rest[close + 1..].trim();
                if !trailing.is_empty() {
                    return Err(ParseError::trailing_input(text, trailing));
                }
                let inner = &rest[..close];
                if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    let mut arguments = Vec::new();
                    for (position, part) in split_arguments(inner).into_iter().enumerate() {
                        if part.trim().is_empty() {
                            return Err(ParseError::empty_argument(text, position));
                        }
                        arguments.push(Term::parse(part));
                    }
                    arguments
                }
            }
        };

        Ok(Self::new(name, arguments))
    }

    /// The place or event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument terms.
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Returns true if any argument is a variable.
    pub fn has_variables(&self) -> bool {
        self.arguments.iter().any(Term::is_variable)
    }

    /// Distinct variables in first-occurrence order.
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for var in self.arguments.iter().filter_map(Term::as_variable) {
            if !seen.contains(&var) {
                seen.push(var);
            }
        }
        seen
    }

    /// Returns true if this ground pattern names exactly the given tuple.
    pub fn matches_exactly(&self, tuple: &Tuple) -> bool {
        self.arity() == tuple.arity()
            && self
                .arguments
                .iter()
                .zip(tuple.iter())
                .all(|(term, value)| matches!(term, Term::Constant(c) if c == value))
    }

    /// Unify this pattern with a concrete tuple.
    pub fn unify(&self, actual: &Tuple) -> UnifyResult<Substitution> {
        self.unify_with(actual, &Substitution::new())
    }

    /// Unify this pattern with a concrete tuple, extending existing bindings.
    pub fn unify_with(&self, actual: &Tuple, initial: &Substitution) -> UnifyResult<Substitution> {
        if self.arity() != actual.arity() {
            return Err(UnifyError::arity_mismatch(self.arity(), actual.arity()));
        }

        let mut bindings = initial.clone();
        for (position, (term, value)) in self.arguments.iter().zip(actual.iter()).enumerate() {
            match term {
                Term::Constant(expected) => {
                    if expected != value {
                        return Err(UnifyError::constant_mismatch(position, expected, value));
                    }
                }
                Term::Variable(var) => match bindings.binding(var) {
                    Some(bound) if bound != value => {
                        return Err(UnifyError::inconsistent_binding(var, bound, value));
                    }
                    Some(_) => {}
                    None => bindings.bind(var.clone(), value),
                },
            }
        }
        Ok(bindings)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            return f.write_str(&self.name);
        }
        let args: Vec<&str> = self.arguments.iter().map(Term::as_str).collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

impl FromStr for Predicate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Predicate {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Predicate> for String {
    fn from(predicate: Predicate) -> Self {
        predicate.to_string()
    }
}

/// Index of the `)` closing the argument list, honouring nesting and quotes.
fn find_closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Split on top-level commas.
fn split_arguments(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => depth = depth.saturating_sub(1),
            ',' if !in_quote && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pred(text: &str) -> Predicate {
        Predicate::parse(text).unwrap()
    }

    #[test]
    fn test_parse_forms() {
        let p = pred("balance(X, 100)");
        assert_eq!(p.name(), "balance");
        assert_eq!(p.arguments(), &[Term::var("X"), Term::constant("100")]);

        assert_eq!(pred("login").arity(), 0);
        assert_eq!(pred("login()").arity(), 0);
        assert_eq!(pred("f(g(a, b), \"x, y\")").arity(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Predicate::parse("(a)"), Err(ParseError::MissingName { .. })));
        assert!(matches!(Predicate::parse("f(a"), Err(ParseError::UnclosedArguments { .. })));
        assert!(matches!(Predicate::parse("f(a) x"), Err(ParseError::TrailingInput { .. })));
        assert!(matches!(
            Predicate::parse("f(a,,b)"),
            Err(ParseError::EmptyArgument { position: 1, .. })
        ));
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!(pred("balance( X ,100 )").to_string(), "balance(X, 100)");
        assert_eq!(pred("login()").to_string(), "login");
    }

    #[test]
    fn test_unify_binds_variables() {
        let s = pred("balance(X, Y)").unify(&Tuple::new(["acc1", "100"])).unwrap();
        assert_eq!(s.binding("X"), Some("acc1"));
        assert_eq!(s.binding("Y"), Some("100"));
    }

    #[test]
    fn test_unify_arity_mismatch() {
        let err = pred("balance(X, Y)").unify(&Tuple::new(["acc1"])).unwrap_err();
        assert_eq!(err, UnifyError::arity_mismatch(2, 1));
    }

    #[test]
    fn test_unify_constant_mismatch() {
        let err = pred("balance(acc1, Y)").unify(&Tuple::new(["acc2", "5"])).unwrap_err();
        assert!(matches!(err, UnifyError::ConstantMismatch { position: 0, .. }));
    }

    #[test]
    fn test_unify_repeated_variable_must_agree() {
        let p = pred("transfer(A, A)");
        assert!(p.unify(&Tuple::new(["x", "x"])).is_ok());
        let err = p.unify(&Tuple::new(["x", "y"])).unwrap_err();
        assert_eq!(err, UnifyError::inconsistent_binding("A", "x", "y"));
    }

    #[test]
    fn test_unify_then_substitute_reproduces_tuple() {
        let cases = [
            ("f(X, Y, Z)", vec!["1", "2", "3"]),
            ("f(X, X, k)", vec!["a", "a", "k"]),
            ("g", vec![]),
            ("h(c, V)", vec!["c", "v"]),
        ];
        for (pattern, values) in cases {
            let p = pred(pattern);
            let tuple = Tuple::new(values);
            let s = p.unify(&tuple).unwrap();
            assert_eq!(s.substitute(&p), tuple, "pattern {}", pattern);
        }
    }

    #[test]
    fn test_matches_exactly_requires_ground_pattern() {
        assert!(pred("withdraw(acc1)").matches_exactly(&Tuple::new(["acc1"])));
        assert!(!pred("withdraw(A)").matches_exactly(&Tuple::new(["acc1"])));
        assert!(pred("login").matches_exactly(&Tuple::empty()));
    }

    #[test]
    fn test_variables_are_distinct_in_order() {
        assert_eq!(pred("f(B, a, A, B)").variables(), vec!["B", "A"]);
    }

    #[test]
    fn test_serde_uses_text_form() {
        let p = pred("balance(X, 100)");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"balance(X, 100)\"");
        let back: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
