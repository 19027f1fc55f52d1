use crate::ast::RedirectMode;

// Longest operators first so `2>>` is never read as `2>` followed by `>`.
const OPERATORS: [(&str, RedirectMode); 6] = [
    ("1>>", RedirectMode::StdoutAppend),
    ("2>>", RedirectMode::StderrAppend),
    (">>", RedirectMode::StdoutAppend),
    ("1>", RedirectMode::StdoutTruncate),
    ("2>", RedirectMode::StderrTruncate),
    (">", RedirectMode::StdoutTruncate),
];

/// Argument vector plus the single redirection that applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub argv: Vec<String>,
    pub mode: RedirectMode,
    pub target: String,
}

/// Find the first redirection operator in `tokens`, either standing alone
/// (`2> err.txt`) or attached to its target (`2>err.txt`).
///
/// Everything from the operator onwards is dropped from the argv; a missing
/// target yields an empty string.
pub fn resolve(tokens: &[String]) -> Resolved {
    for (idx, token) in tokens.iter().enumerate() {
        let Some((op, mode)) = OPERATORS.iter().find(|(op, _)| token.starts_with(op)) else {
            continue;
        };
        let target = if token.len() == op.len() {
            tokens.get(idx + 1).cloned().unwrap_or_default()
        } else {
            token[op.len()..].to_string()
        };
        return Resolved {
            argv: tokens[..idx].to_vec(),
            mode: *mode,
            target,
        };
    }

    Resolved {
        argv: tokens.to_vec(),
        mode: RedirectMode::None,
        target: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_operator() {
        let r = resolve(&toks(&["echo", "a", "b"]));
        assert_eq!(r.argv, toks(&["echo", "a", "b"]));
        assert_eq!(r.mode, RedirectMode::None);
        assert!(r.target.is_empty());
    }

    #[test]
    fn test_separated_operators() {
        let cases = [
            (">", RedirectMode::StdoutTruncate),
            ("1>", RedirectMode::StdoutTruncate),
            (">>", RedirectMode::StdoutAppend),
            ("1>>", RedirectMode::StdoutAppend),
            ("2>", RedirectMode::StderrTruncate),
            ("2>>", RedirectMode::StderrAppend),
        ];
        for (op, mode) in cases {
            let r = resolve(&toks(&["echo", "hi", op, "out.txt"]));
            assert_eq!(r.argv, toks(&["echo", "hi"]), "operator {}", op);
            assert_eq!(r.mode, mode, "operator {}", op);
            assert_eq!(r.target, "out.txt", "operator {}", op);
        }
    }

    #[test]
    fn test_attached_operator() {
        let r = resolve(&toks(&["ls", "nope", "2>>out.txt"]));
        assert_eq!(r.argv, toks(&["ls", "nope"]));
        assert_eq!(r.mode, RedirectMode::StderrAppend);
        assert_eq!(r.target, "out.txt");

        let r = resolve(&toks(&["echo", "x", ">/tmp/f"]));
        assert_eq!(r.mode, RedirectMode::StdoutTruncate);
        assert_eq!(r.target, "/tmp/f");
    }

    #[test]
    fn test_first_operator_wins() {
        let r = resolve(&toks(&["echo", "x", ">", "a.txt", "2>", "b.txt"]));
        assert_eq!(r.argv, toks(&["echo", "x"]));
        assert_eq!(r.mode, RedirectMode::StdoutTruncate);
        assert_eq!(r.target, "a.txt");
    }

    #[test]
    fn test_missing_target_is_empty() {
        let r = resolve(&toks(&["echo", "x", ">>"]));
        assert_eq!(r.mode, RedirectMode::StdoutAppend);
        assert_eq!(r.target, "");
    }
}
