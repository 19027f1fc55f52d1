use crate::ast::Builtin;
use crate::executor::PathResolver;

/// Source of command-name completions.
pub trait Completer {
    /// Sorted, de-duplicated names starting with `prefix`.
    fn candidates(&self, prefix: &str) -> Vec<String>;
}

/// Completes builtin names and executables found on `PATH`.
pub struct CommandCompleter {
    resolver: PathResolver,
}

impl CommandCompleter {
    pub fn new(resolver: PathResolver) -> Self {
        CommandCompleter { resolver }
    }
}

impl Completer for CommandCompleter {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = Builtin::names()
            .filter(|name| name.starts_with(prefix))
            .map(|name| name.to_string())
            .collect();
        names.extend(self.resolver.executables_with_prefix(prefix));
        names.sort();
        names.dedup();
        names
    }
}

/// Longest prefix shared by every candidate.
pub fn common_prefix(candidates: &[String]) -> &str {
    let Some(first) = candidates.first() else {
        return "";
    };
    let mut len = first.len();
    for other in &candidates[1..] {
        len = first
            .bytes()
            .zip(other.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    // Candidates are ASCII in practice; stay on a char boundary regardless.
    while !first.is_char_boundary(len) {
        len -= 1;
    }
    &first[..len]
}
