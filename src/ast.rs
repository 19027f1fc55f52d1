/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Command(CommandNode),
    /// Two or more commands joined by `|`.
    Pipeline(Vec<CommandNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub name: String,
    pub args: Vec<String>,
    pub kind: CommandKind,
    pub redirect_mode: RedirectMode,
    /// Non-empty exactly when `redirect_mode` is not `None`.
    pub redirect_target: String,
}

impl CommandNode {
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, CommandKind::Builtin(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    None,
    StdoutTruncate,
    StdoutAppend,
    StderrTruncate,
    StderrAppend,
}

impl RedirectMode {
    pub fn is_append(self) -> bool {
        matches!(self, RedirectMode::StdoutAppend | RedirectMode::StderrAppend)
    }

    pub fn targets_stdout(self) -> bool {
        matches!(self, RedirectMode::StdoutTruncate | RedirectMode::StdoutAppend)
    }

    pub fn targets_stderr(self) -> bool {
        matches!(self, RedirectMode::StderrTruncate | RedirectMode::StderrAppend)
    }
}

/// Commands implemented inside the shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Exit,
    Type,
    Pwd,
    Cd,
    History,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Echo,
        Builtin::Exit,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
        Builtin::History,
    ];

    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "echo" => Some(Builtin::Echo),
            "exit" => Some(Builtin::Exit),
            "type" => Some(Builtin::Type),
            "pwd" => Some(Builtin::Pwd),
            "cd" => Some(Builtin::Cd),
            "history" => Some(Builtin::History),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
            Builtin::History => "history",
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|b| b.name())
    }
}
