use std::fmt;
use std::io;
use crate::config::ConfigError;
use crate::executor::ExecError;
use crate::lexer::LexError;
use crate::parser::ParseError;

/// Anything that can go wrong handling one input line.
#[derive(Debug)]
pub enum ShellError {
    Lex(LexError),
    Parse(ParseError),
    Exec(ExecError),
    Config(ConfigError),
    Io(io::Error),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Lex(e) => write!(f, "syntax error: {}", e),
            ShellError::Parse(e) => write!(f, "{}", e),
            ShellError::Exec(e) => write!(f, "{}", e),
            ShellError::Config(e) => write!(f, "config error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Lex(e) => Some(e),
            ShellError::Parse(e) => Some(e),
            ShellError::Exec(e) => Some(e),
            ShellError::Config(e) => Some(e),
            ShellError::Io(e) => Some(e),
        }
    }
}

impl From<LexError> for ShellError {
    fn from(e: LexError) -> Self {
        ShellError::Lex(e)
    }
}

impl From<ParseError> for ShellError {
    fn from(e: ParseError) -> Self {
        ShellError::Parse(e)
    }
}

impl From<ExecError> for ShellError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Io(e) => ShellError::Io(e),
            other => ShellError::Exec(other),
        }
    }
}

impl From<ConfigError> for ShellError {
    fn from(e: ConfigError) -> Self {
        ShellError::Config(e)
    }
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> Self {
        ShellError::Io(e)
    }
}
