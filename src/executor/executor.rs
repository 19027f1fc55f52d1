use std::{io, fmt};
use crate::ast::AstNode;
use crate::session::Session;

pub type ExecStatus = Result<ExecOutcome, ExecError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Finished with an exit status; the shell keeps reading lines.
    Code(i32),
    /// The `exit` builtin asked the shell to terminate.
    Exit(i32),
}

impl ExecOutcome {
    pub fn code(self) -> i32 {
        match self {
            ExecOutcome::Code(c) | ExecOutcome::Exit(c) => c,
        }
    }
}

#[derive(Debug)]
pub enum ExecError {
    CommandNotFound(String),
    Io(io::Error),
    InvalidArgument(String),
    PipelineError(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::CommandNotFound(cmd) => write!(f, "{}: command not found", cmd),
            ExecError::Io(e) => write!(f, "IO error: {}", e),
            ExecError::InvalidArgument(msg) => write!(f, "{}", msg),
            ExecError::PipelineError(msg) => write!(f, "Pipeline error: {}", msg),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

pub trait Executor {
    fn exec(&mut self, node: &AstNode, session: &mut Session) -> ExecStatus;
}
