pub mod default;
pub mod redirect;

use std::fmt;
use crate::ast::AstNode;

pub trait Parser {
    fn parse(&mut self) -> Result<AstNode, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyInput,
    /// Leading, trailing or doubled `|`.
    EmptyPipelineSegment {
        index: usize,
    },
    MissingRedirectTarget,
    MissingCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Input is empty"),
            ParseError::EmptyPipelineSegment { index } => {
                write!(f, "syntax error near unexpected token '|' (empty pipeline segment {})", index + 1)
            }
            ParseError::MissingRedirectTarget => write!(f, "syntax error: missing redirection target"),
            ParseError::MissingCommand => write!(f, "syntax error: missing command name"),
        }
    }
}

impl std::error::Error for ParseError {}
