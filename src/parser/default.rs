use crate::ast::{AstNode, Builtin, CommandKind, CommandNode, RedirectMode};
use crate::parser::redirect;
use crate::parser::{ParseError, Parser};

pub const PIPE: &str = "|";

pub struct DefaultParser<'a> {
    tokens: &'a [String],
}

impl<'a> DefaultParser<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    /// Split on `|` tokens; every segment must hold at least one word.
    fn segments(&self) -> Result<Vec<&'a [String]>, ParseError> {
        let mut segments = Vec::new();
        for (idx, segment) in self.tokens.split(|t| t == PIPE).enumerate() {
            if segment.is_empty() {
                return Err(ParseError::EmptyPipelineSegment { index: idx });
            }
            segments.push(segment);
        }
        Ok(segments)
    }
}

impl<'a> Parser for DefaultParser<'a> {
    fn parse(&mut self) -> Result<AstNode, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut commands = self
            .segments()?
            .into_iter()
            .map(parse_command)
            .collect::<Result<Vec<_>, _>>()?;

        if commands.len() == 1 {
            Ok(AstNode::Command(commands.remove(0)))
        } else {
            Ok(AstNode::Pipeline(commands))
        }
    }
}

/// Build one command from the words of a single pipeline segment.
pub fn parse_command(tokens: &[String]) -> Result<CommandNode, ParseError> {
    let resolved = redirect::resolve(tokens);
    if resolved.mode != RedirectMode::None && resolved.target.is_empty() {
        return Err(ParseError::MissingRedirectTarget);
    }

    let mut argv = resolved.argv.into_iter();
    let name = argv.next().ok_or(ParseError::MissingCommand)?;
    let kind = match Builtin::from_name(&name) {
        Some(builtin) => CommandKind::Builtin(builtin),
        None => CommandKind::External,
    };

    Ok(CommandNode {
        name,
        args: argv.collect(),
        kind,
        redirect_mode: resolved.mode,
        redirect_target: resolved.target,
    })
}
