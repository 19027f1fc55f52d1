use std::io;
use crate::ast::{AstNode, CommandKind, CommandNode};
use crate::executor::{ExecError, ExecOutcome, ExecStatus, Executor};
use crate::session::Session;
use super::builtins::run_builtin;
use super::pipeline::PipelineHandler;
use super::{command, redirect};

/// Runs parsed lines against the real terminal and real processes.
pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
    fn exec(&mut self, node: &AstNode, session: &mut Session) -> ExecStatus {
        match node {
            AstNode::Command(cmd) => self.exec_command(cmd, session),
            AstNode::Pipeline(cmds) => PipelineHandler::run(cmds, session),
        }
    }
}

impl DefaultExecutor {
    fn exec_command(&mut self, cmd: &CommandNode, session: &mut Session) -> ExecStatus {
        match cmd.kind {
            CommandKind::Builtin(builtin) => {
                let mut target = redirect::open_for_builtin(cmd, &session.env);
                let mut stdout = io::stdout();
                let mut stderr = io::stderr();
                let mut streams = redirect::bind_streams(cmd.redirect_mode, &mut target, &mut stdout, &mut stderr);
                run_builtin(builtin, &cmd.args, session, &mut streams)
            }
            CommandKind::External => {
                let Some(path) = session.env.find_executable(&cmd.name) else {
                    return Err(ExecError::CommandNotFound(cmd.name.clone()));
                };
                let mut process = command::prepare(cmd, &path, &session.env);
                redirect::apply_to_command(&mut process, cmd, &session.env);

                log::debug!("spawning {} ({})", cmd.name, path.display());
                match process.status() {
                    Ok(status) => Ok(ExecOutcome::Code(command::exit_code(status))),
                    Err(e) => {
                        log::warn!("failed to launch {}: {}", path.display(), e);
                        Err(ExecError::CommandNotFound(cmd.name.clone()))
                    }
                }
            }
        }
    }
}
