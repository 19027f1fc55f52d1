use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::Path;
use std::process::{Command, ExitStatus};
use crate::ast::CommandNode;
use crate::environment::Environment;

/// Build the process for `cmd` from its resolved executable.
///
/// `argv[0]` is the name the user typed, not the resolved path.
pub fn prepare(cmd: &CommandNode, executable: &Path, env: &Environment) -> Command {
    let mut command = Command::new(executable);
    command
        .arg0(&cmd.name)
        .args(&cmd.args)
        .env_clear()
        .envs(env.vars())
        .current_dir(env.cwd());
    command
}

pub fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => match status.signal() {
            Some(signal) => 128 + signal,
            None => 1,
        },
    }
}
