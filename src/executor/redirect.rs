use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use crate::ast::{CommandNode, RedirectMode};
use crate::environment::Environment;
use crate::executor::builtins::Streams;

/// Open the redirect target of `cmd`, truncating or appending per its mode.
///
/// Failures are logged and swallowed: a redirect that cannot be honored
/// discards the output instead of failing the command.
pub fn open_target(cmd: &CommandNode, env: &Environment) -> Option<File> {
    if cmd.redirect_mode == RedirectMode::None {
        return None;
    }
    let path = env.resolve_path(&cmd.redirect_target);
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::warn!("could not create {}: {}", parent.display(), e);
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if cmd.redirect_mode.is_append() {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    match options.open(&path) {
        Ok(file) => Some(file),
        Err(e) => {
            log::warn!("could not open redirect target {}: {}", path.display(), e);
            None
        }
    }
}

/// Writer a redirected builtin stream goes to; `None` when nothing is redirected.
pub fn open_for_builtin(cmd: &CommandNode, env: &Environment) -> Option<Box<dyn Write + Send>> {
    if cmd.redirect_mode == RedirectMode::None {
        return None;
    }
    match open_target(cmd, env) {
        Some(file) => Some(Box::new(file)),
        None => Some(Box::new(io::sink())),
    }
}

/// Pick the builtin's output streams, swapping in `target` for the
/// redirected one.
pub fn bind_streams<'a>(
    mode: RedirectMode,
    target: &'a mut Option<Box<dyn Write + Send>>,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
) -> Streams<'a> {
    match target {
        Some(file) => {
            if mode.targets_stdout() {
                Streams { out: file.as_mut(), err }
            } else if mode.targets_stderr() {
                Streams { out, err: file.as_mut() }
            } else {
                Streams { out, err }
            }
        }
        None => Streams { out, err },
    }
}

/// Point the child's stdout or stderr at the redirect target.
pub fn apply_to_command(command: &mut Command, cmd: &CommandNode, env: &Environment) {
    if cmd.redirect_mode == RedirectMode::None {
        return;
    }
    let stdio = match open_target(cmd, env) {
        Some(file) => Stdio::from(file),
        None => Stdio::null(),
    };
    if cmd.redirect_mode.targets_stdout() {
        command.stdout(stdio);
    } else {
        command.stderr(stdio);
    }
}
