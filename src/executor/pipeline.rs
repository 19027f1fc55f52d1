use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use std::thread;
use crate::ast::{Builtin, CommandKind, CommandNode};
use crate::executor::{ExecError, ExecOutcome, ExecStatus};
use crate::session::Session;
use super::builtins::run_builtin;
use super::{command, redirect};

/// Size of the buffer each forwarding task reuses for its copies.
pub const TRANSFER_BUFFER_SIZE: usize = 8 * 1024;

/// What feeds one forwarding task.
enum Source<'c> {
    /// A first-stage builtin, run inside the task against a session snapshot.
    Builtin {
        cmd: &'c CommandNode,
        builtin: Builtin,
        session: Session,
    },
    /// Captured stdout of an external stage; `None` when that stage redirected it.
    Pipe(Option<ChildStdout>),
}

/// Runs a chain of two or more commands.
///
/// Every external stage gets its own pipes and one task per adjacent pair
/// copies bytes across. Builtins are accepted as the first stage (output fed
/// downstream) or the last stage (runs on the terminal, input ignored), never
/// in the middle.
pub struct PipelineHandler;

impl PipelineHandler {
    pub fn run(cmds: &[CommandNode], session: &mut Session) -> ExecStatus {
        if cmds.len() < 2 {
            return Err(ExecError::PipelineError("Pipeline must have at least two commands".into()));
        }
        let last = cmds.len() - 1;
        if let Some(cmd) = cmds[1..last].iter().find(|c| c.is_builtin()) {
            return Err(ExecError::PipelineError(format!(
                "builtin '{}' is only supported as the first or last stage",
                cmd.name
            )));
        }

        let mut children: Vec<Option<Child>> = Vec::with_capacity(cmds.len());
        for (i, cmd) in cmds.iter().enumerate() {
            if cmd.is_builtin() {
                children.push(None);
                continue;
            }
            match spawn_stage(cmd, i, last, session) {
                Some(child) => children.push(Some(child)),
                None => {
                    terminate(children.iter_mut().flatten());
                    return Err(ExecError::CommandNotFound(cmd.name.clone()));
                }
            }
        }

        let mut outputs: Vec<Option<ChildStdout>> = children
            .iter_mut()
            .map(|c| c.as_mut().and_then(|c| c.stdout.take()))
            .collect();
        let mut inputs: Vec<Option<ChildStdin>> = children
            .iter_mut()
            .map(|c| c.as_mut().and_then(|c| c.stdin.take()))
            .collect();

        let mut first_builtin = match cmds[0].kind {
            CommandKind::Builtin(builtin) => Some((builtin, session.clone())),
            CommandKind::External => None,
        };

        thread::scope(|scope| {
            let mut tasks = Vec::with_capacity(last);
            for i in 0..last {
                let source = match (i, first_builtin.take()) {
                    (0, Some((builtin, snapshot))) => Source::Builtin {
                        cmd: &cmds[0],
                        builtin,
                        session: snapshot,
                    },
                    _ => Source::Pipe(outputs[i].take()),
                };
                let sink = inputs[i + 1].take();
                tasks.push(scope.spawn(move || forward(source, sink)));
            }
            for task in tasks {
                if task.join().is_err() {
                    log::warn!("pipeline forwarding task panicked");
                }
            }
        });

        let status = match cmds[last].kind {
            CommandKind::Builtin(builtin) => run_last_builtin(&cmds[last], builtin, session),
            CommandKind::External => match children[last].as_mut().map(|c| c.wait()) {
                Some(Ok(status)) => command::exit_code(status),
                Some(Err(e)) => {
                    log::warn!("waiting for {} failed: {}", cmds[last].name, e);
                    1
                }
                None => 1,
            },
        };

        // Upstream stages may still be blocked writing into a pipe nobody reads.
        terminate(children[..last].iter_mut().flatten());
        Ok(ExecOutcome::Code(status))
    }
}

fn spawn_stage(cmd: &CommandNode, index: usize, last: usize, session: &Session) -> Option<Child> {
    let path = session.env.find_executable(&cmd.name)?;
    let mut process = command::prepare(cmd, &path, &session.env);
    if index > 0 {
        process.stdin(Stdio::piped());
    }
    if index < last {
        process.stdout(Stdio::piped());
    }
    redirect::apply_to_command(&mut process, cmd, &session.env);

    match process.spawn() {
        Ok(child) => {
            log::debug!("pipeline stage {} spawned {} (pid {})", index, cmd.name, child.id());
            Some(child)
        }
        Err(e) => {
            log::warn!("failed to launch {}: {}", path.display(), e);
            None
        }
    }
}

/// Body of one forwarding task. Dropping `sink` on return closes the next
/// stage's stdin, which is how it sees end of stream.
fn forward(source: Source<'_>, sink: Option<ChildStdin>) {
    match source {
        Source::Builtin { cmd, builtin, mut session } => {
            let mut sink: Box<dyn Write> = match sink {
                Some(stdin) => Box::new(stdin),
                None => Box::new(io::sink()),
            };
            let mut stderr = io::stderr();
            let mut target = redirect::open_for_builtin(cmd, &session.env);
            let mut streams = redirect::bind_streams(cmd.redirect_mode, &mut target, sink.as_mut(), &mut stderr);
            match run_builtin(builtin, &cmd.args, &mut session, &mut streams) {
                Ok(_) => {}
                Err(ExecError::Io(e)) => log::debug!("{} stopped writing: {}", cmd.name, e),
                Err(e) => eprintln!("{}", e),
            }
        }
        Source::Pipe(Some(mut output)) => {
            // A builtin downstream takes no input: close our end right away.
            let Some(mut input) = sink else {
                return;
            };
            if let Err(e) = copy_stream(&mut output, &mut input) {
                log::debug!("pipeline forwarding stopped: {}", e);
            }
        }
        Source::Pipe(None) => {}
    }
}

/// Copy until end of stream through a single reused buffer.
pub fn copy_stream<R: Read + ?Sized, W: Write + ?Sized>(src: &mut R, dst: &mut W) -> io::Result<u64> {
    let mut buf = [0u8; TRANSFER_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dst.write_all(&buf[..n])?;
        total += n as u64;
    }
    dst.flush()?;
    Ok(total)
}

fn run_last_builtin(cmd: &CommandNode, builtin: Builtin, session: &mut Session) -> i32 {
    let mut target = redirect::open_for_builtin(cmd, &session.env);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut streams = redirect::bind_streams(cmd.redirect_mode, &mut target, &mut stdout, &mut stderr);
    // `exit` at the end of a pipeline does not leave the shell
    match run_builtin(builtin, &cmd.args, session, &mut streams) {
        Ok(outcome) => outcome.code(),
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

/// Kill whatever is still running and reap everything.
fn terminate<'a>(children: impl Iterator<Item = &'a mut Child>) {
    for child in children {
        if let Ok(None) = child.try_wait() {
            log::debug!("terminating pipeline stage pid {}", child.id());
            let _ = child.kill();
        }
        let _ = child.wait();
    }
}
