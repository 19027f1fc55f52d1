use crate::error::ShellError;
use crate::executor::{ExecError, ExecOutcome, Executor};
use crate::io::InputHandler;
use crate::lexer::Lexer;
use crate::parser::{default::DefaultParser, Parser};
use crate::session::Session;

pub const NOT_FOUND_STATUS: i32 = 127;
const SYNTAX_ERROR_STATUS: i32 = 2;

/// What the read loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Read-eval loop owning the session.
pub struct Shell<E: Executor> {
    session: Session,
    executor: E,
    last_status: i32,
}

impl<E: Executor> Shell<E> {
    pub fn new(session: Session, executor: E) -> Self {
        Shell {
            session,
            executor,
            last_status: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Status of the last line that ran.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Read and run lines until `exit` or end of input. Returns the exit status.
    pub fn run(&mut self, input: &mut InputHandler) -> i32 {
        loop {
            match input.read_line(&self.session) {
                Ok(Some(line)) => {
                    if let Flow::Exit(code) = self.execute_line(&line) {
                        return code;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("reading input failed: {}", e);
                    eprintln!("{}", ShellError::from(e));
                    break;
                }
            }
        }
        self.session.persist_history();
        self.last_status
    }

    /// Run one line. Errors are printed here and never end the loop.
    pub fn execute_line(&mut self, line: &str) -> Flow {
        match self.eval(line) {
            Ok(None) => Flow::Continue,
            Ok(Some(ExecOutcome::Code(code))) => {
                self.last_status = code;
                Flow::Continue
            }
            Ok(Some(ExecOutcome::Exit(code))) => {
                log::info!("exit {}", code);
                self.session.persist_history();
                Flow::Exit(code)
            }
            Err(e) => {
                eprintln!("{}", e);
                self.last_status = match e {
                    ShellError::Lex(_) | ShellError::Parse(_) => SYNTAX_ERROR_STATUS,
                    ShellError::Exec(ExecError::CommandNotFound(_)) => NOT_FOUND_STATUS,
                    _ => 1,
                };
                Flow::Continue
            }
        }
    }

    fn eval(&mut self, line: &str) -> Result<Option<ExecOutcome>, ShellError> {
        let tokens = Lexer::tokenize(line)?;
        if tokens.is_empty() {
            return Ok(None);
        }
        let ast = DefaultParser::new(&tokens).parse()?;

        log::debug!("executing {:?}", ast);
        let result = self.executor.exec(&ast, &mut self.session);
        // Recorded after running so `history` never lists itself
        self.session.history.append(line);
        Ok(Some(result?))
    }
}
