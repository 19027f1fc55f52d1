pub mod repl;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod executor;
pub mod environment;
pub mod history;
pub mod session;
pub mod config;
pub mod logging;
pub mod error;
pub mod io;
