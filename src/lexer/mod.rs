mod lexer;

pub use lexer::{LexError, Lexer};
