pub mod completion;
pub mod input;
pub mod terminal;

pub use completion::{CommandCompleter, Completer};
pub use input::{InputHandler, LineEditor};
pub use terminal::RawMode;
