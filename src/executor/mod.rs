mod executor;
mod default_executor;
mod command;
mod pipeline;
pub mod builtins;
pub mod redirect;
pub mod path_resolver;

pub use executor::{Executor, ExecError, ExecOutcome, ExecStatus};
pub use default_executor::DefaultExecutor;
pub use path_resolver::PathResolver;
pub use pipeline::{PipelineHandler, TRANSFER_BUFFER_SIZE};
