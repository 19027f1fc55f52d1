use crate::config::Config;
use crate::environment::Environment;
use crate::history::HistoryLog;

/// Everything a running shell mutates between prompts.
#[derive(Debug, Clone)]
pub struct Session {
    pub env: Environment,
    pub history: HistoryLog,
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_env(Environment::new(), config)
    }

    pub fn with_env(env: Environment, config: Config) -> Self {
        Session {
            env,
            history: HistoryLog::new(),
            config,
        }
    }

    /// Load the configured history file, if it exists.
    pub fn load_history(&mut self) {
        let Some(path) = self.config.history_file.clone() else {
            return;
        };
        if !path.exists() {
            return;
        }
        if let Err(e) = self.history.load(&path) {
            log::warn!("could not read history file {}: {}", path.display(), e);
        }
    }

    /// Flush new history entries to the configured history file.
    pub fn persist_history(&mut self) {
        let Some(path) = self.config.history_file.clone() else {
            return;
        };
        if let Err(e) = self.history.append_to_file(&path) {
            log::warn!("could not append to history file {}: {}", path.display(), e);
        }
    }
}
