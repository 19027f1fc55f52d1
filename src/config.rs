use std::{ io, fmt };
use std::io::{ BufRead, BufReader };
use std::fs::File;
use std::path::{ Path, PathBuf };
use log::LevelFilter;

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    /// Loaded at startup and appended to on `exit`.
    pub history_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: "$ ".to_string(),
            history_file: None,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }

    /// Defaults, then the rc file (if any), then environment overrides.
    pub fn load() -> Result<Config, ConfigError> {
        let mut config = match Self::rc_path() {
            Some(path) if path.is_file() => Self::load_from_file(path)?,
            _ => Self::default_config(),
        };
        Self::apply_env(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn rc_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("TINYSH_CONFIG") {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|home| Path::new(&home).join(".tinyshrc"))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path).map_err(ConfigError::Io)?;
        let mut src = String::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(ConfigError::Io)?;
            src.push_str(&line);
            src.push('\n');
        }
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno + 1, line)));
            };

            match key.trim() {
                // The prompt keeps its whitespace, "$ " needs the trailing space
                "prompt" => config.prompt = value.to_string(),
                "history_file" => config.history_file = non_empty_path(value),
                "log_file" => config.log_file = non_empty_path(value),
                "log_level" => {
                    config.log_level = parse_level(value.trim())
                        .ok_or_else(|| ConfigError::Parse(format!("Line {}: Invalid log level: {}", lineno + 1, line)))?;
                }
                k => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno + 1, k))),
            }
        }

        Ok(config)
    }

    /// `HISTFILE`, `TINYSH_LOG` and `TINYSH_LOG_LEVEL` win over the rc file.
    pub fn apply_env<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("HISTFILE") {
            config.history_file = non_empty_path(&path);
        }
        if let Some(path) = lookup("TINYSH_LOG") {
            config.log_file = non_empty_path(&path);
        }
        if let Some(level) = lookup("TINYSH_LOG_LEVEL") {
            config.log_level = parse_level(level.trim())
                .ok_or_else(|| ConfigError::Parse(format!("TINYSH_LOG_LEVEL: Invalid log level: {}", level)))?;
        }
        Ok(())
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() { None } else { Some(PathBuf::from(value)) }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    value.parse::<LevelFilter>().ok()
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(_) => None,
        }
    }
}
