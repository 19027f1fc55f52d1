use tiny_shell_rs::config::ConfigLoader;
use tiny_shell_rs::error::ShellError;
use tiny_shell_rs::executor::DefaultExecutor;
use tiny_shell_rs::io::InputHandler;
use tiny_shell_rs::logging;
use tiny_shell_rs::repl::Shell;
use tiny_shell_rs::session::Session;

fn main() {
    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tinysh: {}; using defaults", ShellError::from(e));
            let mut config = ConfigLoader::default_config();
            if let Err(e) = ConfigLoader::apply_env(&mut config, |key| std::env::var(key).ok()) {
                eprintln!("tinysh: {}", ShellError::from(e));
            }
            config
        }
    };
    logging::init(&config);
    log::info!("starting, history file {:?}", config.history_file);

    let mut input = InputHandler::new(&config.prompt);
    let mut session = Session::new(config);
    session.load_history();

    let mut shell = Shell::new(session, DefaultExecutor);
    let code = shell.run(&mut input);
    std::process::exit(code);
}
