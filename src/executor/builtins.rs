use std::io::Write;
use std::path::PathBuf;
use crate::ast::Builtin;
use crate::executor::{ExecError, ExecOutcome, ExecStatus};
use crate::session::Session;

/// Output streams handed to a builtin; redirection decides what they point at.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

pub fn run_builtin(builtin: Builtin, args: &[String], session: &mut Session, io: &mut Streams<'_>) -> ExecStatus {
    let outcome = match builtin {
        Builtin::Echo => echo(args, io)?,
        Builtin::Exit => return exit(args),
        Builtin::Type => type_of(args, session, io)?,
        Builtin::Pwd => {
            writeln!(io.out, "{}", session.env.cwd().display())?;
            0
        }
        Builtin::Cd => cd(args, session, io)?,
        Builtin::History => history(args, session, io)?,
    };
    io.out.flush()?;
    Ok(ExecOutcome::Code(outcome))
}

fn echo(args: &[String], io: &mut Streams<'_>) -> Result<i32, ExecError> {
    writeln!(io.out, "{}", args.join(" "))?;
    Ok(0)
}

fn exit(args: &[String]) -> ExecStatus {
    let code = match args.first() {
        Some(arg) => arg
            .parse::<i32>()
            .map_err(|_| ExecError::InvalidArgument(format!("exit: {}: numeric argument required", arg)))?,
        None => 0,
    };
    Ok(ExecOutcome::Exit(code))
}

fn type_of(args: &[String], session: &Session, io: &mut Streams<'_>) -> Result<i32, ExecError> {
    let mut status = 0;
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(io.out, "{} is a shell builtin", name)?;
        } else if let Some(path) = session.env.find_executable(name) {
            writeln!(io.out, "{} is {}", name, path.display())?;
        } else {
            writeln!(io.out, "{}: not found", name)?;
            status = 1;
        }
    }
    Ok(status)
}

fn cd(args: &[String], session: &mut Session, io: &mut Streams<'_>) -> Result<i32, ExecError> {
    let arg = args.first().map(|s| s.as_str()).unwrap_or("~");
    let expanded = match expand_home(arg, session.env.home()) {
        Some(path) => path,
        None => {
            writeln!(io.err, "cd: HOME not set")?;
            return Ok(1);
        }
    };

    let target = session.env.resolve_path(expanded);
    if target.is_dir() {
        log::debug!("cd {}", target.display());
        session.env.set_cwd(target);
        Ok(0)
    } else {
        writeln!(io.err, "cd: {}: No such file or directory", arg)?;
        Ok(1)
    }
}

/// Expand a leading `~` (alone or as `~/...`); `None` when HOME is needed but unset.
fn expand_home(arg: &str, home: Option<&str>) -> Option<PathBuf> {
    if arg == "~" {
        return home.map(PathBuf::from);
    }
    match arg.strip_prefix("~/") {
        Some(rest) => home.map(|h| PathBuf::from(h).join(rest)),
        None => Some(PathBuf::from(arg)),
    }
}

fn history(args: &[String], session: &mut Session, io: &mut Streams<'_>) -> Result<i32, ExecError> {
    let flag = args.first().map(|s| s.as_str());
    match flag {
        None => {
            for line in session.history.list(0) {
                writeln!(io.out, "{}", line)?;
            }
            Ok(0)
        }
        Some(opt @ ("-r" | "-w" | "-a")) => {
            let Some(file) = args.get(1) else {
                writeln!(io.err, "history: {}: option requires an argument", opt)?;
                return Ok(2);
            };
            let path = session.env.resolve_path(file);
            let result = match opt {
                "-r" => session.history.load(&path),
                "-w" => session.history.save(&path),
                _ => session.history.append_to_file(&path),
            };
            match result {
                Ok(()) => Ok(0),
                Err(e) => {
                    writeln!(io.err, "history: {}: {}", file, e)?;
                    Ok(1)
                }
            }
        }
        Some(count) => match count.parse::<i64>() {
            Ok(n) => {
                for line in session.history.list(n) {
                    writeln!(io.out, "{}", line)?;
                }
                Ok(0)
            }
            Err(_) => {
                writeln!(io.err, "history: {}: numeric argument required", count)?;
                Ok(1)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use crate::config::ConfigLoader;
    use crate::environment::Environment;

    fn session_at(dir: &Path, vars: &[(&str, &str)]) -> Session {
        let env = Environment::with_vars(
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())),
            dir.to_path_buf(),
        );
        Session::with_env(env, ConfigLoader::default_config())
    }

    fn run(builtin: Builtin, args: &[&str], session: &mut Session) -> (ExecStatus, String, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run_builtin(builtin, &args, session, &mut Streams { out: &mut out, err: &mut err });
        (status, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_echo_joins_words() {
        let mut session = session_at(Path::new("/"), &[]);
        let (status, out, _) = run(Builtin::Echo, &["hello", "  world"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(0))));
        assert_eq!(out, "hello   world\n");
    }

    #[test]
    fn test_exit_codes() {
        let mut session = session_at(Path::new("/"), &[]);
        assert!(matches!(run(Builtin::Exit, &[], &mut session).0, Ok(ExecOutcome::Exit(0))));
        assert!(matches!(run(Builtin::Exit, &["3"], &mut session).0, Ok(ExecOutcome::Exit(3))));
        assert!(matches!(run(Builtin::Exit, &["abc"], &mut session).0, Err(ExecError::InvalidArgument(_))));
    }

    #[test]
    fn test_type_reports_builtins_and_missing() {
        let mut session = session_at(Path::new("/"), &[("PATH", "")]);
        let (status, out, _) = run(Builtin::Type, &["echo", "nosuchcmd"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(1))));
        assert_eq!(out, "echo is a shell builtin\nnosuchcmd: not found\n");
    }

    #[test]
    fn test_type_finds_executable_on_path() {
        let mut session = session_at(Path::new("/"), &[("PATH", "/usr/bin:/bin")]);
        let (_, out, _) = run(Builtin::Type, &["sh"], &mut session);
        assert!(out.starts_with("sh is /"), "{}", out);
        assert!(out.trim_end().ends_with("/sh"), "{}", out);
    }

    #[test]
    fn test_cd_and_pwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut session = session_at(dir.path(), &[]);

        let (status, _, _) = run(Builtin::Cd, &["sub"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(0))));
        assert_eq!(session.env.cwd(), dir.path().join("sub"));

        assert!(matches!(run(Builtin::Cd, &[".."], &mut session).0, Ok(ExecOutcome::Code(0))));
        let (_, out, _) = run(Builtin::Pwd, &[], &mut session);
        assert_eq!(out, format!("{}\n", dir.path().display()));
    }

    #[test]
    fn test_cd_home_expansion() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let home = dir.path().display().to_string();
        let mut session = session_at(Path::new("/"), &[("HOME", &home)]);

        assert!(matches!(run(Builtin::Cd, &["~/docs"], &mut session).0, Ok(ExecOutcome::Code(0))));
        assert_eq!(session.env.cwd(), dir.path().join("docs"));
        assert!(matches!(run(Builtin::Cd, &[], &mut session).0, Ok(ExecOutcome::Code(0))));
        assert_eq!(session.env.cwd(), dir.path());
    }

    #[test]
    fn test_cd_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(dir.path(), &[]);
        let (status, _, err) = run(Builtin::Cd, &["/does/not/exist"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(1))));
        assert_eq!(err, "cd: /does/not/exist: No such file or directory\n");
        assert_eq!(session.env.cwd(), dir.path());
    }

    #[test]
    fn test_history_listing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(dir.path(), &[]);
        for line in ["a", "b", "c"] {
            session.history.append(line);
        }

        let (_, out, _) = run(Builtin::History, &["2"], &mut session);
        assert_eq!(out, "   2  b\n   3  c\n");

        assert!(matches!(run(Builtin::History, &["-w", "f"], &mut session).0, Ok(ExecOutcome::Code(0))));
        session.history.append("d");
        assert!(matches!(run(Builtin::History, &["-a", "f"], &mut session).0, Ok(ExecOutcome::Code(0))));
        assert_eq!(fs::read_to_string(dir.path().join("f")).unwrap(), "a\nb\nc\nd\n");

        let mut fresh = session_at(dir.path(), &[]);
        assert!(matches!(run(Builtin::History, &["-r", "f"], &mut fresh).0, Ok(ExecOutcome::Code(0))));
        assert_eq!(fresh.history.list(0), session.history.list(0));
    }

    #[test]
    fn test_history_bad_arguments() {
        let mut session = session_at(Path::new("/"), &[]);
        let (status, _, err) = run(Builtin::History, &["lots"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(1))));
        assert_eq!(err, "history: lots: numeric argument required\n");

        let (status, _, err) = run(Builtin::History, &["-r"], &mut session);
        assert!(matches!(status, Ok(ExecOutcome::Code(2))));
        assert!(err.contains("option requires an argument"));
    }
}
