use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::logging;
use crate::session::{Session, SessionError};
use crate::transport::handle_json;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--script" => {
                let value = iter.next().ok_or("--script requires a path")?;
                options.script_path = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    let log_dir = config.log_dir.clone().unwrap_or_else(logging::logs_dir);
    let log_path = logging::init(&log_dir, &config.log_level)?;
    tracing::info!(
        config_path = %config.config_path.display(),
        log_path = %log_path.display(),
        search_threshold = config.engine.search_threshold,
        "rover session starting"
    );

    let mut session = Session::new(config)?;
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let handled = match options.script_path {
        Some(path) => drive(&mut session, BufReader::new(File::open(path)?), &mut output)?,
        None => drive(&mut session, io::stdin().lock(), &mut output)?,
    };
    tracing::info!(requests = handled, "rover session finished");
    Ok(())
}

/// Handles one JSON request per input line. Each line is one turn: the
/// response is written first, then the rebuild scheduled during the turn runs.
/// Blank lines and `#` comments are skipped.
pub fn drive<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<usize, io::Error> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let response = handle_json(session, trimmed);
        writeln!(output, "{response}")?;
        session.end_turn();
        handled += 1;
    }
    output.flush()?;
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::{drive, parse_cli_args, RuntimeOptions};
    use crate::config::Config;
    use crate::session::Session;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_config_and_script_paths() {
        let options = parse_cli_args(&args(&["--config", "rover.toml", "--script", "demo.jsonl"]))
            .expect("args should parse");
        assert_eq!(
            options,
            RuntimeOptions {
                config_path: Some(PathBuf::from("rover.toml")),
                script_path: Some(PathBuf::from("demo.jsonl")),
            }
        );
        assert_eq!(parse_cli_args(&[]).unwrap(), RuntimeOptions::default());
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse_cli_args(&args(&["--verbose"])).is_err());
        assert!(parse_cli_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn each_line_is_one_turn() {
        let mut session = Session::new(Config::default()).expect("session should initialize");
        let script = concat!(
            "# seed\n",
            "{\"kind\":\"add\",\"payload\":{\"identity\":\"a\",\"value\":\"Apple\"}}\n",
            "\n",
            "{\"kind\":\"state\"}\n",
        );
        let mut output = Vec::new();

        let handled = drive(&mut session, Cursor::new(script), &mut output).expect("drive should succeed");

        let text = String::from_utf8(output).expect("output should be utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(handled, 2);
        assert!(lines[0].contains("\"pending\":true"));
        assert!(lines[1].contains("\"pending\":false"));
        assert_eq!(session.engine().rebuild_count(), 1);
    }
}
