use std::{env, io::Write};

use anyhow::Context;

mod args;
mod cmd;
mod logger;
mod util;

fn main() {
    if let Err(err) = run() {
        let backtrace = env::var("RUST_BACKTRACE").map_or(false, |v| v == "1");
        let mut stderr = std::io::stderr().lock();
        // There is nowhere left to report a failure to write to stderr.
        let _ = if backtrace {
            writeln!(stderr, "{:?}", err)
        } else {
            writeln!(stderr, "{:#}", err)
        };
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    logger::Logger::init()?;
    log::set_max_level(log_level()?);
    cmd::run(&mut lexopt::Parser::from_env())
}

/// Reads the maximum log level from `RUST_LOG`. Logging is off when it is
/// unset or empty.
fn log_level() -> anyhow::Result<log::LevelFilter> {
    let level = match env::var("RUST_LOG") {
        Err(env::VarError::NotPresent) => return Ok(log::LevelFilter::Off),
        Err(err) => return Err(anyhow::Error::new(err).context("RUST_LOG")),
        Ok(level) => level,
    };
    if level.is_empty() {
        return Ok(log::LevelFilter::Off);
    }
    level
        .parse()
        .with_context(|| format!("unrecognized log level '{}'", level))
}
