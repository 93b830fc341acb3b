use std::io;
use std::process::ExitCode;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use intcalc::{Config, NativeEngine, Session, SymbolicEngine, Terminal};

const INSTALL_HINT: &str = "Reinstall it with: cargo install --path .";

fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing(&config);

    let engine = NativeEngine::new();
    if let Err(err) = engine.self_check() {
        error!(error = %err, "startup self-check failed");
        eprintln!("ERROR: the symbolic engine is not usable: {err}");
        eprintln!("{INSTALL_HINT}");
        return ExitCode::FAILURE;
    }

    match run(engine, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "session aborted");
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(engine: NativeEngine, config: &Config) -> intcalc::Result<()> {
    let terminal = Terminal::new()?;
    let mut session = Session::new(engine, terminal, io::stdout(), config);
    let exit = session.run()?;
    debug!(?exit, "exiting");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(intcalc::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
