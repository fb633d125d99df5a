//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use roadfuel_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    match roadfuel_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("roadfuel: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Library crates log through `log`; the default bridge forwards them.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
