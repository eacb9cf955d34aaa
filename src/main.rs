use anyhow::Result;
use clap::Parser;
use modcli::cli::Cli;
use modcli::command_handlers::listing;
use modcli::config::AppConfig;
use modcli::env::{Environment, ProcessEnv};
use modcli::{modules, process, DispatchError};
use std::process::ExitCode;
use std::sync::Arc;

const LOG_ENV: &str = "MODCLI_LOG";

fn init_tracing(verbose: u8, env: &dyn Environment) {
    let filter = env.non_empty(LOG_ENV).unwrap_or_else(|| {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let env = Arc::new(ProcessEnv);
    let cfg = AppConfig::load(cli.config.as_deref(), env.as_ref())?;
    let dispatcher = modules::dispatcher(cfg, env, process::shared_system())?;

    if cli.args.is_empty() {
        print!("{}", listing::render(&dispatcher.describe()?));
        return Ok(ExitCode::SUCCESS);
    }

    match dispatcher.dispatch(cli.args) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err @ DispatchError::UnknownCommand { .. }) => {
            eprintln!("error: {err}\n");
            eprint!("{}", listing::render(&dispatcher.describe()?));
            Ok(exit_code(&err))
        }
        Err(err) => {
            let code = exit_code(&err);
            eprintln!("error: {:#}", anyhow::Error::from(err));
            Ok(code)
        }
    }
}

fn exit_code(err: &DispatchError) -> ExitCode {
    u8::try_from(err.exit_code())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, &ProcessEnv);
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
