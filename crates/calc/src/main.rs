use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kortex_calc::{evaluate, run_interactive, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kortex_calc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.interactive {
        return match run_interactive(std::io::stdin().lock(), std::io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // clap enforces the operands unless `--interactive` was given.
    let Some((op, a, b)) = cli.expression() else {
        let _ = Cli::command().print_help();
        return ExitCode::from(2);
    };

    match evaluate(op, a, b) {
        Ok(value) => {
            println!("Result: {value}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Evaluation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
