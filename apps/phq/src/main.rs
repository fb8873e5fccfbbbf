use clap::Parser;
use phq::cli::{Cli, Commands, cmd_analyze, cmd_questions, cmd_score, cmd_serve};
use phq::config::DEFAULT_LOG_FILTER;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args).await.map(|()| None),
        Commands::Questions { json } => cmd_questions(json).map(Some),
        Commands::Score { rankings, json } => cmd_score(&rankings, json).map(Some),
        Commands::Analyze { text, json } => cmd_analyze(&text, json).map(Some),
    };

    match result {
        Ok(Some(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
