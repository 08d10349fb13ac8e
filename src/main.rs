use clap::Parser;
use taskdeck::cli::commands::{Cli, Commands};
use taskdeck::cli::handlers;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("TD_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        // Init is handled before workspace discovery
        Some(Commands::Init(args)) => handlers::cmd_init(args, cli.workspace_dir.as_deref()),
        _ => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
