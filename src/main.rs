use clap::Parser;
use dsh::cli::Cli;
use dsh::{commands, ui, ComposeError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "dsh=debug,info"
    } else {
        "dsh=info,info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    if let Err(err) = commands::execute(cli) {
        ui::error(format!("{err:#}"));
        let code = err
            .downcast_ref::<ComposeError>()
            .map(ComposeError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
