use color_print::ceprintln;
use ephany::commands::{create_cli_commands, PARAMETER_VERBOSE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::execute_command;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = create_cli_commands();

    // Initialize the logging subsystem; RUST_LOG wins over --verbose
    let default_level = if matches.get_flag(PARAMETER_VERBOSE) {
        "ephany=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Ctrl-C cancels whatever operation is running
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling...");
            signal_token.cancel();
        }
    });

    if let Err(e) = execute_command(&matches, &cancel).await {
        let code = e.exit_code();
        debug!("Command failed with exit code {}: {:?}", code.code(), e);

        if e.is_cancelled() {
            ceprintln!("<yellow>Cancelled.</yellow>");
        } else {
            ceprintln!("<red><bold>ERROR:</bold></red> {}", e);
        }
        ::std::process::exit(code.code());
    }
}
