use clap::ArgMatches;
use ephany::{
    actions::{assets, config},
    commands::{
        COMMAND_ALL, COMMAND_ASSET, COMMAND_BROWSE, COMMAND_CONFIG, COMMAND_DOWNLOAD,
        COMMAND_LIST, COMMAND_PATH, COMMAND_REVIT, COMMAND_SEARCH, COMMAND_SET, COMMAND_SHOW,
    },
    error::CliError,
};
use tokio_util::sync::CancellationToken;

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

/// Dispatch the parsed command line to its action.
pub async fn execute_command(
    matches: &ArgMatches,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match matches.subcommand() {
        // Assets
        Some((COMMAND_ASSET, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => assets::list_assets(sub_matches, cancel).await,
            Some((COMMAND_BROWSE, sub_matches)) => assets::browse_assets(sub_matches, cancel).await,
            Some((COMMAND_ALL, sub_matches)) => assets::all_assets(sub_matches, cancel).await,
            Some((COMMAND_REVIT, sub_matches)) => assets::revit_assets(sub_matches, cancel).await,
            Some((COMMAND_SEARCH, sub_matches)) => {
                assets::search_assets(sub_matches, cancel).await
            }
            Some((COMMAND_DOWNLOAD, sub_matches)) => {
                assets::download_asset(sub_matches, cancel).await
            }
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Configuration
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_SHOW, _)) => config::show_configuration(),
            Some((COMMAND_PATH, _)) => config::print_configuration_path(),
            Some((COMMAND_SET, sub_matches)) => config::set_configuration(sub_matches),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
            matches,
        ))),
    }
}
