//! Asset command definitions.
//!
//! This module defines CLI commands for reading the asset catalog: paging,
//! browsing, the full crawl, the Revit subset, search and file download.

use crate::commands::params::{
    connection_parameters, id_parameter, keyword_parameter, output_file_parameter,
    page_parameter, page_size_parameter, COMMAND_ALL, COMMAND_ASSET, COMMAND_BROWSE,
    COMMAND_DOWNLOAD, COMMAND_LIST, COMMAND_REVIT, COMMAND_SEARCH,
};
use clap::Command;

/// Create the asset command with all its subcommands.
pub fn asset_command() -> Command {
    Command::new(COMMAND_ASSET)
        .about("Browse, search and download catalog assets")
        .subcommand_required(true)
        .args(connection_parameters())
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List one page of assets")
                .visible_alias("ls")
                .arg(page_parameter())
                .arg(page_size_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_BROWSE)
                .about("Page through the assets interactively")
                .arg(page_size_parameter()),
        )
        .subcommand(Command::new(COMMAND_ALL).about("Fetch every asset in the catalog"))
        .subcommand(
            Command::new(COMMAND_REVIT).about("List every asset that has a Revit family file"),
        )
        .subcommand(
            Command::new(COMMAND_SEARCH)
                .about("Search assets by keyword")
                .arg(keyword_parameter())
                .arg(page_parameter())
                .arg(page_size_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DOWNLOAD)
                .about("Download the Revit family file of an asset")
                .arg(id_parameter())
                .arg(output_file_parameter()),
        )
}
