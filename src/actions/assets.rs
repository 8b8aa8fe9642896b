use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::ArgMatches;
use color_print::cprintln;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{InquireError, Select};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    actions::utils::{create_client, get_format_parameter_value},
    client::DEFAULT_PAGE_SIZE,
    commands::params::{PARAMETER_ID, PARAMETER_KEYWORD, PARAMETER_OUTPUT, PARAMETER_PAGE, PARAMETER_PAGE_SIZE},
    error::CliError,
    format::{OutputFormat, OutputFormatter},
    model::{asset_label, Asset, AssetList, PagedResult},
};

const NAVIGATE_NEXT: &str = "Next page";
const NAVIGATE_PREVIOUS: &str = "Previous page";
const NAVIGATE_EXIT: &str = "Exit";

fn page_arguments(sub_matches: &ArgMatches) -> (u32, u32) {
    let page = sub_matches.get_one::<u32>(PARAMETER_PAGE).copied().unwrap_or(1);
    let page_size = sub_matches
        .get_one::<u32>(PARAMETER_PAGE_SIZE)
        .copied()
        .unwrap_or(DEFAULT_PAGE_SIZE);
    (page, page_size)
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Summary line printed under a page in table mode.
pub fn page_summary(page: &PagedResult<Asset>) -> String {
    format!(
        "Total Assets: {} | Showing {} on this page.",
        page.total_count,
        page.len()
    )
}

fn print_page(page: &PagedResult<Asset>, format: OutputFormat) -> Result<(), CliError> {
    let is_table = format.is_table();
    println!("{}", page.format(format)?);
    if is_table {
        println!();
        println!("{}", page_summary(page));
    }
    Ok(())
}

pub async fn list_assets(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset list\" command...");

    let format = get_format_parameter_value(sub_matches);
    let (page, page_size) = page_arguments(sub_matches);
    let client = create_client(sub_matches)?;

    let result = client.get_asset_page(page, page_size, cancel).await?;
    print_page(&result, format)
}

/// Interactive pager over the collection, one request per page shown.
pub async fn browse_assets(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset browse\" command...");

    let format = get_format_parameter_value(sub_matches);
    let (_, page_size) = page_arguments(sub_matches);
    let client = create_client(sub_matches)?;
    let mut page = 1u32;

    loop {
        let result = client.get_asset_page(page, page_size, cancel).await?;
        println!("{}", result.format(format.clone())?);
        println!();
        cprintln!(
            "<bold>Page {} of {}</bold> | {}",
            page,
            result.total_pages().max(1),
            page_summary(&result)
        );

        let mut options = Vec::with_capacity(3);
        if result.has_next_page() {
            options.push(NAVIGATE_NEXT);
        }
        if page > 1 {
            options.push(NAVIGATE_PREVIOUS);
        }
        options.push(NAVIGATE_EXIT);

        let choice = match Select::new("Navigate:", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled) => NAVIGATE_EXIT,
            Err(e) => return Err(e.into()),
        };

        match choice {
            NAVIGATE_NEXT => page += 1,
            NAVIGATE_PREVIOUS => page -= 1,
            _ => break,
        }
        debug!("Moving to page {}", page);
    }

    Ok(())
}

pub async fn all_assets(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset all\" command...");

    let format = get_format_parameter_value(sub_matches);
    let client = create_client(sub_matches)?;

    let progress = spinner("Fetching assets...");
    let mut fetched = 0usize;
    let result = client
        .get_all_assets_with_progress(cancel, |page| {
            fetched += page.len();
            progress.set_message(format!("Fetched {} of {} assets...", fetched, page.total_count));
        })
        .await;
    progress.finish_and_clear();

    let assets = AssetList::from(result?);
    let is_table = format.is_table();
    println!("{}", assets.format(format)?);
    if is_table {
        println!();
        println!("Total: {} assets", assets.len());
    }
    Ok(())
}

pub async fn revit_assets(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset revit\" command...");

    let format = get_format_parameter_value(sub_matches).numbered();
    let client = create_client(sub_matches)?;

    let progress = spinner("Looking for assets with Revit families...");
    let result = client.get_revit_assets(cancel).await;
    progress.finish_and_clear();

    let assets = AssetList::from(result?);
    let is_table = format.is_table();
    println!("{}", assets.format(format)?);
    if is_table && !assets.is_empty() {
        println!();
        println!("Found {} assets with Revit families.", assets.len());
    }
    Ok(())
}

pub async fn search_assets(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset search\" command...");

    let keyword = sub_matches
        .get_one::<String>(PARAMETER_KEYWORD)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_KEYWORD.to_string()))?;
    let format = get_format_parameter_value(sub_matches);
    let (page, page_size) = page_arguments(sub_matches);
    let client = create_client(sub_matches)?;

    let result = client.search_assets(keyword, page, page_size, cancel).await?;

    let is_table = format.is_table();
    println!("{}", result.format(format)?);
    if is_table {
        println!();
        println!(
            "Found {} matching assets | Showing {} on page {}.",
            result.total_count,
            result.len(),
            result.page_number
        );
    }
    Ok(())
}

/// Download the Revit family of an asset picked from the Revit subset.
pub async fn download_asset(sub_matches: &ArgMatches, cancel: &CancellationToken) -> Result<(), CliError> {
    trace!("Executing \"asset download\" command...");

    let client = create_client(sub_matches)?;

    let progress = spinner("Looking for assets with Revit families...");
    let result = client.get_revit_assets(cancel).await;
    progress.finish_and_clear();
    let assets = AssetList::from(result?);

    if assets.is_empty() {
        println!("No assets with Revit families found.");
        return Ok(());
    }

    let asset = match sub_matches.get_one::<i64>(PARAMETER_ID) {
        Some(id) => assets
            .find_by_id(*id)
            .ok_or(CliError::AssetNotFound { id: *id })?,
        None => select_asset(&assets)?,
    };

    let file = asset
        .revit_family_file()
        .ok_or_else(|| CliError::NoRevitFamily {
            type_id: asset.type_id.clone(),
        })?;

    let destination = match sub_matches.get_one::<PathBuf>(PARAMETER_OUTPUT) {
        Some(path) => path.clone(),
        None => {
            let path = default_download_path(dirs::download_dir().as_deref(), asset);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| crate::error::ApiError::io(parent, e))?;
            }
            path
        }
    };

    let progress = spinner(&format!("Downloading {}...", destination.display()));
    let result = client.download_file(file, &destination, cancel).await;
    progress.finish_and_clear();

    let bytes = result?;
    cprintln!(
        "<green>Downloaded</green> {} ({} bytes) to {}",
        asset.type_id,
        bytes,
        destination.display()
    );
    Ok(())
}

fn select_asset(assets: &AssetList) -> Result<&Asset, CliError> {
    let options: Vec<String> = assets.iter().map(asset_label).collect();
    let choice = Select::new("Select an asset to download:", options)
        .with_help_message("Only assets with a Revit family file are listed")
        .raw_prompt()?;

    trace!("User selected row {}", choice.index + 1);
    assets
        .get_row(choice.index + 1)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_ID.to_string()))
}

/// `<directory>/<type_id>.rfa`, falling back to the current directory.
pub fn default_download_path(directory: Option<&Path>, asset: &Asset) -> PathBuf {
    let stem: String = if asset.type_id.trim().is_empty() {
        asset.id.to_string()
    } else {
        asset
            .type_id
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect()
    };

    directory
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(format!("{}.rfa", stem))
}
