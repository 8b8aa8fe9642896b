//! Client for the Ephany Framework catalog API.
//!
//! Every read operation is built on [`EphanyClient::get_asset_page`], which is
//! the single network round trip for one page of assets. Requests are issued
//! strictly one after another; a client may be reused for any number of
//! sequential calls, but concurrent calls on one instance are not supported.
//! The connection pool is released when the client is dropped.

use std::path::Path;

use futures::StreamExt;
use reqwest::Response;
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    configuration::ClientConfig,
    error::ApiError,
    http_utils::{cancellable, HttpClient},
    model::{Asset, AssetFile, PagedResult},
};

/// Path of the asset collection, relative to the base URL.
pub const ASSETS_PATH: &str = "assets/";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Page size used while crawling, to keep the number of round trips low.
pub const CRAWL_PAGE_SIZE: u32 = 50;
pub const DOWNLOAD_BUFFER_SIZE: usize = 64 * 1024;

pub struct EphanyClient {
    http: HttpClient,
    config: ClientConfig,
}

impl EphanyClient {
    /// Build a client. Fails without touching the network when the HTTP
    /// client cannot be set up for `config`.
    pub fn new(config: ClientConfig) -> Result<EphanyClient, ApiError> {
        let http = HttpClient::new(&config)?;
        debug!(
            "Created Ephany client for {} using {} authentication",
            config.base_url(),
            config.scheme()
        );
        Ok(EphanyClient { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of assets.
    ///
    /// The returned page is stamped with the requested `page` and `page_size`,
    /// whatever the body says.
    pub async fn get_asset_page(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Asset>, ApiError> {
        self.fetch_page(page, page_size, None, cancel).await
    }

    /// Fetch every asset by following next-page links from page 1.
    ///
    /// The crawl stops only when a page comes back without a next link. A
    /// server that always returns one keeps the crawl going until `cancel`
    /// fires. Items are not de-duplicated; if the collection changes during
    /// the crawl, duplicates or gaps are possible. Any page failure aborts the
    /// crawl and the partial result is discarded.
    pub async fn get_all_assets(&self, cancel: &CancellationToken) -> Result<Vec<Asset>, ApiError> {
        self.get_all_assets_with_progress(cancel, |_| {}).await
    }

    /// Same as [`get_all_assets`](Self::get_all_assets), calling `on_page`
    /// after each page arrives.
    pub async fn get_all_assets_with_progress<F>(
        &self,
        cancel: &CancellationToken,
        mut on_page: F,
    ) -> Result<Vec<Asset>, ApiError>
    where
        F: FnMut(&PagedResult<Asset>),
    {
        let mut assets = Vec::new();
        let mut page = 1u32;

        loop {
            let result = self.get_asset_page(page, CRAWL_PAGE_SIZE, cancel).await?;
            on_page(&result);

            let has_next_page = result.has_next_page();
            assets.extend(result.items);
            trace!("Crawled page {}, {} assets so far", page, assets.len());

            if !has_next_page {
                break;
            }
            page = page
                .checked_add(1)
                .ok_or_else(|| ApiError::invalid_argument("page", "page number overflow"))?;
        }

        debug!("Crawl finished after {} pages with {} assets", page, assets.len());
        Ok(assets)
    }

    /// Every asset that has a Revit family file, in crawl order.
    pub async fn get_revit_assets(&self, cancel: &CancellationToken) -> Result<Vec<Asset>, ApiError> {
        let assets = self.get_all_assets(cancel).await?;
        Ok(assets.into_iter().filter(Asset::has_revit_family).collect())
    }

    /// Fetch one page of assets matching `keyword`.
    ///
    /// A blank or whitespace-only keyword is the same as
    /// [`get_asset_page`](Self::get_asset_page). Any other keyword is sent as
    /// given, surrounding whitespace included. Later pages are fetched by calling again with a higher `page`.
    pub async fn search_assets(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Asset>, ApiError> {
        if keyword.trim().is_empty() {
            return self.get_asset_page(page, page_size, cancel).await;
        }
        self.fetch_page(page, page_size, Some(keyword), cancel).await
    }

    /// Stream `file` to `destination`, returning the number of bytes written.
    ///
    /// The destination is created (or truncated) only after a success status
    /// arrived. Its parent directory must already exist. On failure or
    /// cancellation the partially written file is removed before the error is
    /// returned; cancellation is reported as [`ApiError::Cancelled`].
    pub async fn download_file(
        &self,
        file: &AssetFile,
        destination: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<u64, ApiError> {
        let destination = destination.as_ref();
        let raw_url = file
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::invalid_argument("file", "file reference has no URL"))?;
        let url = Url::parse(raw_url)
            .map_err(|e| ApiError::invalid_argument("file", format!("invalid URL {}: {}", raw_url, e)))?;

        debug!("Downloading {} to {}", url, destination.display());
        let response = self.http.open(url.clone(), cancel).await?;

        let handle = File::create(destination)
            .await
            .map_err(|e| ApiError::io(destination, e))?;

        let result = cancellable(
            cancel,
            stream_to_file(handle, response, url.as_str(), destination),
        )
        .await;

        match result {
            Ok(bytes) => {
                debug!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(bytes)
            }
            Err(e) => {
                debug!("Removing partial file {} after error", destination.display());
                if let Err(remove_error) = tokio::fs::remove_file(destination).await {
                    if remove_error.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Failed to remove partial file {}: {}",
                            destination.display(),
                            remove_error
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Asset>, ApiError> {
        validate_paging(page, page_size)?;

        let url = self.http.endpoint(ASSETS_PATH)?;
        let mut query = Vec::with_capacity(3);
        if let Some(keyword) = search {
            query.push(("search", keyword.to_string()));
        }
        query.push(("page", page.to_string()));
        query.push(("pageSize", page_size.to_string()));

        let body: Option<PagedResult<Asset>> = self.http.get_json(url, &query, cancel).await?;

        // the server is not trusted to echo paging back
        let mut result = body.unwrap_or_else(|| PagedResult::empty(page, page_size));
        result.page_number = page;
        result.page_size = page_size;

        trace!(
            "Page {} (size {}): {} of {} assets",
            page,
            page_size,
            result.items.len(),
            result.total_count
        );
        Ok(result)
    }
}

fn validate_paging(page: u32, page_size: u32) -> Result<(), ApiError> {
    if page < 1 {
        return Err(ApiError::invalid_argument("page", "page must be greater than 0"));
    }
    if page_size < 1 {
        return Err(ApiError::invalid_argument(
            "page_size",
            "page size must be greater than 0",
        ));
    }
    Ok(())
}

/// Copies the response body into `file` chunk by chunk.
async fn stream_to_file(
    file: File,
    response: Response,
    url: &str,
    path: &Path,
) -> Result<u64, ApiError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_BUFFER_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ApiError::connectivity(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ApiError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| ApiError::io(path, e))?;
    Ok(bytes_written)
}
