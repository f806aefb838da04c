//! Cache management for refreshed range tables.
//!
//! A refreshed Cloudflare table is written to a dated JSON file so repeated
//! runs on the same day do not hit the network again.

use super::fetch::fetch_cloudflare_table;
use super::table::{cloudflare_builtin, RangeSource, RangeTable};
use crate::config::Config;
use crate::error::RangeError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Dated cache file name inside `dir`, e.g. `cloudflare_ranges_2025-06-01.json`.
pub fn cache_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("cloudflare_ranges_{}.json", date.format("%Y-%m-%d")))
}

/// Read a cached table. The source is reported as [`RangeSource::Cache`].
pub fn read_range_cache(path: &Path) -> Result<RangeTable, RangeError> {
    let json = std::fs::read_to_string(path).map_err(|source| RangeError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let mut table: RangeTable =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| RangeError::Cache {
            path: path.display().to_string(),
            message: format!("path={} error={}", e.path(), e),
        })?;

    table.source = RangeSource::Cache;
    Ok(table)
}

/// Write `table` as pretty JSON to `path`.
pub fn write_range_cache(path: &Path, table: &RangeTable) -> Result<(), RangeError> {
    let json = serde_json::to_string_pretty(table).map_err(|e| RangeError::Cache {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|source| RangeError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// The Cloudflare table to use for this process.
///
/// With refresh disabled this is the builtin table. Otherwise today's cache
/// file is used, or the live lists are fetched and cached. Any failure falls
/// back to the builtin table.
pub async fn load_cloudflare_table(config: &Config) -> RangeTable {
    if !config.refresh_cloudflare {
        log::info!(
            "Using builtin Cloudflare ranges ({} ranges)",
            cloudflare_builtin().len()
        );
        return cloudflare_builtin().clone();
    }

    let today = chrono::Utc::now().date_naive();
    match read_or_fetch(config, today).await {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Falling back to builtin Cloudflare ranges: {e}");
            cloudflare_builtin().clone()
        }
    }
}

async fn read_or_fetch(config: &Config, today: NaiveDate) -> Result<RangeTable, RangeError> {
    let cache_file = cache_file_path(&config.cache_dir, today);

    if cache_file.exists() {
        log::info!("Reading Cloudflare ranges from cache file: {}", cache_file.display());
        return read_range_cache(&cache_file);
    }

    log::warn!("Cache file not found: {}", cache_file.display());
    let table = fetch_cloudflare_table(config).await?;

    log::warn!("Writing Cloudflare ranges to cache file: {}", cache_file.display());
    if let Err(e) = write_range_cache(&cache_file, &table) {
        log::warn!("Could not write range cache: {e}");
    }
    Ok(table)
}
