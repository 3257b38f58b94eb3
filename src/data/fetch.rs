//! Remote CSV download with an on-disk cache.
//!
//! The gate datasets live at stable URLs and change at most daily, so a
//! fetched copy is kept under the user cache dir and reused within the TTL.
//! A stale copy still serves as fallback when the network is down.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use crate::consts::DOWNLOAD_CACHE_TTL;
use crate::data::Direction;
use crate::error::AppError;

pub(crate) fn cache_path(direction: Direction) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".cache").join("yorcast").join(direction.cache_file()))
}

fn load_cache(path: &PathBuf) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn load_cache_if_fresh(path: &PathBuf, ttl: Duration) -> Option<(String, Duration)> {
    let meta = fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    let age = SystemTime::now().duration_since(modified).ok()?;
    if age > ttl {
        return None;
    }
    load_cache(path).map(|text| (text, age))
}

fn save_cache(path: &PathBuf, text: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = fs::write(path, text);
}

fn download(url: &str) -> Result<String, AppError> {
    let response = ureq::get(url).call().map_err(|e| AppError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let mut body = response.into_body();
    let mut text = String::new();
    body.as_reader()
        .read_to_string(&mut text)
        .map_err(|e| AppError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(text)
}

/// Fetch a direction's CSV, preferring a fresh cached copy. With `offline`,
/// any cached copy wins and the network is never touched.
pub(crate) fn fetch_csv(
    url: &str,
    direction: Direction,
    offline: bool,
    quiet: bool,
) -> Result<String, AppError> {
    let start = Instant::now();
    let path = cache_path(direction);

    if offline {
        if let Some(path) = &path
            && let Some(text) = load_cache(path)
        {
            if !quiet {
                eprintln!("Using cached {} data", direction.display_name());
            }
            return Ok(text);
        }
        return Err(AppError::OfflineNoCache {
            url: url.to_string(),
        });
    }

    if let Some(path) = &path
        && let Some((text, age)) = load_cache_if_fresh(path, DOWNLOAD_CACHE_TTL)
    {
        if !quiet {
            eprintln!(
                "Using cached {} data ({:.1}h old)",
                direction.display_name(),
                age.as_secs_f64() / 3600.0
            );
        }
        return Ok(text);
    }

    if !quiet {
        eprint!("Fetching {} data...", direction.display_name());
    }
    match download(url) {
        Ok(text) => {
            if let Some(path) = &path {
                save_cache(path, &text);
            }
            if !quiet {
                eprintln!(
                    " {} bytes ({:.2}ms)",
                    text.len(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            Ok(text)
        }
        Err(err) => {
            if !quiet {
                eprintln!(" failed, trying cache...");
            }
            if let Some(path) = &path
                && let Some(text) = load_cache(path)
            {
                if !quiet {
                    eprintln!("Using stale cached {} data", direction.display_name());
                }
                return Ok(text);
            }
            Err(err)
        }
    }
}
