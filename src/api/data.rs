use crate::models::{Infrastructure, Timetable};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Fetch the infrastructure document
///
/// # Errors
///
/// Returns an error if:
/// - The URL cannot be resolved
/// - The HTTP request fails
/// - The response status is not ok
/// - The response body cannot be deserialized
pub async fn fetch_infrastructure(url: &str) -> Result<Infrastructure, String> {
    fetch_json(url).await
}

/// Fetch the timetable document
///
/// # Errors
///
/// Same conditions as [`fetch_infrastructure`].
pub async fn fetch_timetable(url: &str) -> Result<Timetable, String> {
    fetch_json(url).await
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let url = resolve_url(url)?;
    reqwest::get(url.clone())
        .await
        .map_err(|e| format!("Request for {url} failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Request for {url} failed: {e}"))?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to deserialize {url}: {e}"))
}

/// Resolve a possibly relative URL against the page location
fn resolve_url(url: &str) -> Result<Url, String> {
    if let Ok(absolute) = Url::parse(url) {
        return Ok(absolute);
    }
    let window = web_sys::window().ok_or("No window available")?;
    let base = window
        .location()
        .href()
        .map_err(|_| "Failed to read page location")?;
    join_url(&base, url)
}

fn join_url(base: &str, url: &str) -> Result<Url, String> {
    Url::parse(base)
        .and_then(|base| base.join(url))
        .map_err(|e| format!("Invalid data URL {url}: {e}"))
}
