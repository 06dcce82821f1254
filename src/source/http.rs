use crate::error::{DashboardError, Result};

use serde::de::DeserializeOwned;
use tracing::debug;

/// GET `url` and decode the body as JSON.
///
/// Transport errors and non-2xx statuses map to `Fetch`, bad bodies to `Decode`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    source_name: &'static str,
) -> Result<T> {
    let fetch = |error| DashboardError::Fetch { source_name, error };

    debug!(source = source_name, url, "fetching");
    let body = client
        .get(url)
        .send()
        .await
        .map_err(fetch)?
        .error_for_status()
        .map_err(fetch)?
        .bytes()
        .await
        .map_err(fetch)?;

    serde_json::from_slice(&body).map_err(|error| DashboardError::Decode { source_name, error })
}
