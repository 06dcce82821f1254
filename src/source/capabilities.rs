use crate::error::Result;
use crate::schema::RawCapabilitiesDocument;
use crate::source::http::get_json;

/// Fetch the gateway's capabilities document.
pub async fn fetch_capabilities(
    client: &reqwest::Client,
    url: &str,
) -> Result<RawCapabilitiesDocument> {
    get_json(client, url, "capabilities").await
}
