//! Upstream sources: the ENS name directory and the capabilities document.
//!
//! A load cycle fetches the directory first, then the capabilities document,
//! and flattens the pair into rows. Any failure fails the whole cycle.

pub mod capabilities;
pub mod ens;
mod http;

pub use capabilities::fetch_capabilities;
pub use ens::fetch_name_directory;

use crate::config::Settings;
use crate::error::Result;
use crate::model::{FlatRow, flatten};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

/// Rows of one completed load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub rows: Vec<FlatRow>,
    pub fetched_at: DateTime<Utc>,
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self) -> Result<Snapshot>;
}

/// Loads snapshots from the configured HTTP endpoints.
pub struct HttpSource {
    client: reqwest::Client,
    settings: Settings,
}

impl HttpSource {
    pub fn new(settings: Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn load(&self) -> Result<Snapshot> {
        let names = fetch_name_directory(&self.client, &self.settings.ens_url).await?;
        let doc = fetch_capabilities(&self.client, &self.settings.capabilities_url).await?;
        let rows = flatten(&doc, &names)?;

        info!(
            orchestrators = doc.orchestrators.len(),
            names = names.len(),
            rows = rows.len(),
            "loaded capabilities snapshot"
        );
        Ok(Snapshot {
            rows,
            fetched_at: Utc::now(),
        })
    }
}
