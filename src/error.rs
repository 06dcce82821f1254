//! Error taxonomy for a dashboard load cycle.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required setting is missing; raised before anything is fetched.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure or non-2xx status from an upstream source.
    #[error("failed to fetch {source_name}: {error}")]
    Fetch {
        source_name: &'static str,
        #[source]
        error: reqwest::Error,
    },

    /// The upstream body was not the JSON shape we expect.
    #[error("malformed {source_name} document: {error}")]
    Decode {
        source_name: &'static str,
        #[source]
        error: serde_json::Error,
    },

    /// A GPU entry lacks one of its required fields.
    #[error("missing required field `{field}` on {entity}")]
    MissingField { entity: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
