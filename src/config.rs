//! Runtime settings resolved from CLI flags and the environment.

use crate::error::{DashboardError, Result};

pub const DEFAULT_ENS_DATA_URL: &str = "https://explorer.livepeer.org/api/ens-data";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub capabilities_url: String,
    pub ens_url: String,
}

impl Settings {
    /// Validate raw values. The capabilities URL has no default: an unset or
    /// blank value is a configuration error.
    pub fn resolve(capabilities_url: Option<String>, ens_url: Option<String>) -> Result<Self> {
        let capabilities_url = capabilities_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                DashboardError::Config(
                    "the CAPABILITIES_DATA_URL environment variable is not set; \
                     set it (or pass --capabilities-url) before running"
                        .to_string(),
                )
            })?;

        let ens_url = ens_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_ENS_DATA_URL.to_string());

        Ok(Self {
            capabilities_url,
            ens_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_capabilities_url_is_fatal() {
        let err = Settings::resolve(None, None).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));

        let err = Settings::resolve(Some("   ".into()), None).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn ens_url_defaults_when_unset() {
        let s = Settings::resolve(Some("http://gw/capabilities".into()), None).unwrap();
        assert_eq!(
            s,
            Settings {
                capabilities_url: "http://gw/capabilities".into(),
                ens_url: DEFAULT_ENS_DATA_URL.into(),
            }
        );

        let s = Settings::resolve(Some("http://gw".into()), Some("http://ens".into())).unwrap();
        assert_eq!(s.ens_url, "http://ens");
    }
}
