//! Capabilities document published by the gateway.
//!
//! JSON shape:
//! {
//!   "orchestrators": [
//!     {
//!       "address": "0xabc...",
//!       "orch_uri": "https://1.2.3.4:8935",
//!       "capabilities": {
//!         "constraints": {
//!           "PerCapability": {
//!             "27": { "models": { "stabilityai/sd-turbo": { "warm": true } } }
//!           }
//!         }
//!       },
//!       "hardware": [
//!         {
//!           "pipeline": "text-to-image",
//!           "model_id": "stabilityai/sd-turbo",
//!           "gpu_info": {
//!             "0": { "name": "NVIDIA GeForce RTX 4090", "memory_total": 25393692672, "memory_free": 1024 }
//!           }
//!         }
//!       ]
//!     }
//!   ],
//!   "capabilities_names": { "27": "Text to image" }
//! }
//!
//! Everything below `orchestrators[*]` except `address` and `orch_uri` is
//! optional and defaults to empty. GPU fields stay optional here and are
//! checked when rows are built, so the error can name the offending entry.

use indexmap::IndexMap;
use serde::Deserialize;

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct RawCapabilitiesDocument {
    pub orchestrators: Vec<OrchestratorRecord>,

    #[serde(default)]
    pub capabilities_names: IndexMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorRecord {
    pub address: String,
    pub orch_uri: String,

    #[serde(default)]
    pub capabilities: Option<Capabilities>,

    /// Absent and `null` both mean "no hardware".
    #[serde(default)]
    pub hardware: Option<Vec<HardwareEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Constraints {
    #[serde(default, rename = "PerCapability")]
    pub per_capability: Option<IndexMap<String, CapabilityConstraint>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapabilityConstraint {
    #[serde(default)]
    pub models: IndexMap<String, ModelConstraint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConstraint {
    #[serde(default)]
    pub warm: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HardwareEntry {
    #[serde(default)]
    pub model_id: Option<String>,

    #[serde(default)]
    pub pipeline: Option<String>,

    #[serde(default)]
    pub gpu_info: IndexMap<String, GpuInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GpuInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub memory_total: Option<u64>,

    #[serde(default)]
    pub memory_free: Option<u64>,
}

impl OrchestratorRecord {
    /// The `PerCapability` constraint map, empty when any level is missing.
    pub fn per_capability(&self) -> Option<&IndexMap<String, CapabilityConstraint>> {
        self.capabilities
            .as_ref()
            .and_then(|c| c.constraints.as_ref())
            .and_then(|c| c.per_capability.as_ref())
    }

    pub fn hardware(&self) -> &[HardwareEntry] {
        self.hardware.as_deref().unwrap_or_default()
    }
}

impl ModelConstraint {
    pub fn is_warm(&self) -> bool {
        self.warm.unwrap_or(false)
    }
}

impl HardwareEntry {
    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn pipeline(&self) -> &str {
        self.pipeline.as_deref().unwrap_or(UNKNOWN)
    }
}
