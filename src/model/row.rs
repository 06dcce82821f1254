use serde::{Deserialize, Serialize};

/// One GPU of one hardware entry of one orchestrator.
///
/// Serialized field names are the column headers shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    #[serde(rename = "Orchestrator")]
    pub orchestrator: String,
    #[serde(rename = "Orchestrator Name")]
    pub orchestrator_name: String,
    #[serde(rename = "GPU Name")]
    pub gpu_name: String,
    #[serde(rename = "GPU Total (GB)")]
    pub gpu_total_gb: f64,
    #[serde(rename = "GPU Free (GB)")]
    pub gpu_free_gb: f64,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Pipeline")]
    pub pipeline: String,
    #[serde(rename = "orch_uri")]
    pub orch_uri: String,
    #[serde(rename = "Capability")]
    pub capability: String,
    #[serde(rename = "Warm")]
    pub warm: bool,
}
