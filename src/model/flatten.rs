use crate::error::{DashboardError, Result};
use crate::model::FlatRow;
use crate::schema::capabilities::UNKNOWN;
use crate::schema::{CapabilityConstraint, GpuInfo, RawCapabilitiesDocument};
use crate::model::NameDirectory;

use indexmap::IndexMap;

const BYTES_PER_GB: f64 = 1e9;

/// Flatten the capabilities document into one row per GPU entry.
///
/// Performs:
/// - name resolution by lowercased address (raw address when unresolved)
/// - capability attribution: first constraint, in document order, whose
///   `models` lists the hardware's model
/// - warm flag: true if any constraint marks the model warm
///
/// A GPU entry without `name`, `memory_total` or `memory_free` fails the whole
/// call; no partial table is returned.
pub fn flatten(doc: &RawCapabilitiesDocument, names: &NameDirectory) -> Result<Vec<FlatRow>> {
    let empty = IndexMap::new();
    let mut rows = Vec::new();

    for orch in &doc.orchestrators {
        let orch_name = names
            .get(&orch.address.to_lowercase())
            .cloned()
            .unwrap_or_else(|| orch.address.clone());
        let constraints = orch.per_capability().unwrap_or(&empty);

        for (hw_idx, hw) in orch.hardware().iter().enumerate() {
            let model = hw.model_id();
            let capability = resolve_capability(constraints, &doc.capabilities_names, model);
            let warm = resolve_warm(constraints, model);

            for (gpu_key, gpu) in &hw.gpu_info {
                let entity = || {
                    format!(
                        "gpu_info[{:?}] of hardware[{}] of orchestrator {}",
                        gpu_key, hw_idx, orch.address
                    )
                };
                let (gpu_name, memory_total, memory_free) = required_gpu_fields(gpu, entity)?;

                rows.push(FlatRow {
                    orchestrator: orch.address.clone(),
                    orchestrator_name: orch_name.clone(),
                    gpu_name: gpu_name.to_string(),
                    gpu_total_gb: bytes_to_gb(memory_total),
                    gpu_free_gb: bytes_to_gb(memory_free),
                    model: model.to_string(),
                    pipeline: hw.pipeline().to_string(),
                    orch_uri: orch.orch_uri.clone(),
                    capability: capability.clone(),
                    warm,
                });
            }
        }
    }

    Ok(rows)
}

/// First match only. A matched id without a display name is still the match.
fn resolve_capability(
    constraints: &IndexMap<String, CapabilityConstraint>,
    capability_names: &IndexMap<String, String>,
    model: &str,
) -> String {
    constraints
        .iter()
        .find(|(_, c)| c.models.contains_key(model))
        .and_then(|(id, _)| capability_names.get(id))
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Any match, independent of which constraint supplied the capability name.
fn resolve_warm(constraints: &IndexMap<String, CapabilityConstraint>, model: &str) -> bool {
    constraints
        .values()
        .any(|c| c.models.get(model).is_some_and(|m| m.is_warm()))
}

fn required_gpu_fields(
    gpu: &GpuInfo,
    entity: impl Fn() -> String,
) -> Result<(&str, u64, u64)> {
    let missing = |field| DashboardError::MissingField {
        entity: entity(),
        field,
    };
    let name = gpu.name.as_deref().ok_or_else(|| missing("name"))?;
    let total = gpu.memory_total.ok_or_else(|| missing("memory_total"))?;
    let free = gpu.memory_free.ok_or_else(|| missing("memory_free"))?;
    Ok((name, total, free))
}

/// Bytes to GB rounded to one decimal, half away from zero.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 10.0).round() / 10.0
}
