//! Presentation views: facet filters, distributions and the sorted table.

use crate::model::FlatRow;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Orchestrator display names longer than this are abbreviated.
pub const MAX_NAME_LEN: usize = 15;

/// Cut `name` to `max_len` characters and append "..." if it is longer.
pub fn abbreviate_name(name: &str, max_len: usize) -> String {
    match name.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &name[..cut]),
        None => name.to_string(),
    }
}

/// Distinct facet values of the unfiltered table, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOptions {
    pub gpus: Vec<String>,
    pub models: Vec<String>,
}

impl FacetOptions {
    pub fn from_rows(rows: &[FlatRow]) -> Self {
        Self {
            gpus: distinct(rows.iter().map(|r| r.gpu_name.as_str())),
            models: distinct(rows.iter().map(|r| r.model.as_str())),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// GPU and model selections. `None` selects every value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub gpus: Option<BTreeSet<String>>,
    pub models: Option<BTreeSet<String>>,
}

impl Filter {
    /// Build from repeated CLI/query values; an empty list means "all".
    pub fn from_selections(gpus: Vec<String>, models: Vec<String>) -> Self {
        let to_set = |v: Vec<String>| -> Option<BTreeSet<String>> {
            (!v.is_empty()).then(|| v.into_iter().collect())
        };
        Self {
            gpus: to_set(gpus),
            models: to_set(models),
        }
    }

    pub fn matches(&self, row: &FlatRow) -> bool {
        let selected =
            |set: &Option<BTreeSet<String>>, v: &str| set.as_ref().is_none_or(|s| s.contains(v));
        selected(&self.gpus, &row.gpu_name) && selected(&self.models, &row.model)
    }

    pub fn apply<'a>(&self, rows: &'a [FlatRow]) -> Vec<&'a FlatRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountView {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorCountView {
    pub orchestrator: String,
    /// Abbreviated display name.
    pub name: String,
    pub gpu_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Counted over the unfiltered table.
    pub total_gpus: usize,
    pub total_orchestrators: usize,
    pub total_capabilities: usize,
    pub options: FacetOptions,
    pub gpu_distribution: Vec<CountView>,
    pub orchestrator_distribution: Vec<OrchestratorCountView>,
    pub capability_distribution: Vec<CountView>,
    /// Filtered rows sorted descending by (GPU Name, Model).
    pub table: Vec<FlatRow>,
}

impl DashboardView {
    pub fn build(rows: &[FlatRow], filter: &Filter) -> Self {
        let filtered = filter.apply(rows);

        let orchestrators: BTreeSet<&str> =
            filtered.iter().map(|r| r.orchestrator.as_str()).collect();

        let capability_distribution =
            value_counts(filtered.iter().map(|r| r.capability.as_str()));

        let mut table: Vec<FlatRow> = filtered.iter().map(|r| (*r).clone()).collect();
        table.sort_by(|a, b| {
            b.gpu_name
                .cmp(&a.gpu_name)
                .then_with(|| b.model.cmp(&a.model))
        });

        Self {
            total_gpus: rows.len(),
            total_orchestrators: orchestrators.len(),
            total_capabilities: capability_distribution.len(),
            options: FacetOptions::from_rows(rows),
            gpu_distribution: value_counts(filtered.iter().map(|r| r.gpu_name.as_str())),
            orchestrator_distribution: orchestrator_counts(&filtered),
            capability_distribution,
            table,
        }
    }
}

/// Count per value, descending; ties keep first-appearance order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CountView> {
    let mut counts: Vec<CountView> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        match index.get(v) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(v, counts.len());
                counts.push(CountView {
                    label: v.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// GPUs per (address, display name), descending; ties in key order.
fn orchestrator_counts(rows: &[&FlatRow]) -> Vec<OrchestratorCountView> {
    let mut grouped: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in rows {
        *grouped
            .entry((r.orchestrator.as_str(), r.orchestrator_name.as_str()))
            .or_default() += 1;
    }

    let mut out: Vec<OrchestratorCountView> = grouped
        .into_iter()
        .map(|((addr, name), gpu_count)| OrchestratorCountView {
            orchestrator: addr.to_string(),
            name: abbreviate_name(name, MAX_NAME_LEN),
            gpu_count,
        })
        .collect();
    out.sort_by(|a, b| b.gpu_count.cmp(&a.gpu_count));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(orch: &str, name: &str, gpu: &str, model: &str, cap: &str) -> FlatRow {
        FlatRow {
            orchestrator: orch.into(),
            orchestrator_name: name.into(),
            gpu_name: gpu.into(),
            gpu_total_gb: 24.0,
            gpu_free_gb: 1.0,
            model: model.into(),
            pipeline: "text-to-image".into(),
            orch_uri: format!("https://{}:8935", orch),
            capability: cap.into(),
            warm: false,
        }
    }

    fn sample() -> Vec<FlatRow> {
        vec![
            row("0xa", "alpha.eth", "RTX 4090", "sd-turbo", "Text to image"),
            row("0xa", "alpha.eth", "A100", "sd-turbo", "Text to image"),
            row("0xb", "a-very-long-orchestrator.eth", "RTX 4090", "whisper", "Audio to text"),
            row("0xb", "a-very-long-orchestrator.eth", "RTX 4090", "sd-turbo", "unknown"),
            row("0xc", "0xc", "RTX 3090", "whisper", "Audio to text"),
        ]
    }

    #[test]
    fn abbreviation_boundary() {
        assert_eq!(abbreviate_name("abcdefghijklmno", 15), "abcdefghijklmno");
        assert_eq!(abbreviate_name("abcdefghijklmnop", 15), "abcdefghijklmno...");
        assert_eq!(abbreviate_name("", 15), "");
        // Counted in characters, not bytes.
        let fifteen = "é".repeat(15);
        assert_eq!(abbreviate_name(&fifteen, 15), fifteen);
        assert_eq!(abbreviate_name(&"é".repeat(16), 15), format!("{}...", fifteen));
    }

    #[test]
    fn options_are_distinct_in_first_appearance_order() {
        let opts = FacetOptions::from_rows(&sample());
        assert_eq!(opts.gpus, vec!["RTX 4090", "A100", "RTX 3090"]);
        assert_eq!(opts.models, vec!["sd-turbo", "whisper"]);
    }

    #[test]
    fn filter_is_an_intersection() {
        let rows = sample();

        let all = Filter::default();
        assert_eq!(all.apply(&rows).len(), rows.len());

        let gpu_only = Filter::from_selections(vec!["RTX 4090".into()], vec![]);
        let kept = gpu_only.apply(&rows);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|r| r.gpu_name == "RTX 4090"));

        // Selecting every model explicitly is the same as selecting none.
        let every_model = Filter::from_selections(
            vec!["RTX 4090".into()],
            FacetOptions::from_rows(&rows).models,
        );
        assert_eq!(every_model.apply(&rows), kept);

        let both = Filter::from_selections(vec!["RTX 4090".into()], vec!["whisper".into()]);
        let kept = both.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].orchestrator, "0xb");

        let nothing = Filter {
            gpus: Some(BTreeSet::new()),
            models: None,
        };
        assert!(nothing.apply(&rows).is_empty());
    }

    #[test]
    fn dashboard_counts_and_ordering() {
        let rows = sample();
        let view = DashboardView::build(&rows, &Filter::default());

        assert_eq!(view.total_gpus, 5);
        assert_eq!(view.total_orchestrators, 3);
        assert_eq!(view.total_capabilities, 3);
        assert_eq!(
            view.gpu_distribution,
            vec![
                CountView { label: "RTX 4090".into(), count: 3 },
                CountView { label: "A100".into(), count: 1 },
                CountView { label: "RTX 3090".into(), count: 1 },
            ]
        );
        assert_eq!(
            view.orchestrator_distribution,
            vec![
                OrchestratorCountView {
                    orchestrator: "0xa".into(),
                    name: "alpha.eth".into(),
                    gpu_count: 2,
                },
                OrchestratorCountView {
                    orchestrator: "0xb".into(),
                    name: "a-very-long-orc...".into(),
                    gpu_count: 2,
                },
                OrchestratorCountView {
                    orchestrator: "0xc".into(),
                    name: "0xc".into(),
                    gpu_count: 1,
                },
            ]
        );

        let order: Vec<(&str, &str)> = view
            .table
            .iter()
            .map(|r| (r.gpu_name.as_str(), r.model.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("RTX 4090", "whisper"),
                ("RTX 4090", "sd-turbo"),
                ("RTX 4090", "sd-turbo"),
                ("RTX 3090", "whisper"),
                ("A100", "sd-turbo"),
            ]
        );
    }

    #[test]
    fn totals_follow_filter_except_gpu_total() {
        let rows = sample();
        let filter = Filter::from_selections(vec![], vec!["whisper".into()]);
        let view = DashboardView::build(&rows, &filter);

        assert_eq!(view.total_gpus, 5);
        assert_eq!(view.total_orchestrators, 2);
        assert_eq!(view.total_capabilities, 1);
        assert_eq!(view.table.len(), 2);
        assert_eq!(view.options, FacetOptions::from_rows(&rows));
    }
}
