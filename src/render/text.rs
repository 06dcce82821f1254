use crate::view::{CountView, DashboardView};

use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};

/// Render the dashboard views as terminal tables.
pub fn render_text_summary(view: &DashboardView) -> String {
    render_tables(view, None)
}

/// `width` pins the table width; `None` follows the terminal.
fn render_tables(view: &DashboardView, width: Option<u16>) -> String {
    let new_table = |headers: &[&str]| {
        let mut table = styled_table(headers);
        if let Some(w) = width {
            table.set_width(w);
        }
        table
    };
    let counts_table = |header: &str, items: &[CountView]| {
        let mut table = new_table(&[header, "Count"]);
        add_counts(&mut table, items);
        table
    };
    let mut sections = Vec::new();

    sections.push(section(
        "GPU Type Distribution",
        "Total GPUs",
        view.total_gpus,
        counts_table("GPU Model", &view.gpu_distribution),
    ));

    let mut orchestrators = new_table(&["Orchestrator Name", "GPU Count", "Orchestrator"]);
    for o in &view.orchestrator_distribution {
        orchestrators.add_row(vec![
            Cell::new(&o.name),
            Cell::new(o.gpu_count).set_alignment(CellAlignment::Right),
            Cell::new(&o.orchestrator),
        ]);
    }
    sections.push(section(
        "Orchestrator GPU Distribution",
        "Total Orchestrators",
        view.total_orchestrators,
        orchestrators,
    ));

    sections.push(section(
        "Capabilities Distribution",
        "Total Capabilities",
        view.total_capabilities,
        counts_table("Capability Name", &view.capability_distribution),
    ));

    let mut data = new_table(&[
        "GPU Name",
        "Model",
        "Orchestrator Name",
        "GPU Total (GB)",
        "GPU Free (GB)",
        "Warm",
        "Capability",
    ]);
    for r in &view.table {
        data.add_row(vec![
            Cell::new(&r.gpu_name),
            Cell::new(&r.model),
            Cell::new(&r.orchestrator_name),
            Cell::new(format!("{:.1}", r.gpu_total_gb)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", r.gpu_free_gb)).set_alignment(CellAlignment::Right),
            Cell::new(r.warm),
            Cell::new(&r.capability),
        ]);
    }
    sections.push(format!("Data Table ({} rows)\n{}\n", view.table.len(), data));

    sections.join("\n")
}

fn section(title: &str, total_label: &str, total: usize, table: Table) -> String {
    format!("{}\n{}: {}\n{}\n", title, total_label, total, table)
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn add_counts(table: &mut Table, items: &[CountView]) {
    for c in items {
        table.add_row(vec![
            Cell::new(&c.label),
            Cell::new(c.count).set_alignment(CellAlignment::Right),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlatRow;
    use crate::view::Filter;
    use pretty_assertions::assert_eq;

    const WIDTH: Option<u16> = Some(200);

    fn row(gpu: &str, name: &str) -> FlatRow {
        FlatRow {
            orchestrator: "0xa".into(),
            orchestrator_name: name.into(),
            gpu_name: gpu.into(),
            gpu_total_gb: 25.4,
            gpu_free_gb: 1.5,
            model: "sd-turbo".into(),
            pipeline: "text-to-image".into(),
            orch_uri: "https://0xa:8935".into(),
            capability: "Text to image".into(),
            warm: true,
        }
    }

    fn line_with<'a>(text: &'a str, needle: &str) -> &'a str {
        text.lines()
            .find(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("no line contains {:?} in\n{}", needle, text))
    }

    #[test]
    fn summary_lists_every_section() {
        let rows = vec![row("RTX 4090", "alpha.eth"), row("RTX 4090", "alpha.eth")];
        let text = render_tables(&DashboardView::build(&rows, &Filter::default()), WIDTH);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "GPU Type Distribution");
        assert_eq!(lines[1], "Total GPUs: 2");
        assert!(text.contains("Total Orchestrators: 1"));
        assert!(text.contains("Total Capabilities: 1"));
        assert!(text.contains("Data Table (2 rows)"));

        // Each distribution is a bordered table with the count in the same row.
        let gpu_row = line_with(&text, "│ RTX 4090");
        assert!(gpu_row.trim_end().ends_with("2 │"), "{}", gpu_row);
        let orch_row = line_with(&text, "│ alpha.eth");
        assert!(orch_row.contains("0xa"), "{}", orch_row);

        let data_row = line_with(&text, "25.4");
        for cell in ["sd-turbo", "1.5", "true", "Text to image"] {
            assert!(data_row.contains(cell), "{} missing from {}", cell, data_row);
        }
    }

    #[test]
    fn empty_selection_still_renders_headers() {
        let rows = vec![row("RTX 4090", "alpha.eth")];
        let filter = Filter::from_selections(vec!["A100".into()], vec![]);
        let text = render_tables(&DashboardView::build(&rows, &filter), WIDTH);

        assert!(text.contains("Total GPUs: 1"));
        assert!(text.contains("Total Orchestrators: 0"));
        assert!(text.contains("Data Table (0 rows)"));
        assert!(line_with(&text, "GPU Total (GB)").contains("Capability"));
    }
}
