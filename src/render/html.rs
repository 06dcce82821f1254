use crate::model::FlatRow;
use crate::view::{FacetOptions, MAX_NAME_LEN};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the page needs; embedded as a JSON literal.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// Served by `serve`: the page shows a reload button.
    pub live: bool,
    pub generation: u64,
    /// When the snapshot behind these rows was fetched.
    pub fetched_at: DateTime<Utc>,
    pub max_name_len: usize,
    pub options: FacetOptions,
    pub rows: Vec<FlatRow>,
}

impl DashboardData {
    pub fn new(rows: Vec<FlatRow>, fetched_at: DateTime<Utc>, live: bool, generation: u64) -> Self {
        Self {
            live,
            generation,
            fetched_at,
            max_name_len: MAX_NAME_LEN,
            options: FacetOptions::from_rows(&rows),
            rows,
        }
    }
}

/// Render a self-contained HTML dashboard (data embedded as JSON).
///
/// Filtering, distributions and table sorting run client side over the
/// embedded rows, with the same rules as `view::DashboardView`.
///
/// Important: we avoid `format!()` because the page contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_dashboard(data: &DashboardData) -> anyhow::Result<String> {
    // "</" inside a string would end the script element early.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Livepeer AI GPU and Job Dashboard</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; display: flex; align-items: center; gap: 16px; }
  header h1 { font-size: 20px; margin: 0; flex: 1; }
  .container { display: flex; min-height: calc(100vh - 58px); }
  .sidebar { width: 300px; border-right: 1px solid #ddd; padding: 12px; }
  .sidebar select { width: 100%; min-height: 160px; margin-bottom: 12px; }
  .sidebar label { display: block; font-weight: 600; margin-bottom: 4px; }
  .main { flex: 1; padding: 12px 24px; overflow: auto; }

  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; font-size: 14px; }
  .muted { color: #777; font-size: 13px; }
  .charts { display: flex; gap: 24px; flex-wrap: wrap; align-items: flex-start; }
  .legend div { font-size: 13px; margin: 2px 0; }
  .swatch { display: inline-block; width: 10px; height: 10px; margin-right: 6px; border-radius: 2px; }

  .bars { flex: 1; min-width: 320px; }
  .bar-row { display: flex; align-items: center; gap: 8px; margin: 3px 0; font-size: 13px; }
  .bar-label { width: 180px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
  .bar { height: 16px; background: #4c78a8; border-radius: 2px; }

  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 13px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; cursor: pointer; user-select: none; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 12px; }
</style>
</head>
<body>
<header>
  <h1>Livepeer AI GPU and Job Dashboard</h1>
  <span class="muted" id="generation"></span>
  <button id="reload" style="display:none; padding: 6px 10px;">Reload Data</button>
</header>

<div class="container">
  <div class="sidebar">
    <label for="gpuSelect">GPU Model</label>
    <select id="gpuSelect" multiple></select>
    <label for="modelSelect">AI Model</label>
    <select id="modelSelect" multiple></select>
    <button id="selectAll" style="padding: 6px 10px;">Select all</button>
  </div>

  <div class="main">
    <p>
      Explore the GPU resources and AI capabilities across the Livepeer AI network. This
      dashboard provides a detailed view of the compute landscape, including GPU distribution,
      capabilities, orchestrator-specific details, and insights into the
      <code>/capabilities</code> endpoint data.
    </p>
    <p><u>Limitations of the Data Source</u></p>
    <ul class="muted">
      <li><b>Snapshot of the Network:</b> Data represents a snapshot of orchestrators and
        capabilities as seen by the gateway at the time of parsing. Not all orchestrators may
        have been discovered.</li>
      <li><b>Active GPUs Only:</b> Only GPUs ready to take jobs are shown; attached but inactive
        GPUs are excluded.</li>
      <li><b>Gateway-Specific View:</b> Data is collected from a single gateway, which may not
        have visibility into all orchestrators and GPUs.</li>
      <li><b>Transcoding Network Exclusion:</b> GPUs part of the transcoding network are not
        included.</li>
      <li><b>Realtime AI GPUs Exclusion:</b> Still in beta and not discoverable on chain.</li>
    </ul>
    <p><u>Future Improvements</u></p>
    <p class="muted">
      We plan to create a decentralized data aggregator to collect data from orchestrator and
      gateway nodes. This will provide a more complete and accurate picture of the compute
      landscape, improving visibility into GPUs, orchestrators, and capabilities across the
      network.
    </p>

    <h2>GPU Type Distribution</h2>
    <span class="pill">Total GPUs: <b id="totalGpus"></b></span>
    <div class="charts" id="gpuCharts"></div>

    <h2>Orchestrator GPU Distribution</h2>
    <span class="pill">Total Orchestrators: <b id="totalOrchs"></b></span>
    <div class="charts" id="orchCharts"></div>

    <h2>Capabilities Distribution</h2>
    <span class="pill">Total Capabilities: <b id="totalCaps"></b></span>
    <div class="charts" id="capCharts"></div>

    <h2>Data Table</h2>
    <table>
      <thead><tr id="tableHead"></tr></thead>
      <tbody id="tableBody"></tbody>
    </table>
  </div>
</div>

<script>
// Embedded dashboard data (JSON object literal)
const DATA = __DATA__;

const COLUMNS = [
  "GPU Name", "Model", "Orchestrator Name", "Orchestrator", "Capability", "Pipeline",
  "GPU Total (GB)", "GPU Free (GB)", "Warm", "orch_uri"
];
const NUMERIC = new Set(["GPU Total (GB)", "GPU Free (GB)"]);
const PALETTE = [
  "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b",
  "#eeca3b", "#b279a2", "#ff9da6", "#9d755d", "#bab0ac"
];

// null sort = default order: descending by (GPU Name, Model).
const state = { sort: null, desc: true };

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function abbreviate(name) {
  const chars = Array.from(name);
  return chars.length <= DATA.max_name_len ? name : chars.slice(0, DATA.max_name_len).join("") + "...";
}

function cmp(a, b) {
  return a < b ? -1 : (a > b ? 1 : 0);
}

function fillSelect(id, values) {
  const el = document.getElementById(id);
  el.innerHTML = "";
  for (const v of values) {
    const opt = document.createElement("option");
    opt.value = v;
    opt.textContent = v;
    opt.selected = true;
    el.appendChild(opt);
  }
  el.addEventListener("change", render);
}

function selected(id) {
  return new Set(Array.from(document.getElementById(id).selectedOptions).map(o => o.value));
}

// Count per value, descending; ties keep first-appearance order.
function valueCounts(rows, key) {
  const counts = new Map();
  for (const r of rows) counts.set(r[key], (counts.get(r[key]) || 0) + 1);
  return Array.from(counts, ([label, count]) => ({ label, count }))
    .sort((a, b) => b.count - a.count);
}

// GPUs per (address, name), grouped in key order, then count descending.
function orchestratorCounts(rows) {
  const groups = new Map();
  for (const r of rows) {
    const key = JSON.stringify([r["Orchestrator"], r["Orchestrator Name"]]);
    groups.set(key, (groups.get(key) || 0) + 1);
  }
  return Array.from(groups.keys())
    .map(k => JSON.parse(k))
    .sort((a, b) => cmp(a[0], b[0]) || cmp(a[1], b[1]))
    .map(([addr, name]) => ({
      label: abbreviate(name),
      title: addr,
      count: groups.get(JSON.stringify([addr, name]))
    }))
    .sort((a, b) => b.count - a.count);
}

function pie(items) {
  const total = items.reduce((s, x) => s + x.count, 0);
  if (!total) return '<div class="muted">No data</div>';
  const r = 80, c = 90;
  let angle = -Math.PI / 2;
  let paths = "";
  items.forEach((x, i) => {
    const color = PALETTE[i % PALETTE.length];
    if (x.count === total) {
      paths += `<circle cx="${c}" cy="${c}" r="${r}" fill="${color}"><title>${escapeHtml(x.label)}: ${x.count}</title></circle>`;
      return;
    }
    const next = angle + 2 * Math.PI * x.count / total;
    const large = next - angle > Math.PI ? 1 : 0;
    const x0 = c + r * Math.cos(angle), y0 = c + r * Math.sin(angle);
    const x1 = c + r * Math.cos(next), y1 = c + r * Math.sin(next);
    paths += `<path d="M${c},${c} L${x0},${y0} A${r},${r} 0 ${large} 1 ${x1},${y1} Z" fill="${color}">` +
      `<title>${escapeHtml(x.label)}: ${x.count}</title></path>`;
    angle = next;
  });
  // Donut hole, 30% of the radius.
  paths += `<circle cx="${c}" cy="${c}" r="${r * 0.3}" fill="white"></circle>`;
  const legend = items.map((x, i) =>
    `<div><span class="swatch" style="background:${PALETTE[i % PALETTE.length]}"></span>` +
    `${escapeHtml(x.label)} (${(100 * x.count / total).toFixed(1)}%)</div>`).join("");
  return `<svg width="${2 * c}" height="${2 * c}">${paths}</svg><div class="legend">${legend}</div>`;
}

function bars(items) {
  const max = items.reduce((m, x) => Math.max(m, x.count), 0);
  const rows = items.map(x =>
    `<div class="bar-row"><span class="bar-label" title="${escapeHtml(x.title || x.label)}">${escapeHtml(x.label)}</span>` +
    `<span class="bar" style="width:${max ? (300 * x.count / max) : 0}px"></span><span>${x.count}</span></div>`).join("");
  return `<div class="bars">${rows}</div>`;
}

function renderCharts(id, items) {
  document.getElementById(id).innerHTML = `<div>${pie(items)}</div>${bars(items)}`;
}

function sortedRows(rows) {
  const out = rows.slice();
  if (state.sort === null) {
    out.sort((a, b) => cmp(b["GPU Name"], a["GPU Name"]) || cmp(b["Model"], a["Model"]));
  } else {
    const k = state.sort;
    out.sort((a, b) => state.desc ? cmp(b[k], a[k]) : cmp(a[k], b[k]));
  }
  return out;
}

function renderTable(rows) {
  const head = document.getElementById("tableHead");
  head.innerHTML = "";
  for (const col of COLUMNS) {
    const th = document.createElement("th");
    const arrow = state.sort === col ? (state.desc ? " ▾" : " ▴") : "";
    th.textContent = col + arrow;
    if (NUMERIC.has(col)) th.className = "num";
    th.onclick = () => {
      if (state.sort === col) state.desc = !state.desc;
      else { state.sort = col; state.desc = true; }
      render();
    };
    head.appendChild(th);
  }

  const body = document.getElementById("tableBody");
  body.innerHTML = "";
  for (const r of sortedRows(rows)) {
    const tr = document.createElement("tr");
    tr.innerHTML = COLUMNS.map(col => {
      const v = r[col];
      if (NUMERIC.has(col)) return `<td class="num">${Number(v).toFixed(1)}</td>`;
      if (col === "Orchestrator" || col === "orch_uri") return `<td><code>${escapeHtml(v)}</code></td>`;
      return `<td>${escapeHtml(v)}</td>`;
    }).join("");
    body.appendChild(tr);
  }
}

function render() {
  const gpus = selected("gpuSelect");
  const models = selected("modelSelect");
  const rows = DATA.rows.filter(r => gpus.has(r["GPU Name"]) && models.has(r["Model"]));

  document.getElementById("totalGpus").textContent = DATA.rows.length;
  renderCharts("gpuCharts", valueCounts(rows, "GPU Name"));

  document.getElementById("totalOrchs").textContent = new Set(rows.map(r => r["Orchestrator"])).size;
  renderCharts("orchCharts", orchestratorCounts(rows));

  const caps = valueCounts(rows, "Capability");
  document.getElementById("totalCaps").textContent = caps.length;
  renderCharts("capCharts", caps);

  renderTable(rows);
}

function selectAll() {
  for (const id of ["gpuSelect", "modelSelect"]) {
    for (const opt of document.getElementById(id).options) opt.selected = true;
  }
  render();
}

async function reload() {
  const btn = document.getElementById("reload");
  btn.disabled = true;
  btn.textContent = "Reloading...";
  try {
    const resp = await fetch("reload", { method: "POST" });
    if (!resp.ok) throw new Error(await resp.text());
    window.location.reload();
  } catch (e) {
    btn.disabled = false;
    btn.textContent = "Reload Data";
    alert("Reload failed: " + e.message);
  }
}

if (DATA.live) {
  const btn = document.getElementById("reload");
  btn.style.display = "inline-block";
  btn.onclick = reload;
}
{
  const fetched = new Date(DATA.fetched_at).toLocaleString();
  document.getElementById("generation").textContent = DATA.live
    ? `snapshot #${DATA.generation}, fetched ${fetched}`
    : `fetched ${fetched}`;
}
document.getElementById("selectAll").onclick = selectAll;
fillSelect("gpuSelect", DATA.options.gpus);
fillSelect("modelSelect", DATA.options.models);
render();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 0).unwrap()
    }

    fn row(name: &str) -> FlatRow {
        FlatRow {
            orchestrator: "0xa".into(),
            orchestrator_name: name.into(),
            gpu_name: "RTX 4090".into(),
            gpu_total_gb: 25.4,
            gpu_free_gb: 1.5,
            model: "sd-turbo".into(),
            pipeline: "text-to-image".into(),
            orch_uri: "https://0xa:8935".into(),
            capability: "Text to image".into(),
            warm: true,
        }
    }

    #[test]
    fn embeds_rows_with_column_names() {
        let data = DashboardData::new(vec![row("alpha.eth")], fetched_at(), true, 3);
        let html = render_html_dashboard(&data).unwrap();

        assert!(!html.contains("__DATA__"));
        assert!(html.contains(r#""GPU Total (GB)":25.4"#));
        assert!(html.contains(r#""Orchestrator Name":"alpha.eth""#));
        assert!(html.contains(r#""live":true"#));
        assert!(html.contains(r#""generation":3"#));
        assert!(html.contains(r#""fetched_at":"2026-10-18T12:30:00Z""#));
        assert!(html.contains(r#""gpus":["RTX 4090"]"#));
    }

    #[test]
    fn script_close_in_data_is_escaped() {
        let data = DashboardData::new(vec![row("</script><b>x")], fetched_at(), false, 0);
        let html = render_html_dashboard(&data).unwrap();

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"<\/script><b>x"#));
    }
}
