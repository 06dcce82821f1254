use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod model;
mod render;
mod schema;
mod server;
mod source;
mod view;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "gpu-dashboard")]
#[command(about = "GPU inventory and AI capability dashboard for orchestrators", long_about = None)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Gateway capabilities document.
    #[arg(long, global = true, env = "CAPABILITIES_DATA_URL")]
    capabilities_url: Option<String>,

    /// ENS name directory.
    #[arg(long, global = true, env = "ENS_DATA_URL")]
    ens_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and write a self-contained HTML dashboard.
    Report {
        #[arg(short = 'o', long)]
        out: String,
    },

    /// Serve the dashboard with a shared snapshot and a reload action.
    Serve {
        #[arg(long, default_value = config::DEFAULT_BIND)]
        bind: String,
    },

    /// Fetch once and print the (filtered) views.
    Summary {
        /// GPU model to keep; repeat for several. Default: all.
        #[arg(long = "gpu")]
        gpus: Vec<String>,

        /// AI model to keep; repeat for several. Default: all.
        #[arg(long = "model")]
        models: Vec<String>,

        /// Print JSON instead of text tables.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1) Settings first: a missing capabilities URL stops us before any fetch.
    let settings = config::Settings::resolve(cli.sources.capabilities_url, cli.sources.ens_url)?;
    let source = source::HttpSource::new(settings);

    match cli.cmd {
        Commands::Report { out } => {
            // 2) One load cycle: names, capabilities, flatten.
            let snapshot = source::SnapshotSource::load(&source)
                .await
                .context("load dashboard data")?;

            // 3) Render HTML.
            let data = render::DashboardData::new(snapshot.rows, snapshot.fetched_at, false, 0);
            let html = render::render_html_dashboard(&data)?;
            std::fs::write(&out, html).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }
        Commands::Serve { bind } => {
            let state = Arc::new(server::AppState::new(Arc::new(source)));
            let app = server::build_router(state);

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("bind {}", bind))?;
            info!("dashboard listening on http://{}", bind);
            axum::serve(listener, app).await?;
        }
        Commands::Summary { gpus, models, json } => {
            let snapshot = source::SnapshotSource::load(&source)
                .await
                .context("load dashboard data")?;

            let filter = view::Filter::from_selections(gpus, models);
            let view = view::DashboardView::build(&snapshot.rows, &filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::render_text_summary(&view));
            }
        }
    }

    Ok(())
}
