mod app;
mod export;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use campaign_graph::layout::load_config;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Campaign JSON file to visualize.
    campaign: PathBuf,
    /// Simulation config JSON; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Lay the graph out without opening a window and write it as SVG.
    #[arg(long)]
    export_svg: Option<PathBuf>,
    /// Frame budget for --export-svg.
    #[arg(long, default_value_t = 2_000)]
    export_steps: usize,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(args.config.as_deref())?;
    tracing::debug!(?config, "simulation config");

    if let Some(output) = args.export_svg.as_deref() {
        return export::export_headless(&args.campaign, config, args.export_steps, output);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "campaign-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CampaignGraphApp::new(
                cc,
                args.campaign.clone(),
                config,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("window failed: {error}"))
}
