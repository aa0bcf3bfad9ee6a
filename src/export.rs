use std::path::Path;

use anyhow::{Context, Result};
use campaign_graph::campaign::{GraphSource, load_campaign};
use campaign_graph::layout::{GraphSnapshot, ManualClock, SimulationConfig, SimulationDriver};
use campaign_graph::render::{GraphRenderer, RenderFrame, SvgRenderer};
use campaign_graph::view::ViewTransform;
use eframe::egui::vec2;

const EXPORT_WIDTH: f32 = 1600.0;
const EXPORT_HEIGHT: f32 = 1200.0;
const EXPORT_PADDING: f32 = 48.0;

pub fn render_svg(snapshot: &GraphSnapshot) -> String {
    let size = vec2(EXPORT_WIDTH, EXPORT_HEIGHT);
    let transform = snapshot
        .bounds()
        .map(|bounds| ViewTransform::fit(bounds, size, EXPORT_PADDING))
        .unwrap_or_else(|| ViewTransform::centered(size));

    let mut renderer = SvgRenderer::new(size.x, size.y);
    renderer.render(&RenderFrame::new(snapshot, &transform));
    renderer.into_document()
}

pub fn write_svg(snapshot: &GraphSnapshot, path: &Path) -> Result<()> {
    std::fs::write(path, render_svg(snapshot))
        .with_context(|| format!("failed to write SVG to {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        steps = snapshot.revision,
        "exported layout"
    );
    Ok(())
}

pub fn export_headless(
    campaign: &Path,
    config: SimulationConfig,
    max_steps: usize,
    output: &Path,
) -> Result<()> {
    let campaign = load_campaign(campaign)?;
    let clock = ManualClock::new();
    let mut driver = SimulationDriver::new(clock.clone(), config);
    driver.initialize(campaign.extract());

    let mut steps = 0;
    while steps < max_steps && clock.fire().is_some() {
        driver.on_frame();
        steps += 1;
    }
    if driver.is_running() {
        tracing::warn!(steps, "layout still moving when the step budget ran out");
    }

    write_svg(&driver.snapshot(), output)
}
