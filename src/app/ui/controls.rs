use std::ops::RangeInclusive;
use std::path::Path;

use eframe::egui::{self, RichText, Ui};

use campaign_graph::campaign::NodeKind;
use campaign_graph::layout::{
    ATTRACTION_RANGE, CENTER_FORCE_RANGE, LINK_LENGTH_RANGE, REPULSION_RANGE,
};
use campaign_graph::render::kind_color;

use super::super::ViewModel;

fn config_slider(
    ui: &mut Ui,
    current: f32,
    range: RangeInclusive<f32>,
    label: &str,
    hover: &str,
) -> Option<f32> {
    let mut value = current;
    let response = ui
        .add(
            egui::Slider::new(&mut value, range)
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    response.changed().then_some(value)
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-highlight matching entities without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        ui.label(RichText::new("Entity kinds").strong());
        let mut kinds_changed = false;
        ui.horizontal_wrapped(|ui| {
            for kind in NodeKind::ALL {
                let mut visible = self.visible_kinds.contains(&kind);
                let text = RichText::new(kind.label()).color(kind_color(kind));
                if ui.checkbox(&mut visible, text).changed() {
                    if visible {
                        self.visible_kinds.insert(kind);
                    } else {
                        self.visible_kinds.remove(&kind);
                    }
                    kinds_changed = true;
                }
            }
        });
        if kinds_changed {
            self.apply_kind_filter();
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui
                .button("Restart layout")
                .on_hover_text("Scatter every node again and re-run the simulation.")
                .clicked()
            {
                self.driver.restart();
            }
            if ui
                .button("Reset view")
                .on_hover_text("Center the world origin at unit zoom.")
                .clicked()
            {
                self.needs_view_reset = true;
            }
        });

        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the spatial index partitions over the graph canvas.");

        ui.collapsing("Physics tuning", |ui| self.draw_physics_tuning(ui));

        ui.separator();
        ui.label(RichText::new("Export").strong());
        ui.text_edit_singleline(&mut self.export_path);
        if ui
            .button("Export SVG")
            .on_hover_text("Write the current layout as an SVG document.")
            .clicked()
        {
            self.export_svg();
        }
        if let Some(status) = &self.status {
            ui.small(status.as_str());
        }
    }

    fn draw_physics_tuning(&mut self, ui: &mut Ui) {
        let config = self.driver.config();

        if let Some(value) = config_slider(
            ui,
            config.repulsion_strength,
            REPULSION_RANGE,
            "Repulsion",
            "How strongly nearby nodes push away from each other.",
        ) {
            self.driver.set_repulsion_strength(value);
        }

        if let Some(value) = config_slider(
            ui,
            config.attraction_strength,
            ATTRACTION_RANGE,
            "Link spring",
            "How strongly linked entities pull toward the link length.",
        ) {
            self.driver.set_attraction_strength(value);
        }

        if let Some(value) = config_slider(
            ui,
            config.center_force_strength,
            CENTER_FORCE_RANGE,
            "Center pull",
            "Keeps disconnected groups from drifting away.",
        ) {
            self.driver.set_center_force_strength(value);
        }

        if let Some(value) = config_slider(
            ui,
            config.target_link_length,
            LINK_LENGTH_RANGE,
            "Link length",
            "Rest length of every link.",
        ) {
            self.driver.set_target_link_length(value);
        }

        let mut long_range = config.long_range_repulsion;
        if ui
            .checkbox(&mut long_range, "Long-range repulsion")
            .on_hover_text("Also push apart groups beyond the local repulsion radius.")
            .changed()
        {
            self.driver.set_long_range_repulsion(long_range);
        }
    }

    fn export_svg(&mut self) {
        let path = Path::new(self.export_path.trim());
        let snapshot = self.driver.snapshot();
        self.status = Some(match crate::export::write_svg(&snapshot, path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "SVG export failed");
                format!("Export failed: {error:#}")
            }
        });
    }
}
