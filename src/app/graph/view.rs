use eframe::egui::{Align2, Color32, FontId, Sense, Ui};

use campaign_graph::render::{GraphRenderer, RasterRenderer, RenderFrame};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        if self.needs_view_reset {
            self.controller.reset_view(rect.size());
            self.needs_view_reset = false;
        }

        self.driver.on_frame();
        let snapshot = self.driver.snapshot();

        if snapshot.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities found",
                FontId::proportional(18.0),
                Color32::from_gray(180),
            );
            return;
        }

        self.handle_graph_input(ui, rect, &response, &snapshot);

        let matches = self.search_matches(&snapshot);
        let cells = if self.show_quadtree_overlay {
            self.driver
                .simulation()
                .map(|simulation| simulation.quadtree_cells())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut renderer = RasterRenderer::new(&painter, rect);
        if self.show_quadtree_overlay {
            renderer = renderer.with_quadtree_overlay(&cells);
        }

        let mut frame = RenderFrame::new(&snapshot, self.controller.transform());
        frame.hover = self.controller.hovered();
        frame.selected = self.selected.as_deref();
        frame.highlighted = matches.as_deref();
        renderer.render(&frame);
    }
}
