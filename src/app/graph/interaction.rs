use eframe::egui::{self, Pos2, Rect, Ui};

use campaign_graph::layout::GraphSnapshot;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        snapshot: &GraphSnapshot,
    ) {
        let (pointer, pressed, released, scroll) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.raw_scroll_delta.y,
            )
        });
        let Some(pointer) = pointer else {
            self.controller.pointer_leave();
            return;
        };
        let local = Pos2::ZERO + (pointer - rect.min);
        let hovered = response.hovered();

        if pressed && hovered {
            self.controller.pointer_down(snapshot, local);
        }

        if hovered || self.controller.is_active() {
            if self.controller.pointer_move(snapshot, local) {
                ui.ctx().request_repaint();
            }
        } else {
            self.controller.pointer_leave();
        }

        if released && self.controller.pointer_up(local).is_some() {
            ui.ctx().request_repaint();
        }

        if hovered && scroll.abs() > f32::EPSILON {
            self.controller.wheel(local, scroll);
        }
    }
}
