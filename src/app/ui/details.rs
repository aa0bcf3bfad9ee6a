use eframe::egui::{self, RichText, Ui};

use campaign_graph::render::kind_color;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Entity Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click an entity in the graph to inspect it.");
            return;
        };

        let Some((kind, entity)) = self.campaign.entity(&selected_id) else {
            ui.label("Selected entity no longer exists in the campaign.");
            return;
        };

        ui.label(RichText::new(entity.name.as_str()).strong().size(16.0));
        ui.label(RichText::new(kind.label()).color(kind_color(kind)));
        ui.small(entity.id.as_str());
        ui.add_space(6.0);

        let snapshot = self.driver.snapshot();
        let index = snapshot.index_of(&selected_id);
        if let Some(node) = index.map(|index| &snapshot.nodes[index]) {
            ui.label(format!("Connections: {}", node.connection_degree));
            ui.label(format!("Position: ({:.0}, {:.0})", node.x, node.y));
        } else {
            ui.label("Hidden by the kind filter.");
        }

        let children = entity
            .children
            .iter()
            .filter_map(|child| self.campaign.entity(child))
            .map(|(_, child)| (child.id.clone(), child.name.clone()))
            .collect::<Vec<_>>();
        let links = entity
            .links
            .iter()
            .map(|link| {
                let name = self
                    .campaign
                    .entity(&link.target)
                    .map(|(_, target)| target.name.clone());
                (link.target.clone(), name, link.strength)
            })
            .collect::<Vec<_>>();

        let mut next_selection = None;

        ui.separator();
        ui.label(RichText::new("Contains").strong());
        if children.is_empty() {
            ui.label("Nothing.");
        }
        for (id, name) in &children {
            if ui.link(name.as_str()).on_hover_text(id.as_str()).clicked() {
                next_selection = Some(id.clone());
            }
        }

        ui.separator();
        ui.label(RichText::new("Links").strong());
        if links.is_empty() {
            ui.label("No links.");
        }
        for (target, name, strength) in &links {
            let label = match strength {
                Some(strength) => format!(
                    "{} (strength {strength})",
                    name.as_deref().unwrap_or(target)
                ),
                None => name.as_deref().unwrap_or(target).to_owned(),
            };
            if name.is_none() {
                ui.label(format!("{label} [missing]"));
            } else if ui.link(label).on_hover_text(target.as_str()).clicked() {
                next_selection = Some(target.clone());
            }
        }

        if let Some(index) = index {
            ui.separator();
            ui.label(RichText::new("Neighbors in view").strong());
            egui::ScrollArea::vertical()
                .id_salt("neighbors_scroll")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for neighbor in snapshot.neighbors_of(index) {
                        let text = RichText::new(&*neighbor.name).color(kind_color(neighbor.kind));
                        if ui.link(text).on_hover_text(&*neighbor.id).clicked() {
                            next_selection = Some(neighbor.id.to_string());
                        }
                    }
                });
        }

        ui.separator();
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        } else if next_selection.is_some() {
            self.set_selected(next_selection);
        }
    }
}
