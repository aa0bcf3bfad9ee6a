use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::rc::Rc;

use eframe::egui::{self, Align, Context, Layout};

use campaign_graph::campaign::{Campaign, GraphSource, NodeKind};
use campaign_graph::layout::{SimulationConfig, SimulationDriver};
use campaign_graph::view::InteractionController;

use super::super::ViewModel;
use super::super::clock::EguiFrameClock;

impl ViewModel {
    pub(in crate::app) fn new(
        ctx: Context,
        campaign: Campaign,
        config: SimulationConfig,
        campaign_path: &Path,
    ) -> Self {
        let graph = campaign.extract();
        let mut driver = SimulationDriver::new(EguiFrameClock::new(ctx), config);
        driver.initialize(graph.clone());

        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        let mut controller = InteractionController::default();
        controller.set_on_node_click(Box::new(move |id: &str| {
            sink.replace(Some(id.to_owned()));
        }));

        let export_path = campaign_path
            .with_extension("svg")
            .to_string_lossy()
            .into_owned();

        Self {
            campaign,
            graph,
            visible_kinds: NodeKind::ALL.into_iter().collect::<HashSet<_>>(),
            graph_generation: 0,
            driver,
            controller,
            clicked,
            needs_view_reset: true,
            selected: None,
            search: String::new(),
            search_match_cache: None,
            show_quadtree_overlay: false,
            export_path,
            status: None,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        campaign_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.take_clicked_node();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("campaign-graph");
                    ui.separator();
                    if !self.campaign.name.is_empty() {
                        ui.label(self.campaign.name.as_str());
                    }
                    ui.label(format!("file: {}", campaign_path.display()));
                    let snapshot = self.driver.snapshot();
                    ui.label(format!("nodes: {}", snapshot.nodes.len()));
                    ui.label(format!("edges: {}", snapshot.edges.len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload campaign"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.fps_display_text());
                        ui.label(if self.driver.is_running() {
                            let energy = self
                                .driver
                                .simulation()
                                .map_or(0.0, |simulation| simulation.kinetic_energy());
                            format!("relaxing, step {} (energy {energy:.2})", snapshot.revision)
                        } else {
                            format!("settled after {} steps", snapshot.revision)
                        });
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading campaign...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            tracing::debug!(selected = ?selected, "selection changed");
            self.selected = selected;
        }
    }

    fn take_clicked_node(&mut self) {
        let clicked = self.clicked.borrow_mut().take();
        if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }

    pub(in crate::app) fn apply_kind_filter(&mut self) {
        let filtered = self.graph.filter_kinds(&self.visible_kinds);
        if let Some(selected) = self.selected.as_deref()
            && !filtered.nodes.iter().any(|node| node.id == selected)
        {
            self.selected = None;
        }

        self.driver.initialize(filtered);
        self.graph_generation += 1;
        self.search_match_cache = None;
    }
}
