use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use campaign_graph::campaign::{Campaign, GraphInput, NodeKind, load_campaign};
use campaign_graph::layout::{SimulationConfig, SimulationDriver};
use campaign_graph::view::InteractionController;

mod clock;
mod graph;
mod ui;

use clock::EguiFrameClock;

type LoadResult = Result<Campaign, String>;

pub struct CampaignGraphApp {
    campaign_path: PathBuf,
    config: SimulationConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    campaign: Campaign,
    graph: GraphInput,
    visible_kinds: HashSet<NodeKind>,
    graph_generation: u64,
    driver: SimulationDriver<EguiFrameClock>,
    controller: InteractionController,
    clicked: Rc<RefCell<Option<String>>>,
    needs_view_reset: bool,
    selected: Option<String>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    show_quadtree_overlay: bool,
    export_path: String,
    status: Option<String>,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    graph_generation: u64,
    matches: Arc<HashSet<usize>>,
}

impl CampaignGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        campaign_path: PathBuf,
        config: SimulationConfig,
    ) -> Self {
        let state = Self::start_load(campaign_path.clone());
        Self {
            campaign_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(campaign_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_campaign(&campaign_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(campaign_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(campaign_path),
        }
    }

    fn ready(&self, ctx: &Context, result: LoadResult) -> AppState {
        match result {
            Ok(campaign) => AppState::Ready(Box::new(ViewModel::new(
                ctx.clone(),
                campaign,
                self.config,
                &self.campaign_path,
            ))),
            Err(error) => {
                tracing::warn!(%error, "campaign load failed");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for CampaignGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading campaign...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load campaign");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.campaign_path.clone());
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.campaign_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.campaign_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.ready(ctx, result);
        }
    }
}
