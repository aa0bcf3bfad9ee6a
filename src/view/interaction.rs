use eframe::egui::{Pos2, Vec2};

use crate::layout::GraphSnapshot;
use crate::render::node_radius;

use super::ViewTransform;

/// Pointer travel, in screen pixels, that still counts as a click.
pub const CLICK_SLOP: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Pos2 },
    Pressing { id: String, origin: Pos2 },
    Ignored,
}

/// Turns pointer and wheel events (canvas-relative screen coordinates) into
/// view transform updates and node clicks.
pub struct InteractionController {
    transform: ViewTransform,
    gesture: Gesture,
    hovered: Option<String>,
    on_node_click: Option<Box<dyn FnMut(&str)>>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ViewTransform::default())
    }
}

impl InteractionController {
    pub fn new(transform: ViewTransform) -> Self {
        Self {
            transform,
            gesture: Gesture::Idle,
            hovered: None,
            on_node_click: None,
        }
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn reset_view(&mut self, viewport: Vec2) {
        self.transform.reset(viewport);
        self.gesture = Gesture::Idle;
    }

    pub fn set_on_node_click(&mut self, callback: Box<dyn FnMut(&str)>) {
        self.on_node_click = Some(callback);
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Index of the first node whose disc contains `screen`.
    pub fn hit_test(&self, snapshot: &GraphSnapshot, screen: Pos2) -> Option<usize> {
        let world = self.transform.screen_to_world(screen);
        snapshot
            .nodes
            .iter()
            .position(|node| node.pos().distance(world) <= node_radius(node.connection_degree))
    }

    pub fn pointer_down(&mut self, snapshot: &GraphSnapshot, screen: Pos2) {
        self.gesture = match self.hit_test(snapshot, screen) {
            Some(index) => Gesture::Pressing {
                id: snapshot.nodes[index].id.to_string(),
                origin: screen,
            },
            None => Gesture::Panning { last: screen },
        };
    }

    /// Returns whether the transform changed.
    pub fn pointer_move(&mut self, snapshot: &GraphSnapshot, screen: Pos2) -> bool {
        match &mut self.gesture {
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.transform.pan_by(delta);
                delta != Vec2::ZERO
            }
            Gesture::Pressing { origin, .. } => {
                if origin.distance(screen) > CLICK_SLOP {
                    self.gesture = Gesture::Ignored;
                }
                false
            }
            Gesture::Ignored => false,
            Gesture::Idle => {
                self.hovered = self
                    .hit_test(snapshot, screen)
                    .map(|index| snapshot.nodes[index].id.to_string());
                false
            }
        }
    }

    /// Ends the current gesture and returns the clicked node id, if any.
    pub fn pointer_up(&mut self, screen: Pos2) -> Option<String> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let Gesture::Pressing { id, origin } = gesture else {
            return None;
        };
        if origin.distance(screen) > CLICK_SLOP {
            return None;
        }

        if let Some(callback) = self.on_node_click.as_mut() {
            callback(&id);
        }
        Some(id)
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    /// One zoom notch toward the cursor; positive `delta_y` zooms in.
    pub fn wheel(&mut self, screen: Pos2, delta_y: f32) -> bool {
        self.transform.zoom_step(screen, delta_y)
    }
}
