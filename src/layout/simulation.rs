use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::campaign::{GraphInput, NodeKind};
use crate::util::stable_pair;

use super::config::SimulationConfig;
use super::forces::{center_force, far_repulsion, repulsion_between, spring_force};
use super::quadtree::{QuadPoint, Quadtree, QuadtreeCell};
use super::snapshot::{EdgeView, GraphSnapshot, NodeView};

pub const WORLD_CENTER: Pos2 = Pos2::ZERO;
pub const WORLD_HALF_EXTENT: f32 = 2_000.0;
pub const SEED_HALF_EXTENT: f32 = 50.0;
/// Only neighbors closer than this repel each other.
pub const REPULSION_RADIUS: f32 = 250.0;

const DAMPING: f32 = 0.85;
const ALPHA: f32 = 0.5;
const CONVERGENCE_THRESHOLD: f32 = 0.05;
const BARNES_HUT_THETA: f32 = 0.72;
const GOLDEN_ANGLE: f32 = TAU * 0.381_966;

pub fn world_bounds() -> Rect {
    Rect::from_center_size(
        WORLD_CENTER,
        vec2(WORLD_HALF_EXTENT * 2.0, WORLD_HALF_EXTENT * 2.0),
    )
}

pub fn seed_bounds() -> Rect {
    Rect::from_center_size(
        WORLD_CENTER,
        vec2(SEED_HALF_EXTENT * 2.0, SEED_HALF_EXTENT * 2.0),
    )
}

fn clamp_to(bounds: Rect, point: Pos2) -> Pos2 {
    let center = bounds.center();
    let x = if point.x.is_nan() {
        center.x
    } else {
        point.x.clamp(bounds.min.x, bounds.max.x)
    };
    let y = if point.y.is_nan() {
        center.y
    } else {
        point.y.clamp(bounds.min.y, bounds.max.y)
    };
    pos2(x, y)
}

struct SimNode {
    id: Arc<str>,
    kind: NodeKind,
    name: Arc<str>,
    position: Pos2,
    velocity: Vec2,
    connection_degree: usize,
    pinned: bool,
}

#[derive(Clone, Copy)]
struct SimEdge {
    from: usize,
    to: usize,
    strength: Option<f32>,
}

#[derive(Default)]
struct StepScratch {
    points: Vec<QuadPoint>,
    neighbors: Vec<QuadPoint>,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    index_by_id: HashMap<Arc<str>, usize>,
    config: SimulationConfig,
    revision: u64,
    moving: bool,
    scratch: StepScratch,
}

fn seed_position(id: &str, index: usize, count: usize, salt: u64) -> Pos2 {
    let fraction = ((index as f32) + 0.5) / (count.max(1) as f32);
    let radius = SEED_HALF_EXTENT * 0.8 * fraction.sqrt();
    let angle = (index as f32) * GOLDEN_ANGLE + ((salt % 64) as f32) * 0.37;
    let (jx, jy) = stable_pair(id, salt);
    let jitter = vec2(jx, jy) * (SEED_HALF_EXTENT * 0.04);

    clamp_to(
        seed_bounds(),
        WORLD_CENTER + (vec2(angle.cos(), angle.sin()) * radius) + jitter,
    )
}

impl Simulation {
    /// Fresh simulation: every node at rest inside the seeding rectangle.
    pub fn seed(input: &GraphInput, config: SimulationConfig, salt: u64) -> Self {
        let count = input.nodes.len();
        let mut index_by_id = HashMap::with_capacity(count);
        let mut nodes = Vec::with_capacity(count);

        for (index, node) in input.nodes.iter().enumerate() {
            let id: Arc<str> = Arc::from(node.id.as_str());
            index_by_id.insert(Arc::clone(&id), index);
            nodes.push(SimNode {
                position: seed_position(&node.id, index, count, salt),
                velocity: Vec2::ZERO,
                kind: node.kind,
                name: Arc::from(node.name.as_str()),
                connection_degree: 0,
                pinned: false,
                id,
            });
        }

        let mut edges = Vec::with_capacity(input.edges.len());
        let mut skipped = 0usize;
        for edge in &input.edges {
            let endpoints = (
                index_by_id.get(edge.from.as_str()),
                index_by_id.get(edge.to.as_str()),
            );
            let (Some(&from), Some(&to)) = endpoints else {
                skipped += 1;
                tracing::debug!(
                    from = %edge.from,
                    to = %edge.to,
                    "skipping edge with unknown endpoint"
                );
                continue;
            };
            if from == to {
                skipped += 1;
                continue;
            }

            nodes[from].connection_degree += 1;
            nodes[to].connection_degree += 1;
            edges.push(SimEdge {
                from,
                to,
                strength: edge.strength,
            });
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            skipped,
            salt,
            "seeded simulation"
        );

        Self {
            nodes,
            edges,
            index_by_id,
            config: config.sanitized(),
            revision: 0,
            moving: count > 0,
            scratch: StepScratch::default(),
        }
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) {
        self.config = config.sanitized();
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn position(&self, id: &str) -> Option<Pos2> {
        self.index_by_id.get(id).map(|&index| self.nodes[index].position)
    }

    pub fn velocity(&self, id: &str) -> Option<Vec2> {
        self.index_by_id.get(id).map(|&index| self.nodes[index].velocity)
    }

    /// Moves a node by hand and brings it to rest.
    pub fn place(&mut self, id: &str, position: Pos2) -> bool {
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        let node = &mut self.nodes[index];
        node.position = clamp_to(world_bounds(), position);
        node.velocity = Vec2::ZERO;
        self.moving = true;
        true
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        self.nodes[index].pinned = pinned;
        true
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|node| node.velocity.length_sq()).sum()
    }

    /// One relaxation step. Returns `false` once the layout has come to rest.
    pub fn step(&mut self) -> bool {
        if self.nodes.is_empty() {
            self.moving = false;
            return false;
        }

        let config = self.config;

        for node in &mut self.nodes {
            node.velocity *= DAMPING;
        }

        if config.repulsion_strength > 0.0 && self.nodes.len() > 1 {
            self.apply_repulsion(config);
        }

        let Self { nodes, edges, .. } = self;

        if config.attraction_strength > 0.0 {
            for edge in edges.iter() {
                let Some(force) = spring_force(
                    nodes[edge.from].position,
                    nodes[edge.to].position,
                    config.attraction_strength,
                    config.target_link_length,
                ) else {
                    continue;
                };
                nodes[edge.from].velocity += force;
                nodes[edge.to].velocity -= force;
            }
        }

        for node in nodes.iter_mut() {
            node.velocity +=
                center_force(node.position, WORLD_CENTER, config.center_force_strength);
        }

        let bounds = world_bounds();
        let mut energy = 0.0;
        for node in nodes.iter_mut() {
            if node.pinned || !node.velocity.is_finite() {
                node.velocity = Vec2::ZERO;
            }
            if !node.pinned {
                node.position = clamp_to(bounds, node.position + (node.velocity * ALPHA));
            }
            energy += node.velocity.length_sq();
        }

        self.revision += 1;
        self.moving = energy >= CONVERGENCE_THRESHOLD;
        if !self.moving {
            tracing::debug!(steps = self.revision, energy, "layout converged");
        }
        self.moving
    }

    fn apply_repulsion(&mut self, config: SimulationConfig) {
        let strength = config.repulsion_strength;
        let scratch = &mut self.scratch;

        scratch.points.clear();
        scratch.points.extend(
            self.nodes
                .iter()
                .enumerate()
                .map(|(index, node)| QuadPoint::new(node.position.x, node.position.y, index)),
        );
        let Some(tree) = Quadtree::from_points(&scratch.points) else {
            return;
        };

        for index in 0..self.nodes.len() {
            let point = self.nodes[index].position;
            let mut push = Vec2::ZERO;

            scratch.neighbors.clear();
            tree.query_circle_into(point, REPULSION_RADIUS, &mut scratch.neighbors);
            for neighbor in &scratch.neighbors {
                if neighbor.id == index {
                    continue;
                }
                push += repulsion_between(point, neighbor.pos(), index, neighbor.id, strength);
            }

            if config.long_range_repulsion {
                tree.for_each_far_mass(
                    point,
                    REPULSION_RADIUS,
                    BARNES_HUT_THETA,
                    |center_of_mass, mass| {
                        push += far_repulsion(point, center_of_mass, mass, strength);
                    },
                );
            }

            self.nodes[index].velocity += push;
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeView {
                    id: Arc::clone(&node.id),
                    kind: node.kind,
                    name: Arc::clone(&node.name),
                    x: node.position.x,
                    y: node.position.y,
                    connection_degree: node.connection_degree,
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|edge| EdgeView {
                    from: edge.from,
                    to: edge.to,
                    strength: edge.strength,
                })
                .collect(),
            revision: self.revision,
            moving: self.moving,
        }
    }

    pub fn quadtree_cells(&self) -> Vec<QuadtreeCell> {
        let points = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| QuadPoint::new(node.position.x, node.position.y, index))
            .collect::<Vec<_>>();
        Quadtree::from_points(&points)
            .map(|tree| tree.cells())
            .unwrap_or_default()
    }
}
