use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Pos2, Rect, pos2};

use crate::campaign::NodeKind;

/// Read-only view of one node, as published to renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub id: Arc<str>,
    pub kind: NodeKind,
    pub name: Arc<str>,
    pub x: f32,
    pub y: f32,
    pub connection_degree: usize,
}

impl NodeView {
    pub fn pos(&self) -> Pos2 {
        pos2(self.x, self.y)
    }
}

/// Edge with endpoints stored as indices into the owning snapshot's `nodes`.
///
/// Resolve them with [`GraphSnapshot::endpoints`] to reach the node ids;
/// indices are only meaningful within the snapshot they came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
    pub from: usize,
    pub to: usize,
    pub strength: Option<f32>,
}

/// Immutable copy of the simulation state after one step.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Number of steps taken since the graph was seeded.
    pub revision: u64,
    pub moving: bool,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn endpoints(&self, edge: &EdgeView) -> Option<(&NodeView, &NodeView)> {
        Some((self.nodes.get(edge.from)?, self.nodes.get(edge.to)?))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| &*node.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|node| &*node.id == id)
    }

    /// The node itself plus every node sharing an edge with it.
    pub fn neighborhood(&self, index: usize) -> HashSet<usize> {
        let mut related = HashSet::from([index]);
        for edge in &self.edges {
            if edge.from == index {
                related.insert(edge.to);
            } else if edge.to == index {
                related.insert(edge.from);
            }
        }
        related
    }

    /// Smallest rectangle holding every node center.
    pub fn bounds(&self) -> Option<Rect> {
        let mut nodes = self.nodes.iter();
        let first = nodes.next()?.pos();
        Some(nodes.fold(Rect::from_min_max(first, first), |mut rect, node| {
            rect.extend_with(node.pos());
            rect
        }))
    }

    pub fn neighbors_of(&self, index: usize) -> impl Iterator<Item = &NodeView> {
        self.edges.iter().filter_map(move |edge| {
            if edge.from == index {
                self.nodes.get(edge.to)
            } else if edge.to == index {
                self.nodes.get(edge.from)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_every_node() {
        let node = |id: &str, x: f32, y: f32| NodeView {
            id: Arc::from(id),
            kind: NodeKind::Note,
            name: Arc::from(id),
            x,
            y,
            connection_degree: 0,
        };
        let snapshot = GraphSnapshot {
            nodes: vec![node("a", -5.0, 2.0), node("b", 40.0, -9.0), node("c", 1.0, 30.0)],
            ..GraphSnapshot::default()
        };

        let bounds = snapshot.bounds().expect("non-empty");
        assert_eq!(bounds, Rect::from_min_max(pos2(-5.0, -9.0), pos2(40.0, 30.0)));
        assert!(GraphSnapshot::default().bounds().is_none());
    }
}
