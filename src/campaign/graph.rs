use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Entity category. Presentation only: the simulation never reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Character,
    Faction,
    Location,
    Quest,
    Note,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Character,
        NodeKind::Faction,
        NodeKind::Location,
        NodeKind::Quest,
        NodeKind::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Faction => "Faction",
            Self::Location => "Location",
            Self::Quest => "Quest",
            Self::Note => "Note",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

/// Undirected relationship between two node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

impl InputEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            strength: None,
        }
    }
}

/// Uniform node/edge set handed to the layout engine.
///
/// Edges are expected to be free of duplicates under the unordered
/// `(from, to)` key. Edges naming an unknown node are tolerated and dropped
/// when the simulation is seeded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<InputNode>,
    pub edges: Vec<InputEdge>,
}

impl GraphInput {
    pub fn node(&mut self, id: impl Into<String>, name: impl Into<String>, kind: NodeKind) {
        self.nodes.push(InputNode {
            id: id.into(),
            name: name.into(),
            kind,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keeps only nodes of the given kinds and the edges between survivors.
    pub fn filter_kinds(&self, kinds: &HashSet<NodeKind>) -> GraphInput {
        let nodes = self
            .nodes
            .iter()
            .filter(|node| kinds.contains(&node.kind))
            .cloned()
            .collect::<Vec<_>>();
        let kept = nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        let edges = self
            .edges
            .iter()
            .filter(|edge| kept.contains(edge.from.as_str()) && kept.contains(edge.to.as_str()))
            .cloned()
            .collect();

        GraphInput { nodes, edges }
    }
}

pub trait GraphSource {
    fn extract(&self) -> GraphInput;
}

impl GraphSource for GraphInput {
    fn extract(&self) -> GraphInput {
        self.clone()
    }
}
