use std::collections::HashMap;

use super::graph::{GraphInput, GraphSource, InputEdge, InputNode};
use super::model::Campaign;

fn unordered_key(from: &str, to: &str) -> (String, String) {
    if from <= to {
        (from.to_owned(), to.to_owned())
    } else {
        (to.to_owned(), from.to_owned())
    }
}

#[derive(Default)]
struct EdgeSet {
    edges: Vec<InputEdge>,
    index_by_key: HashMap<(String, String), usize>,
}

impl EdgeSet {
    fn add(&mut self, from: &str, to: &str, strength: Option<f32>) {
        if from == to {
            return;
        }

        let key = unordered_key(from, to);
        if let Some(&index) = self.index_by_key.get(&key) {
            let existing = &mut self.edges[index].strength;
            *existing = match (*existing, strength) {
                (Some(current), Some(next)) => Some(current.max(next)),
                (current, next) => current.or(next),
            };
            return;
        }

        self.index_by_key.insert(key, self.edges.len());
        self.edges.push(InputEdge {
            from: from.to_owned(),
            to: to.to_owned(),
            strength,
        });
    }
}

impl GraphSource for Campaign {
    fn extract(&self) -> GraphInput {
        let mut nodes = Vec::with_capacity(self.entity_count());
        let mut edges = EdgeSet::default();

        for (kind, entity) in self.entities() {
            nodes.push(InputNode {
                id: entity.id.clone(),
                name: entity.name.clone(),
                kind,
            });

            for child in &entity.children {
                edges.add(&entity.id, child, None);
            }
            for link in &entity.links {
                let strength = link.strength.filter(|value| value.is_finite() && *value > 0.0);
                edges.add(&entity.id, &link.target, strength);
            }
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.edges.len(),
            "extracted campaign graph"
        );

        GraphInput {
            nodes,
            edges: edges.edges,
        }
    }
}
