use serde::{Deserialize, Serialize};

use super::graph::NodeKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Ids of entities contained in this one (sub-locations, quest steps, ...).
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub characters: Vec<Entity>,
    #[serde(default)]
    pub factions: Vec<Entity>,
    #[serde(default)]
    pub locations: Vec<Entity>,
    #[serde(default)]
    pub quests: Vec<Entity>,
    #[serde(default)]
    pub notes: Vec<Entity>,
}

impl Campaign {
    /// Every entity paired with its kind, in a fixed kind order.
    pub fn entities(&self) -> impl Iterator<Item = (NodeKind, &Entity)> {
        let collections = [
            (NodeKind::Character, &self.characters),
            (NodeKind::Faction, &self.factions),
            (NodeKind::Location, &self.locations),
            (NodeKind::Quest, &self.quests),
            (NodeKind::Note, &self.notes),
        ];
        collections
            .into_iter()
            .flat_map(|(kind, entities)| entities.iter().map(move |entity| (kind, entity)))
    }

    pub fn entity(&self, id: &str) -> Option<(NodeKind, &Entity)> {
        self.entities().find(|(_, entity)| entity.id == id)
    }

    pub fn entity_count(&self) -> usize {
        self.characters.len()
            + self.factions.len()
            + self.locations.len()
            + self.quests.len()
            + self.notes.len()
    }
}
