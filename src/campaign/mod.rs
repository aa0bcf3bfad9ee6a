mod extract;
mod graph;
mod load;
mod model;

pub use graph::{GraphInput, GraphSource, InputEdge, InputNode, NodeKind};
pub use load::{CampaignError, load_campaign, parse_campaign};
pub use model::{Campaign, Entity, Link};
