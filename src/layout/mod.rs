//! Force-directed layout: spatial index, force kernels, the stepping
//! simulation and the frame-driven driver around it.

mod clock;
mod config;
mod driver;
mod forces;
mod quadtree;
mod simulation;
mod snapshot;

pub use clock::{FrameClock, FrameHandle, ManualClock};
pub use config::{
    ATTRACTION_RANGE, CENTER_FORCE_RANGE, LINK_LENGTH_RANGE, REPULSION_RANGE, SimulationConfig,
    load_config,
};
pub use driver::{DriverState, SimulationDriver, SubscriptionId};
pub use quadtree::{QuadPoint, Quadtree, QuadtreeCell};
pub use simulation::{
    REPULSION_RADIUS, SEED_HALF_EXTENT, Simulation, WORLD_CENTER, WORLD_HALF_EXTENT, seed_bounds,
    world_bounds,
};
pub use snapshot::{EdgeView, GraphSnapshot, NodeView};
