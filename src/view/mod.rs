//! Screen/world mapping and pointer handling.

mod interaction;
mod transform;

pub use interaction::{CLICK_SLOP, InteractionController};
pub use transform::{MAX_SCALE, MIN_SCALE, ViewTransform, ZOOM_STEP};
