pub mod campaign;
pub mod layout;
pub mod render;
pub mod util;
pub mod view;
