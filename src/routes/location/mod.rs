mod handler;
mod model;

pub use handler::{latest_location, update_location};
