mod handler;
mod model;

pub use handler::{create_group, get_group_members, join_group, list_groups};
