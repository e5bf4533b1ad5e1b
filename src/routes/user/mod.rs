mod handler;
mod model;

pub use handler::update_push_token;
