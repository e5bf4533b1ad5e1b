mod handler;
mod model;

pub use handler::list_notifications;
