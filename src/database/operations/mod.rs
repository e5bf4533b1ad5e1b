// 数据库操作实现

pub mod group;
pub mod location;
pub mod notification;
pub mod user;

pub use group::GroupOperation;
pub use location::LocationOperation;
pub use notification::NotificationOperation;
pub use user::UserOperation;
