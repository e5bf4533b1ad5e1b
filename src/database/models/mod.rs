// 数据库实体定义

pub mod group;
pub mod location;
pub mod notification;
pub mod user;
