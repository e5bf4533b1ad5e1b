// 数据库模块
// 包含数据库实体定义、存储库操作以及对外的持久化网关

#[cfg(test)]
pub mod memory;
pub mod models; // 数据库实体定义
pub mod operations; // 数据库操作实现
pub mod store; // 持久化网关

// 重新导出常用类型，方便其他模块使用
pub use store::{PgStore, Store};
