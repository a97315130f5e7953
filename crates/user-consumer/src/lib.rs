//! User Consumer 库
//!
//! 暴露消息处理逻辑，便于二进制入口和测试复用。

pub mod processor;

pub use processor::{disposition_for, Disposition, UserCommandProcessor};
