//! 基础设施层实现。
//!
//! 提供 PostgreSQL 仓储与事务会话、bcrypt 密码哈希、
//! NATS JetStream 队列适配器，实现应用层定义的端口。

pub mod nats;
pub mod password;
pub mod repository;

pub use nats::{CommandConsumer, Delivery, NatsCommandQueue, QueueClient, QueueError};
pub use password::BcryptPasswordHasher;
pub use repository::{create_pg_pool, PgUserRepository, PgUserSession};
