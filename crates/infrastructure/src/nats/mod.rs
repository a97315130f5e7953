//! NATS JetStream 消息队列模块
//!
//! 提供持久化工作队列的声明、发布与带流控的拉取消费。

pub mod client;
pub mod error;
pub mod producer;

pub use client::{CommandConsumer, Delivery, QueueClient};
pub use error::{QueueError, QueueResult};
pub use producer::NatsCommandQueue;
