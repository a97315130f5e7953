//! 命令队列适配器（生产端）。

use application::{CommandQueue, CommandQueueError};
use async_trait::async_trait;
use domain::CreateUserCommand;
use tracing::debug;

use super::client::QueueClient;
use super::error::QueueResult;

/// 把应用层的命令队列端口接到 JetStream 上。
pub struct NatsCommandQueue {
    client: QueueClient,
    queue: String,
}

impl NatsCommandQueue {
    /// 构造时声明队列，之后每次发布直接复用连接。
    pub async fn new(client: QueueClient, queue: impl Into<String>) -> QueueResult<Self> {
        let queue = queue.into();
        client.declare_queue(&queue).await?;
        Ok(Self { client, queue })
    }
}

#[async_trait]
impl CommandQueue for NatsCommandQueue {
    async fn enqueue_user_creation(
        &self,
        command: &CreateUserCommand,
    ) -> Result<(), CommandQueueError> {
        let payload =
            domain::encode(command).map_err(|err| CommandQueueError::Encode(err.to_string()))?;

        self.client
            .publish(&self.queue, payload)
            .await
            .map_err(CommandQueueError::from)?;

        debug!(queue = %self.queue, email = %command.email, "创建用户命令已入队");
        Ok(())
    }
}
