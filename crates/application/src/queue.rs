use async_trait::async_trait;
use domain::CreateUserCommand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandQueueError {
    /// 无法连接 broker 或 broker 拒绝服务；由边界告知请求方稍后重试
    #[error("broker unavailable: {0}")]
    Unavailable(String),
    /// 队列已存在但属性不一致
    #[error("queue declaration conflict: {0}")]
    Conflict(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("command encoding failed: {0}")]
    Encode(String),
}

impl CommandQueueError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }
}

/// 命令队列端口。
///
/// 入队成功只代表 broker 已接收消息用于路由，不代表消费端已经处理。
#[async_trait]
pub trait CommandQueue: Send + Sync {
    async fn enqueue_user_creation(
        &self,
        command: &CreateUserCommand,
    ) -> Result<(), CommandQueueError>;
}
