//! 队列错误类型定义

use application::CommandQueueError;
use thiserror::Error;

/// 队列操作错误
#[derive(Error, Debug)]
pub enum QueueError {
    /// 无法连接 broker，或连接后 broker 拒绝服务
    #[error("broker 不可用: {message}")]
    Unavailable { message: String },

    /// 队列已存在但属性不一致
    #[error("队列声明冲突: {message}")]
    Conflict { message: String },

    /// 发布错误
    #[error("消息发布失败: {message}")]
    Publish { message: String },

    /// 消费错误
    #[error("消息拉取失败: {message}")]
    Consume { message: String },

    /// 确认/拒绝错误
    #[error("消息确认失败: {message}")]
    Ack { message: String },
}

/// 队列结果类型
pub type QueueResult<T> = Result<T, QueueError>;

impl QueueError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }

    pub fn consume(message: impl Into<String>) -> Self {
        Self::Consume {
            message: message.into(),
        }
    }

    pub fn ack(message: impl Into<String>) -> Self {
        Self::Ack {
            message: message.into(),
        }
    }
}

impl From<QueueError> for CommandQueueError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Conflict { message } => CommandQueueError::Conflict(message),
            QueueError::Publish { message } => CommandQueueError::Publish(message),
            QueueError::Unavailable { message }
            | QueueError::Consume { message }
            | QueueError::Ack { message } => CommandQueueError::Unavailable(message),
        }
    }
}
