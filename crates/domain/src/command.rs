//! 创建用户命令与信封编解码
//!
//! 命令只在“请求被接受”到“消费端处理完成”之间以字节载荷的形式存在。
//! 字段保持为原始字符串：解码只校验载荷形状，语义校验（邮箱格式等）
//! 是写用例的职责，这样格式良好但语义非法的消息不会被当作毒消息丢弃。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 公认的用户创建队列名，生产端与消费端共用。
pub const USER_CREATION_QUEUE: &str = "user_creation_queue";

/// 创建用户命令，三个字段原样进入消息载荷。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 信封编解码错误
#[derive(Debug, Error)]
pub enum CommandCodecError {
    /// 载荷无法还原成命令：字段缺失、类型不符或根本不是合法 JSON。
    /// 这样的消息永远不可能处理成功，消费端应按毒消息丢弃。
    #[error("malformed command payload: {reason}")]
    Malformed { reason: String },

    #[error("command encoding failed: {reason}")]
    Encode { reason: String },
}

/// 将命令序列化为传输安全的字节载荷。
pub fn encode(command: &CreateUserCommand) -> Result<Vec<u8>, CommandCodecError> {
    serde_json::to_vec(command).map_err(|err| CommandCodecError::Encode {
        reason: err.to_string(),
    })
}

/// 从字节载荷还原命令，只校验形状不校验语义。
pub fn decode(payload: &[u8]) -> Result<CreateUserCommand, CommandCodecError> {
    serde_json::from_slice(payload).map_err(|err| CommandCodecError::Malformed {
        reason: err.to_string(),
    })
}
