//! 领域错误定义
//!
//! 业务上可预期的结果（用户已存在、用户不存在、凭证无效）以显式错误值建模，
//! 调用方必须在编译期处理每一种情况。

use thiserror::Error;
use uuid::Uuid;

/// 领域层错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 同一邮箱已有用户，属于预期的业务结果而非系统故障
    #[error("user with email {email} already exists")]
    UserAlreadyExists { email: String },

    #[error("user with id {id} not found")]
    UserNotFound { id: Uuid },

    /// 登录失败统一返回同一错误，不区分“密码错误”和“用户不存在”
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },
}

impl DomainError {
    pub fn user_already_exists(email: impl Into<String>) -> Self {
        Self::UserAlreadyExists {
            email: email.into(),
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 存储层错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 唯一约束冲突（例如 email 唯一索引）
    #[error("conflict with existing record")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
