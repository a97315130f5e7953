//! 用户服务核心领域模型
//!
//! 包含用户实体、值对象、创建用户命令及其编解码，以及领域错误定义。

pub mod auth;
pub mod command;
pub mod errors;
pub mod user;
pub mod value_objects;

pub use auth::AuthToken;
pub use command::{decode, encode, CommandCodecError, CreateUserCommand, USER_CREATION_QUEUE};
pub use errors::{DomainError, RepositoryError};
pub use user::User;
pub use value_objects::{PasswordHash, PersonName, Timestamp, UserEmail, UserId};
