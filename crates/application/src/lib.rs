//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，以及对外部适配器
//! （密码哈希、存储、消息队列、时钟）的抽象端口。

pub mod clock;
pub mod dto;
pub mod error;
pub mod password;
pub mod queue;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::ReadUser;
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
pub use queue::{CommandQueue, CommandQueueError};
pub use repository::UserRepository;
pub use services::{
    CreateUserDependencies, CreateUserUseCase, GetUserUseCase, LoginRequest, LoginUseCase,
    SubmitUserRequest, SubmitUserUseCase,
};
