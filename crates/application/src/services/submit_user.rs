//! 命令生产端
//!
//! 接受创建用户请求，构造命令并发布到公认队列，立即返回“已接受”。
//! 本层不做任何幂等保证：同一邮箱提交两次就是两条排队命令，
//! 去重发生在消费端。

use std::sync::Arc;

use domain::{CreateUserCommand, PersonName, UserEmail};
use tracing::debug;

use crate::{error::ApplicationError, queue::CommandQueue};

#[derive(Debug, Clone)]
pub struct SubmitUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct SubmitUserUseCase {
    queue: Arc<dyn CommandQueue>,
}

impl SubmitUserUseCase {
    pub fn new(queue: Arc<dyn CommandQueue>) -> Self {
        Self { queue }
    }

    /// 成功返回即表示命令已入队，不代表用户已创建。
    pub async fn execute(&self, request: SubmitUserRequest) -> Result<(), ApplicationError> {
        // 在边界拒绝明显的垃圾输入；完整语义校验仍属于写用例
        let name = PersonName::parse(request.name)?;
        let email = UserEmail::parse(request.email)?;

        let command = CreateUserCommand {
            name: name.as_str().to_owned(),
            email: email.as_str().to_owned(),
            password: request.password,
        };

        self.queue.enqueue_user_creation(&command).await?;
        debug!(email = %command.email, "user creation command enqueued");
        Ok(())
    }
}
