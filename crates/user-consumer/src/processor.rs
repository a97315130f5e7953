//! 单条消息的处理流程
//!
//! 每条消息经历 解码 → 事务内执行写用例 → 提交或回滚，最终归结为
//! 一个投递处置：确认、重投或丢弃。处置规则集中在 `disposition_for`，
//! 不依赖 broker 即可测试。

use std::sync::Arc;

use application::{
    ApplicationError, Clock, CreateUserDependencies, CreateUserUseCase, PasswordHasher,
};
use domain::{decode, DomainError};
use infrastructure::PgUserSession;
use sqlx::PgPool;
use tracing::{error, info, warn};

/// 一条投递的最终处置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 处理完成，消息从队列移除
    Ack,
    /// 瞬时故障，消息回队列等待重试
    Requeue,
    /// 永远处理不成功的消息，不再投递
    Drop,
}

/// 把写用例的结果映射为投递处置。
///
/// 用户已存在视为已满足的写入：确认消息，否则重复命令会无限重投。
/// 语义非法的命令重试多少次都不会成功，按毒消息丢弃。
/// 其余失败（存储不可用等）视为瞬时故障，重投等待下次尝试。
pub fn disposition_for(outcome: &Result<(), ApplicationError>) -> Disposition {
    match outcome {
        Ok(()) => Disposition::Ack,
        Err(ApplicationError::Domain(DomainError::UserAlreadyExists { .. })) => Disposition::Ack,
        Err(ApplicationError::Domain(DomainError::InvalidArgument { .. })) => Disposition::Drop,
        Err(_) => Disposition::Requeue,
    }
}

/// 消费端的消息处理器。
///
/// 每条消息独享一个事务会话；并发处理的消息之间没有共享可变状态。
#[derive(Clone)]
pub struct UserCommandProcessor {
    pool: PgPool,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl UserCommandProcessor {
    pub fn new(
        pool: PgPool,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            password_hasher,
            clock,
        }
    }

    pub async fn process(&self, payload: &[u8], delivery_count: u64) -> Disposition {
        let command = match decode(payload) {
            Ok(command) => command,
            Err(err) => {
                // 毒消息：与瞬时失败区分开记录，且绝不重投
                warn!(error = %err, delivery_count, "丢弃无法解析的消息");
                return Disposition::Drop;
            }
        };
        let email = command.email.clone();

        let session = match PgUserSession::begin(&self.pool).await {
            Ok(session) => Arc::new(session),
            Err(err) => {
                error!(error = %err, email = %email, "无法开启存储事务");
                return Disposition::Requeue;
            }
        };

        let use_case = CreateUserUseCase::new(CreateUserDependencies {
            repository: session.clone(),
            password_hasher: self.password_hasher.clone(),
            clock: self.clock.clone(),
        });

        let outcome = use_case.execute(command).await;
        let disposition = disposition_for(&outcome);

        match &outcome {
            Ok(()) => {
                if let Err(err) = session.commit().await {
                    error!(error = %err, email = %email, delivery_count, "事务提交失败");
                    return Disposition::Requeue;
                }
                info!(email = %email, "用户创建完成");
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback().await {
                    warn!(error = %rollback_err, email = %email, "事务回滚失败");
                }
                match disposition {
                    Disposition::Ack => {
                        info!(email = %email, "用户已存在，重复命令按成功确认");
                    }
                    Disposition::Drop => {
                        warn!(error = %err, email = %email, delivery_count, "命令语义非法，按毒消息丢弃");
                    }
                    Disposition::Requeue => {
                        error!(error = %err, email = %email, delivery_count, "处理失败，消息重新入队等待重试");
                    }
                }
            }
        }

        disposition
    }
}

#[cfg(test)]
mod tests {
    use application::{CommandQueueError, PasswordHasherError};
    use domain::RepositoryError;

    use super::*;

    #[test]
    fn success_is_acknowledged() {
        assert_eq!(disposition_for(&Ok(())), Disposition::Ack);
    }

    #[test]
    fn existing_user_is_acknowledged_not_retried() {
        let outcome = Err(DomainError::user_already_exists("ann@x.com").into());
        assert_eq!(disposition_for(&outcome), Disposition::Ack);
    }

    #[test]
    fn semantically_invalid_command_is_dropped() {
        let outcome = Err(DomainError::invalid_argument("email", "must look like local@host").into());
        assert_eq!(disposition_for(&outcome), Disposition::Drop);
    }

    #[test]
    fn transient_failures_are_requeued() {
        let storage: Result<(), ApplicationError> =
            Err(RepositoryError::storage("connection reset").into());
        assert_eq!(disposition_for(&storage), Disposition::Requeue);

        let hashing: Result<(), ApplicationError> =
            Err(PasswordHasherError::hash_error("thread pool gone").into());
        assert_eq!(disposition_for(&hashing), Disposition::Requeue);

        let queue: Result<(), ApplicationError> =
            Err(CommandQueueError::unavailable("broker down").into());
        assert_eq!(disposition_for(&queue), Disposition::Requeue);
    }
}
