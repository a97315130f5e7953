//! 用户写用例
//!
//! 幂等检查（按邮箱查重）+ 密码哈希 + 持久化。调用方（消费端）负责把整个
//! execute 包在一个事务会话里，并按结果提交或回滚。

use std::sync::Arc;

use domain::{CreateUserCommand, DomainError, PersonName, RepositoryError, User, UserEmail};

use crate::{clock::Clock, error::ApplicationError, password::PasswordHasher, repository::UserRepository};

pub struct CreateUserDependencies {
    pub repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct CreateUserUseCase {
    deps: CreateUserDependencies,
}

impl CreateUserUseCase {
    pub fn new(deps: CreateUserDependencies) -> Self {
        Self { deps }
    }

    pub async fn execute(&self, command: CreateUserCommand) -> Result<(), ApplicationError> {
        let name = PersonName::parse(command.name)?;
        let email = UserEmail::parse(command.email)?;

        if self
            .deps
            .repository
            .find_by_email(email.clone())
            .await?
            .is_some()
        {
            return Err(DomainError::user_already_exists(email.as_str()).into());
        }

        let password = self.deps.password_hasher.hash(&command.password).await?;
        let user = User::create(name, email.clone(), password, self.deps.clock.now());

        match self.deps.repository.save(user).await {
            Ok(_) => Ok(()),
            // 预检查与插入之间被并发写抢先：唯一约束冲突等价于“用户已存在”
            Err(RepositoryError::Conflict) => {
                Err(DomainError::user_already_exists(email.as_str()).into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
