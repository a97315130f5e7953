use std::sync::Arc;

use domain::{AuthToken, DomainError, UserEmail};

use crate::{error::ApplicationError, password::PasswordHasher, repository::UserRepository};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase {
    repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl LoginUseCase {
    pub fn new(repository: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// 邮箱不存在、解析失败、密码不匹配一律返回同一错误，避免泄露用户是否存在。
    pub async fn execute(&self, request: LoginRequest) -> Result<AuthToken, ApplicationError> {
        let email = match UserEmail::parse(request.email) {
            Ok(email) => email,
            Err(_) => return Err(DomainError::InvalidCredentials.into()),
        };

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let password_ok = self
            .password_hasher
            .verify(&request.password, &user.password)
            .await?;
        if !password_ok {
            return Err(DomainError::InvalidCredentials.into());
        }

        // 占位令牌：真实系统在这里签发 JWT
        Ok(AuthToken::bearer(format!("dummy-jwt-for-{}", user.name)))
    }
}
