use std::sync::Arc;

use domain::{DomainError, UserId};
use uuid::Uuid;

use crate::{dto::ReadUser, error::ApplicationError, repository::UserRepository};

pub struct GetUserUseCase {
    repository: Arc<dyn UserRepository>,
}

impl GetUserUseCase {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: Uuid) -> Result<ReadUser, ApplicationError> {
        let user = self
            .repository
            .find_by_id(UserId::from(id))
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        Ok(ReadUser::from(&user))
    }
}
