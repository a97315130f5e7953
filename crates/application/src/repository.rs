use async_trait::async_trait;
use domain::{RepositoryError, User, UserEmail, UserId};

/// 用户存储端口。
///
/// 实现方可以是连接池上的仓储（读路径），也可以是单个事务会话（写路径）；
/// 写路径的提交与回滚由持有具体会话的一方负责。
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_email(&self, email: UserEmail) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}
