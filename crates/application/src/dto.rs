use domain::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户读投影：按需构造，永远不携带密码哈希。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for ReadUser {
    fn from(user: &User) -> Self {
        Self {
            id: Uuid::from(user.id),
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
        }
    }
}
