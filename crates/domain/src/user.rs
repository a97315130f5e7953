use serde::{Deserialize, Serialize};

use crate::value_objects::{PasswordHash, PersonName, Timestamp, UserEmail, UserId};

/// 用户实体。
///
/// 写用例创建后即不可变；邮箱唯一性由写用例预检查并由存储层唯一约束兜底，
/// 实体本身不承担该约束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub email: UserEmail,
    // 密码哈希不随实体对外序列化
    #[serde(skip_serializing)]
    pub password: PasswordHash,
    pub created_at: Timestamp,
}

impl User {
    /// 创建新用户，标识在构造时生成。
    pub fn create(
        name: PersonName,
        email: UserEmail,
        password: PasswordHash,
        now: Timestamp,
    ) -> Self {
        Self {
            id: UserId::generate(),
            name,
            email,
            password,
            created_at: now,
        }
    }

    /// 以既有标识重建用户（用于从数据库加载）。
    pub fn with_id(
        id: UserId,
        name: PersonName,
        email: UserEmail,
        password: PasswordHash,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            created_at,
        }
    }
}
