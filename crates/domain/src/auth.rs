use serde::{Deserialize, Serialize};

/// 登录用例签发的访问令牌。
///
/// 仅存在于单次响应中，不做持久化。当前实现签发的是占位字符串而非可验证凭证。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl AuthToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_owned(),
        }
    }
}
