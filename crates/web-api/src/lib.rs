//! Web API 层
//!
//! 面向边界的 HTTP 路由：接受创建用户请求（202）、按 ID 查询用户、登录。

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
