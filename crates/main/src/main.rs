//! 主应用程序入口
//!
//! 启动面向边界的 Axum Web 服务：创建用户走队列（202 接受），
//! 查询与登录同步读存储。

use std::sync::Arc;

use application::{
    GetUserUseCase, LoginUseCase, PasswordHasher, SubmitUserUseCase, UserRepository,
};
use config::AppConfig;
use domain::USER_CREATION_QUEUE;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, NatsCommandQueue, PgUserRepository, QueueClient,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 加载配置
    let app_config = AppConfig::from_env_with_defaults();
    app_config.validate()?;

    tracing::info!(
        "连接数据库: {}",
        app_config.database.url.split('@').next_back().unwrap_or("unknown")
    );

    // 创建数据库连接池并运行迁移
    let pg_pool = create_pg_pool(
        &app_config.database.url,
        app_config.database.max_connections,
    )
    .await?;
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    // 连接 broker；启动时连不上视为致命错误
    let queue_client = QueueClient::connect(&app_config.broker.url).await?;
    let command_queue = Arc::new(NatsCommandQueue::new(queue_client, USER_CREATION_QUEUE).await?);

    // 组装用例
    let user_repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pg_pool));
    let password_hasher: Arc<dyn PasswordHasher> =
        Arc::new(BcryptPasswordHasher::new(app_config.server.bcrypt_cost));

    let state = AppState::new(
        Arc::new(SubmitUserUseCase::new(command_queue)),
        Arc::new(GetUserUseCase::new(user_repository.clone())),
        Arc::new(LoginUseCase::new(user_repository, password_hasher)),
    );

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("用户服务启动在 http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
