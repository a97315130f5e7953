//! User Consumer 服务
//!
//! 从持久化队列拉取用户创建命令，在独立事务中执行写用例，
//! 按处理结果确认或拒绝投递。支持优雅关闭：停止拉取、排空在途消息、
//! 再断开 broker 连接。

use std::sync::Arc;
use std::time::Duration;

use application::SystemClock;
use config::AppConfig;
use domain::USER_CREATION_QUEUE;
use infrastructure::{create_pg_pool, BcryptPasswordHasher, Delivery, QueueClient};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use user_consumer::{Disposition, UserCommandProcessor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("User Consumer 启动中...");

    // 加载配置
    let app_config = AppConfig::from_env_with_defaults();
    app_config.validate()?;

    // 创建数据库连接池并运行迁移
    let pg_pool = create_pg_pool(
        &app_config.database.url,
        app_config.database.max_connections,
    )
    .await?;
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let password_hasher = Arc::new(BcryptPasswordHasher::new(app_config.server.bcrypt_cost));
    let clock = Arc::new(SystemClock);
    let processor = UserCommandProcessor::new(pg_pool, password_hasher, clock);

    // 连接 broker 并声明队列
    let queue_client = QueueClient::connect(&app_config.broker.url).await?;
    queue_client.declare_queue(USER_CREATION_QUEUE).await?;
    let mut consumer = queue_client
        .consume(USER_CREATION_QUEUE, app_config.broker.prefetch_limit)
        .await?;

    // ctrl-c 触发关闭信号
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    info!(
        queue = USER_CREATION_QUEUE,
        prefetch_limit = app_config.broker.prefetch_limit,
        "开始消费用户创建命令"
    );

    let mut inflight: JoinSet<()> = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("收到关闭信号，停止拉取新消息");
                    break;
                }
            }

            // 及时回收处理完的任务
            Some(_) = inflight.join_next(), if !inflight.is_empty() => {}

            delivery = consumer.next() => {
                match delivery {
                    Some(Ok(delivery)) => {
                        let processor = processor.clone();
                        inflight.spawn(async move {
                            handle_delivery(processor, delivery).await;
                        });
                    }
                    Some(Err(err)) => {
                        error!(error = %err, "拉取消息失败");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                    None => {
                        warn!("消费句柄已关闭");
                        break;
                    }
                }
            }
        }
    }

    // 优雅排空：等在途消息全部确认后再释放 broker 连接
    while inflight.join_next().await.is_some() {}
    info!("User Consumer 已停止");
    Ok(())
}

async fn handle_delivery(processor: UserCommandProcessor, delivery: Delivery) {
    let delivery_count = delivery.delivery_count();
    let disposition = processor.process(delivery.payload(), delivery_count).await;

    let result = match disposition {
        Disposition::Ack => delivery.ack().await,
        Disposition::Requeue => delivery.nack(true).await,
        Disposition::Drop => delivery.nack(false).await,
    };

    if let Err(err) = result {
        // 确认失败交给 broker 的 ack 超时重投机制兜底
        error!(error = %err, "消息确认失败");
    }
}
