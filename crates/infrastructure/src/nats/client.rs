//! JetStream 队列客户端
//!
//! 一个队列对应一条同名 subject 的 WorkQueue 流加一个显式确认的持久化
//! 拉取消费者。`max_ack_pending` 即预取上限：未确认消息达到上限后
//! broker 停止投递，天然形成背压。

use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy},
    stream::{self, RetentionPolicy},
    AckKind, Context,
};
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{QueueError, QueueResult};

/// 持久化消费者名，单个队列只有一个逻辑消费组
const DURABLE_NAME: &str = "user-consumer";

/// 消息在重投递前等待确认的时长
const ACK_WAIT: Duration = Duration::from_secs(30);

/// 队列客户端，生产端与消费端共用同一连接管理方式。
#[derive(Clone)]
pub struct QueueClient {
    jetstream: Context,
}

impl QueueClient {
    /// 连接 broker。连接失败对调用方是致命的，重试由调用方负责。
    pub async fn connect(url: &str) -> QueueResult<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|err| QueueError::unavailable(err.to_string()))?;

        info!(url = %url, "broker 连接建立");

        Ok(Self {
            jetstream: jetstream::new(client),
        })
    }

    /// 声明持久化工作队列。
    ///
    /// 幂等：同名同属性的队列已存在时是 no-op；属性不一致时报冲突。
    pub async fn declare_queue(&self, queue: &str) -> QueueResult<()> {
        match self.jetstream.get_stream(queue).await {
            Ok(stream) => {
                let config = &stream.cached_info().config;
                if config.subjects != [queue.to_string()]
                    || config.retention != RetentionPolicy::WorkQueue
                {
                    return Err(QueueError::conflict(format!(
                        "queue {queue} already declared with different properties"
                    )));
                }
                debug!(queue = %queue, "队列已存在");
                Ok(())
            }
            Err(_) => {
                self.jetstream
                    .create_stream(stream::Config {
                        name: queue.to_string(),
                        subjects: vec![queue.to_string()],
                        retention: RetentionPolicy::WorkQueue,
                        ..Default::default()
                    })
                    .await
                    .map_err(|err| QueueError::unavailable(err.to_string()))?;

                info!(queue = %queue, "队列已创建");
                Ok(())
            }
        }
    }

    /// 发布载荷到指定队列。
    ///
    /// 返回即表示 broker 已接收消息用于路由，不保证消费端已收到。
    pub async fn publish(&self, queue: &str, payload: Vec<u8>) -> QueueResult<()> {
        let ack = self
            .jetstream
            .publish(queue.to_string(), payload.into())
            .await
            .map_err(|err| QueueError::publish(err.to_string()))?;

        // 等待 broker 确认已持久化
        ack.await
            .map_err(|err| QueueError::publish(err.to_string()))?;

        Ok(())
    }

    /// 打开拉取消费句柄，未确认消息并发上限为 `prefetch_limit`。
    pub async fn consume(&self, queue: &str, prefetch_limit: usize) -> QueueResult<CommandConsumer> {
        let stream = self
            .jetstream
            .get_stream(queue)
            .await
            .map_err(|err| QueueError::unavailable(err.to_string()))?;

        let consumer = stream
            .get_or_create_consumer(
                DURABLE_NAME,
                pull::Config {
                    durable_name: Some(DURABLE_NAME.to_string()),
                    ack_policy: AckPolicy::Explicit,
                    ack_wait: ACK_WAIT,
                    max_ack_pending: prefetch_limit as i64,
                    filter_subject: queue.to_string(),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| QueueError::consume(err.to_string()))?;

        let messages = consumer
            .messages()
            .await
            .map_err(|err| QueueError::consume(err.to_string()))?;

        info!(queue = %queue, prefetch_limit, "消费句柄已打开");

        Ok(CommandConsumer { messages })
    }
}

/// 拉取消费句柄，由单个消费循环独占使用。
pub struct CommandConsumer {
    messages: pull::Stream,
}

impl CommandConsumer {
    /// 等待下一条投递。句柄关闭时返回 `None`。
    pub async fn next(&mut self) -> Option<QueueResult<Delivery>> {
        self.messages.next().await.map(|item| {
            item.map(|message| Delivery { message })
                .map_err(|err| QueueError::consume(err.to_string()))
        })
    }
}

/// 一条在途投递；必须以 `ack` 或 `nack` 终结。
pub struct Delivery {
    message: jetstream::Message,
}

impl Delivery {
    pub fn payload(&self) -> &[u8] {
        &self.message.payload
    }

    /// 第几次投递（首次为 1）。
    pub fn delivery_count(&self) -> u64 {
        self.message
            .info()
            .map(|info| info.delivered as u64)
            .unwrap_or(1)
    }

    pub fn is_redelivery(&self) -> bool {
        self.delivery_count() > 1
    }

    /// 确认：消息从队列中永久移除。
    pub async fn ack(self) -> QueueResult<()> {
        self.message
            .ack()
            .await
            .map_err(|err| QueueError::ack(err.to_string()))
    }

    /// 拒绝。`requeue=true` 让 broker 重新投递；
    /// `requeue=false` 终结消息，不再投递（毒消息路径）。
    pub async fn nack(self, requeue: bool) -> QueueResult<()> {
        let kind = if requeue {
            AckKind::Nak(None)
        } else {
            AckKind::Term
        };
        self.message
            .ack_with(kind)
            .await
            .map_err(|err| QueueError::ack(err.to_string()))
    }
}
