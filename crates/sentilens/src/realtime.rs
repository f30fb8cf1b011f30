use sentilens_entity::analysis::Sentiment;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 新分析结果推送给前端时使用的时间标记，前端会自行格式化
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAnalysisEvent {
    pub id: i32,
    pub text: String,
    pub sentiment: Sentiment,
    pub platform: String,
    pub date: String,
}

/// 推送给实时订阅者的事件，序列化为 `{"event": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, strum::IntoStaticStr)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RealtimeEvent {
    NewAnalysis(NewAnalysisEvent),
}

impl RealtimeEvent {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("no connected subscribers")]
    NoSubscribers,
    #[error("realtime hub is shut down")]
    Closed,
}

/// 实时推送能力，由调用方注入
pub trait Publisher: Send + Sync {
    /// 返回收到事件的订阅者数量
    fn publish(&self, event: RealtimeEvent) -> Result<usize, PublishError>;
}

/// 基于 broadcast 通道的推送中心，每个 WebSocket 会话持有一个接收端
#[derive(Clone)]
pub struct RealtimeHub {
    sender: broadcast::Sender<RealtimeEvent>,
    shutdown: CancellationToken,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// 会话在此令牌取消时主动断开
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Publisher for RealtimeHub {
    fn publish(&self, event: RealtimeEvent) -> Result<usize, PublishError> {
        if self.shutdown.is_cancelled() {
            return Err(PublishError::Closed);
        }
        self.sender.send(event).map_err(|_| PublishError::NoSubscribers)
    }
}
