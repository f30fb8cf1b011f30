use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::Extension;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::realtime::{RealtimeEvent, RealtimeHub};

/// 实时推送入口，连接建立前就完成订阅，避免握手期间漏掉事件
pub async fn ws_handler(ws: WebSocketUpgrade, Extension(hub): Extension<RealtimeHub>) -> impl IntoResponse {
    let events = hub.subscribe();
    let shutdown = hub.shutdown_token();
    debug!("当前实时订阅数: {}", hub.subscriber_count());
    ws.on_upgrade(move |socket| handle_socket(socket, events, shutdown))
}

async fn handle_socket(socket: WebSocket, events: broadcast::Receiver<RealtimeEvent>, shutdown: CancellationToken) {
    let client_id = Uuid::new_v4();
    info!("新的实时客户端已连接: {}", client_id);

    let (mut sender, mut receiver) = socket.split();
    let mut events = BroadcastStream::new(events);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            event = events.next() => match event {
                Some(Ok(event)) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("序列化 {} 事件失败: {}", event.name(), e);
                            continue;
                        }
                    };
                    if let Err(e) = sender.send(Message::Text(payload.into())).await {
                        debug!("向客户端 {} 发送事件失败: {}", client_id, e);
                        break;
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!("客户端 {} 处理过慢，跳过 {} 条事件", client_id, skipped);
                }
                None => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("客户端 {} 连接异常: {}", client_id, e);
                    break;
                }
            },
        }
    }

    info!("实时客户端已断开: {}", client_id);
}
