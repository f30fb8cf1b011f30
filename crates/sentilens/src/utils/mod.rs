pub mod signal;
pub mod time_format;

use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::utils::time_format::now_standard_string;

// 自定义控制台输出层：时间戳 + 彩色级别 + 消息 + 结构化字段
struct ConsoleLayer;

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let Some(message) = visitor.message else {
            return;
        };

        let (color_code, level_str) = match *event.metadata().level() {
            tracing::Level::ERROR => ("\x1b[31m", "ERROR"), // 红色
            tracing::Level::WARN => ("\x1b[33m", " WARN"),  // 黄色
            tracing::Level::INFO => ("\x1b[32m", " INFO"),  // 绿色
            tracing::Level::DEBUG => ("\x1b[36m", "DEBUG"), // 青色
            tracing::Level::TRACE => ("\x1b[35m", "TRACE"), // 紫色
        };

        // 时间戳使用灰色（dim），日志级别使用各自的颜色
        println!(
            "\x1b[2m{}\x1b[0m {}{:>5}\x1b[0m {}{}",
            now_standard_string(),
            color_code,
            level_str,
            message,
            visitor.fields
        );
    }
}

// 提取日志消息，其余字段拼接为 key=value
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            let _ = write!(self.fields, " \x1b[2m{}\x1b[0m={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            let _ = write!(self.fields, " \x1b[2m{}\x1b[0m={}", field.name(), value);
        }
    }
}

pub fn init_logger(log_level: &str) -> Result<()> {
    let console_layer = ConsoleLayer.with_filter(build_console_filter(log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .context("初始化日志失败")
}

/// 构建控制台日志过滤器，压低 sqlx 慢查询等第三方噪音
fn build_console_filter(base_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder().parse_lossy(format!(
        "{},\
            sqlx::query=error,\
            sqlx=error,\
            sea_orm::database=error,\
            sea_orm_migration=warn,\
            tower_http=warn,\
            hyper=warn",
        base_level
    ))
}
