use chrono::{DateTime, Local, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
// 固定长度近似：一月按 30 天、一年按 365 天计算
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// 标准化的本地时间字符串，用于日志输出
pub fn now_standard_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 将时间转换为相对描述，如 "3 days ago"
///
/// 各档位取整均为向下取整，单复数不做区分；晚于 `now` 的时间按 0 秒处理。
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);

    let buckets = [(YEAR, "years"), (MONTH, "months"), (DAY, "days"), (HOUR, "hours"), (MINUTE, "minutes")];
    for (unit, label) in buckets {
        if seconds >= unit {
            return format!("{} {} ago", seconds / unit, label);
        }
    }

    format!("{} seconds ago", seconds)
}
