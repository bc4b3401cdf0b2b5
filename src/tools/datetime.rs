//! CurrentDateTime：当前本地日期时间（用于"今天几号""现在几点"类问题）

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Value};

use crate::core::ToolError;
use crate::tools::Tool;

pub struct CurrentDateTimeTool;

#[async_trait]
impl Tool for CurrentDateTimeTool {
    fn name(&self) -> &str {
        "CurrentDateTime"
    }

    fn description(&self) -> &str {
        "Get the current local date and time. Takes no arguments."
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        Ok(describe(Local::now()))
    }
}

fn describe<Tz: TimeZone>(now: DateTime<Tz>) -> Value
where
    Tz::Offset: std::fmt::Display,
{
    json!({
        "iso8601": now.to_rfc3339(),
        "date": now.format("%Y-%m-%d").to_string(),
        "time": now.format("%H:%M:%S").to_string(),
        "weekday": now.format("%A").to_string(),
        "timezone": now.format("%:z").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_describe_fixed_instant() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let v = describe(now);
        assert_eq!(v["date"], "2024-03-15");
        assert_eq!(v["time"], "09:30:00");
        assert_eq!(v["weekday"], "Friday");
        assert_eq!(v["timezone"], "+08:00");
        assert_eq!(v["iso8601"], "2024-03-15T09:30:00+08:00");
    }

    #[tokio::test]
    async fn test_execute_ignores_args() {
        let out = CurrentDateTimeTool.execute(Value::Null).await.unwrap();
        assert!(out["iso8601"].is_string());
    }
}
