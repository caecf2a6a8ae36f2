use anyhow::{Result, anyhow};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::Payload;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap());

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\**\s*(-?\d+)").unwrap());

/// 从模型回复中解析JSON对象，容忍markdown代码块与前后说明文字
pub fn parse_json_object(raw: &str) -> Result<Payload> {
    let body = FENCED_BLOCK
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let start = body
        .find('{')
        .ok_or_else(|| anyhow!("model reply contains no JSON object"))?;
    let end = body
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| anyhow!("model reply contains an unterminated JSON object"))?;

    let value: serde_json::Value = serde_json::from_str(&body[start..=end])?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, got {}", other)),
    }
}

/// 解析评分回复，只接受以0..=100整数开头的回复
///
/// 例如 `85`、`85/100`、`**72**`；其余情况返回 `None`。
pub fn parse_score(raw: &str) -> Option<u8> {
    let captures = LEADING_INTEGER.captures(raw)?;
    let value: i64 = captures.get(1)?.as_str().parse().ok()?;
    u8::try_from(value).ok().filter(|score| *score <= 100)
}
