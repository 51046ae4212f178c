//! 宿主事件 - OpenCode 插件事件的最小表示

use crate::config::CategoryId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 宿主推送的事件：`{"type": "...", "properties": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl HostEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            properties: Map::new(),
        }
    }

    /// 设置 payload 字段
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 从 JSON 文本解析
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// 事件对应的通知类别，未知事件返回 None
    pub fn category(&self) -> Option<CategoryId> {
        CategoryId::from_event_type(&self.event_type)
    }

    /// 会话 ID（`sessionID`，兼容 `info.id`）
    pub fn session_id(&self) -> Option<&str> {
        self.properties
            .get("sessionID")
            .and_then(Value::as_str)
            .or_else(|| {
                self.properties
                    .get("info")
                    .and_then(|info| info.get("id"))
                    .and_then(Value::as_str)
            })
    }

    /// 授权请求标题
    pub fn permission_title(&self) -> Option<&str> {
        self.properties.get("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_properties() {
        let event = HostEvent::from_json(
            r#"{"type": "permission.updated", "properties": {"title": "Run rm -rf", "sessionID": "ses_1"}}"#,
        )
        .unwrap();
        assert_eq!(event.category(), Some(CategoryId::PermissionUpdated));
        assert_eq!(event.permission_title(), Some("Run rm -rf"));
        assert_eq!(event.session_id(), Some("ses_1"));
    }

    #[test]
    fn test_parse_without_properties() {
        let event = HostEvent::from_json(r#"{"type": "session.error"}"#).unwrap();
        assert_eq!(event.category(), Some(CategoryId::SessionError));
        assert!(event.properties.is_empty());
        assert_eq!(event.permission_title(), None);
    }

    #[test]
    fn test_session_id_from_info() {
        let event = HostEvent::new("session.idle")
            .with_property("info", serde_json::json!({"id": "ses_2"}));
        assert_eq!(event.session_id(), Some("ses_2"));
    }

    #[test]
    fn test_unknown_event_has_no_category() {
        assert_eq!(HostEvent::new("message.updated").category(), None);
    }

    #[test]
    fn test_missing_type_fails() {
        assert!(HostEvent::from_json(r#"{"properties": {}}"#).is_err());
    }
}
