//! 会话标题查询 - 通过 OpenCode server API 获取会话标题
//!
//! 查询失败、超时或没有标题时统一降级为占位文本，不会中断通知。

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::formatter::SESSION_PLACEHOLDER;

/// OpenCode server 默认地址
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4096";

/// 默认查询超时
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// 会话元数据查询
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// 查询会话标题；会话没有标题时返回 Ok(None)
    async fn session_title(&self, session_id: &str) -> Result<Option<String>>;
}

/// `GET /session/{id}` 响应中需要的字段
#[derive(Debug, Deserialize)]
struct SessionInfo {
    title: Option<String>,
}

/// 基于 HTTP 的查询实现
#[derive(Debug, Clone)]
pub struct HttpSessionLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/session/{id}`，会话 ID 作为单个路径段编码
    fn session_url(&self, session_id: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid server URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Server URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .push("session")
            .push(session_id);
        Ok(url)
    }
}

impl Default for HttpSessionLookup {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

#[async_trait]
impl SessionLookup for HttpSessionLookup {
    async fn session_title(&self, session_id: &str) -> Result<Option<String>> {
        let url = self.session_url(session_id)?;
        debug!(url = %url, "Fetching session info");

        let info: SessionInfo = self
            .client
            .get(url)
            .send()
            .await
            .context("Session request failed")?
            .error_for_status()
            .context("Session request returned error status")?
            .json()
            .await
            .context("Malformed session response")?;

        Ok(info.title)
    }
}

/// 查询会话标题，任何失败都返回 "Session"
pub async fn resolve_session_title(
    lookup: &dyn SessionLookup,
    session_id: Option<&str>,
    timeout: Duration,
) -> String {
    let Some(session_id) = session_id else {
        debug!("Event carries no session id");
        return SESSION_PLACEHOLDER.to_string();
    };

    match tokio::time::timeout(timeout, lookup.session_title(session_id)).await {
        Ok(Ok(Some(title))) if !title.trim().is_empty() => title,
        Ok(Ok(_)) => {
            debug!(session_id, "Session has no title");
            SESSION_PLACEHOLDER.to_string()
        }
        Ok(Err(e)) => {
            warn!(session_id, error = %e, "Session lookup failed");
            SESSION_PLACEHOLDER.to_string()
        }
        Err(_) => {
            warn!(session_id, timeout_ms = timeout.as_millis() as u64, "Session lookup timed out");
            SESSION_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticLookup(Option<String>);

    #[async_trait]
    impl SessionLookup for StaticLookup {
        async fn session_title(&self, _session_id: &str) -> Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl SessionLookup for FailingLookup {
        async fn session_title(&self, _session_id: &str) -> Result<Option<String>> {
            anyhow::bail!("connection refused")
        }
    }

    struct SlowLookup;

    #[async_trait]
    impl SessionLookup for SlowLookup {
        async fn session_title(&self, _session_id: &str) -> Result<Option<String>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some("too late".to_string()))
        }
    }

    #[test]
    fn test_session_url_trims_trailing_slash() {
        let lookup = HttpSessionLookup::new("http://localhost:4096/");
        assert_eq!(lookup.base_url(), "http://localhost:4096");
        assert_eq!(
            lookup.session_url("ses_1").unwrap().as_str(),
            "http://localhost:4096/session/ses_1"
        );
    }

    #[test]
    fn test_session_url_escapes_session_id() {
        let lookup = HttpSessionLookup::new("http://localhost:4096");
        assert_eq!(
            lookup.session_url("a/b?c#d").unwrap().as_str(),
            "http://localhost:4096/session/a%2Fb%3Fc%23d"
        );

        let prefixed = HttpSessionLookup::new("http://localhost:4096/api/");
        assert_eq!(
            prefixed.session_url("ses_1").unwrap().as_str(),
            "http://localhost:4096/api/session/ses_1"
        );
    }

    #[tokio::test]
    async fn test_invalid_server_url_falls_back() {
        let lookup = HttpSessionLookup::new("not a url");
        assert!(lookup.session_url("ses_1").is_err());
        let title = resolve_session_title(&lookup, Some("ses_1"), DEFAULT_LOOKUP_TIMEOUT).await;
        assert_eq!(title, "Session");
    }

    #[test]
    fn test_session_info_title_optional() {
        let info: SessionInfo = serde_json::from_str(r#"{"id": "ses_1"}"#).unwrap();
        assert!(info.title.is_none());
        let info: SessionInfo =
            serde_json::from_str(r#"{"id": "ses_1", "title": "Build"}"#).unwrap();
        assert_eq!(info.title.as_deref(), Some("Build"));
    }

    #[tokio::test]
    async fn test_resolve_title_success() {
        let lookup = StaticLookup(Some("Build".to_string()));
        let title = resolve_session_title(&lookup, Some("ses_1"), DEFAULT_LOOKUP_TIMEOUT).await;
        assert_eq!(title, "Build");
    }

    #[tokio::test]
    async fn test_resolve_title_fallbacks() {
        let timeout = DEFAULT_LOOKUP_TIMEOUT;
        assert_eq!(
            resolve_session_title(&FailingLookup, Some("ses_1"), timeout).await,
            "Session"
        );
        assert_eq!(
            resolve_session_title(&StaticLookup(None), Some("ses_1"), timeout).await,
            "Session"
        );
        assert_eq!(
            resolve_session_title(&StaticLookup(Some("  ".to_string())), Some("ses_1"), timeout)
                .await,
            "Session"
        );
        assert_eq!(
            resolve_session_title(&StaticLookup(Some("Build".to_string())), None, timeout).await,
            "Session"
        );
    }

    #[tokio::test]
    async fn test_resolve_title_timeout() {
        let title =
            resolve_session_title(&SlowLookup, Some("ses_1"), Duration::from_millis(100)).await;
        assert_eq!(title, "Session");
    }

    #[tokio::test]
    async fn test_http_lookup_unreachable_server_falls_back() {
        // 端口 9 (discard) 通常无服务监听
        let lookup = HttpSessionLookup::new("http://127.0.0.1:9");
        let title = resolve_session_title(&lookup, Some("ses_1"), Duration::from_secs(2)).await;
        assert_eq!(title, "Session");
    }
}
