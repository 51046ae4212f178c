//! 通知分发器 - 根据生效配置决定是否通知以及使用哪个渠道
//!
//! 每个事件依次经过：总开关 → 类别开关 → 组装文本 → 选择渠道 → 单次写出。
//! 任何步骤失败都不会向宿主传播。

use super::channel::{Emission, TerminalCapability, TerminalSink};
use super::event::HostEvent;
use super::formatter::{compose, APP_TITLE, PERMISSION_PLACEHOLDER};
use super::lookup::{resolve_session_title, SessionLookup, DEFAULT_LOOKUP_TIMEOUT};
use crate::config::{CategoryId, EffectiveConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 跳过通知的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 总开关关闭
    Disabled,
    /// 未识别的事件类型
    UnknownEvent(String),
    /// 类别被关闭
    CategoryDisabled(CategoryId),
}

/// 单个事件的分发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 已写出
    Sent(Emission),
    /// 跳过
    Skipped(SkipReason),
}

/// 选择渠道：允许且终端支持时用 OSC 9，否则只响铃
pub fn select_emission(
    config: &EffectiveConfig,
    capability: &dyn TerminalCapability,
    message: String,
) -> Emission {
    if config.rich_channel_enabled && capability.supports_rich_channel() {
        Emission::Rich(message)
    } else {
        Emission::Bell
    }
}

/// 通知分发器
pub struct NotificationDispatcher {
    config: Arc<EffectiveConfig>,
    lookup: Arc<dyn SessionLookup>,
    sink: Arc<dyn TerminalSink>,
    capability: Arc<dyn TerminalCapability>,
    app_title: String,
    lookup_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        config: Arc<EffectiveConfig>,
        lookup: Arc<dyn SessionLookup>,
        sink: Arc<dyn TerminalSink>,
        capability: Arc<dyn TerminalCapability>,
    ) -> Self {
        Self {
            config,
            lookup,
            sink,
            capability,
            app_title: APP_TITLE.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// 设置标题前缀
    pub fn with_app_title(mut self, app_title: impl Into<String>) -> Self {
        self.app_title = app_title.into();
        self
    }

    /// 设置会话标题查询超时
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// 处理一个宿主事件
    pub async fn dispatch(&self, event: &HostEvent) -> DispatchOutcome {
        if !self.config.enabled {
            debug!(event_type = %event.event_type, "Notifications disabled");
            return DispatchOutcome::Skipped(SkipReason::Disabled);
        }

        let Some(category) = event.category() else {
            debug!(event_type = %event.event_type, "Ignoring unrecognized event");
            return DispatchOutcome::Skipped(SkipReason::UnknownEvent(event.event_type.clone()));
        };

        let category_config = self.config.category(category);
        if !category_config.enabled {
            debug!(%category, "Category disabled");
            return DispatchOutcome::Skipped(SkipReason::CategoryDisabled(category));
        }

        let message = self.compose_message(category, &category_config.message, event).await;
        let emission = select_emission(&self.config, self.capability.as_ref(), message);

        if let Err(e) = self.sink.write(&emission.to_bytes()) {
            warn!(%category, channel = emission.name(), error = %e, "Terminal write failed");
        } else {
            info!(%category, channel = emission.name(), "Notification emitted");
        }

        DispatchOutcome::Sent(emission)
    }

    async fn compose_message(&self, category: CategoryId, message: &str, event: &HostEvent) -> String {
        let detail = match category {
            CategoryId::SessionIdle => Some(
                resolve_session_title(self.lookup.as_ref(), event.session_id(), self.lookup_timeout)
                    .await,
            ),
            CategoryId::PermissionUpdated => Some(
                event
                    .permission_title()
                    .unwrap_or(PERMISSION_PLACEHOLDER)
                    .to_string(),
            ),
            CategoryId::SessionError => None,
        };
        compose(&self.app_title, message, detail.as_deref())
    }
}
