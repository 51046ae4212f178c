//! 通知系统构建器 - 加载配置并装配默认协作者

use super::channel::{ItermDetector, StdoutSink, TerminalCapability, TerminalSink};
use super::dispatcher::NotificationDispatcher;
use super::formatter::APP_TITLE;
use super::lookup::{HttpSessionLookup, SessionLookup, DEFAULT_LOOKUP_TIMEOUT};
use crate::config::{global_config_dir, ConfigResolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 通知系统构建器
pub struct NotificationBuilder {
    global_dir: Option<PathBuf>,
    project_dir: PathBuf,
    lookup: Option<Arc<dyn SessionLookup>>,
    sink: Option<Arc<dyn TerminalSink>>,
    capability: Option<Arc<dyn TerminalCapability>>,
    app_title: String,
    lookup_timeout: Duration,
}

impl NotificationBuilder {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir: global_config_dir(),
            project_dir: project_dir.into(),
            lookup: None,
            sink: None,
            capability: None,
            app_title: APP_TITLE.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// 设置全局配置目录（None 跳过全局层）
    pub fn global_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    /// 设置会话标题查询实现
    pub fn lookup(mut self, lookup: Arc<dyn SessionLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// 设置输出端
    pub fn sink(mut self, sink: Arc<dyn TerminalSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 设置终端能力检测
    pub fn capability(mut self, capability: Arc<dyn TerminalCapability>) -> Self {
        self.capability = Some(capability);
        self
    }

    /// 设置标题前缀
    pub fn app_title(mut self, app_title: impl Into<String>) -> Self {
        self.app_title = app_title.into();
        self
    }

    /// 设置查询超时
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// 对应的配置解析器
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.global_dir.clone(), self.project_dir.clone())
    }

    /// 初始化配置并构建 NotificationDispatcher（配置在会话内不再变化）
    pub fn build(self) -> NotificationDispatcher {
        let config = Arc::new(self.resolver().initialize());
        info!(
            enabled = config.enabled,
            iterm = config.rich_channel_enabled,
            project = %self.project_dir.display(),
            "Notification config loaded"
        );

        let lookup = self
            .lookup
            .unwrap_or_else(|| Arc::new(HttpSessionLookup::default()));
        let sink = self.sink.unwrap_or_else(|| Arc::new(StdoutSink));
        let capability = self
            .capability
            .unwrap_or_else(|| Arc::new(ItermDetector::new()));

        NotificationDispatcher::new(config, lookup, sink, capability)
            .with_app_title(self.app_title)
            .with_lookup_timeout(self.lookup_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectiveConfig, CONFIG_FILE_NAME};
    use tempfile::tempdir;

    #[test]
    fn test_build_bootstraps_global_layer() {
        let global = tempdir().unwrap();
        let project = tempdir().unwrap();

        let dispatcher = NotificationBuilder::new(project.path())
            .global_dir(Some(global.path().to_path_buf()))
            .build();

        assert!(global.path().join(CONFIG_FILE_NAME).exists());
        assert_eq!(dispatcher.config(), &EffectiveConfig::default());
    }

    #[test]
    fn test_build_without_global_dir() {
        let project = tempdir().unwrap();
        let builder = NotificationBuilder::new(project.path()).global_dir(None);
        assert!(builder.resolver().global_config_path().is_none());

        let dispatcher = builder.build();
        assert_eq!(dispatcher.config(), &EffectiveConfig::default());
    }
}
