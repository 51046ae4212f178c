//! 通知配置 - 内置默认值、可选配置层与逐字段合并
//!
//! 配置按优先级从低到高分三层：内置默认值 → 全局层 → 项目层。
//! 合并规则：高优先级层中“存在”的字段覆盖低优先级（显式的 `false` 或空字符串同样覆盖），
//! 缺失字段回落到下一层，不会对两个存在的值做组合。

pub mod resolver;

pub use resolver::{
    ensure_global_layer, global_config_dir, load_layer, resolve, ConfigResolver, CONFIG_FILE_NAME,
    PROJECT_CONFIG_DIR,
};

use serde::{Deserialize, Serialize};

/// 通知类别（固定三种）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryId {
    /// 会话完成（session.idle）
    SessionIdle,
    /// 需要授权（permission.updated）
    PermissionUpdated,
    /// 会话出错（session.error）
    SessionError,
}

impl CategoryId {
    pub const ALL: [CategoryId; 3] = [
        CategoryId::SessionIdle,
        CategoryId::PermissionUpdated,
        CategoryId::SessionError,
    ];

    /// 对应的宿主事件类型
    pub fn as_event_type(&self) -> &'static str {
        match self {
            CategoryId::SessionIdle => "session.idle",
            CategoryId::PermissionUpdated => "permission.updated",
            CategoryId::SessionError => "session.error",
        }
    }

    /// 宿主事件类型 → 类别；未知类型返回 None
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_event_type() == event_type)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_event_type())
    }
}

/// 单个类别的配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub enabled: bool,
    pub message: String,
}

impl CategoryConfig {
    fn new(message: &str) -> Self {
        Self {
            enabled: true,
            message: message.to_string(),
        }
    }

    /// 用配置层覆盖存在的字段
    pub fn merge(&self, layer: &CategoryLayer) -> Self {
        Self {
            enabled: layer.enabled.unwrap_or(self.enabled),
            message: layer
                .message
                .clone()
                .unwrap_or_else(|| self.message.clone()),
        }
    }
}

/// 三个类别的完整配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(rename = "session.idle")]
    pub session_idle: CategoryConfig,
    #[serde(rename = "permission.updated")]
    pub permission_updated: CategoryConfig,
    #[serde(rename = "session.error")]
    pub session_error: CategoryConfig,
}

impl Categories {
    pub fn get(&self, category: CategoryId) -> &CategoryConfig {
        match category {
            CategoryId::SessionIdle => &self.session_idle,
            CategoryId::PermissionUpdated => &self.permission_updated,
            CategoryId::SessionError => &self.session_error,
        }
    }

    fn merge(&self, layer: &EventsLayer) -> Self {
        let pick = |current: &CategoryConfig, override_: &Option<CategoryLayer>| match override_ {
            Some(l) => current.merge(l),
            None => current.clone(),
        };
        Self {
            session_idle: pick(&self.session_idle, &layer.session_idle),
            permission_updated: pick(&self.permission_updated, &layer.permission_updated),
            session_error: pick(&self.session_error, &layer.session_error),
        }
    }
}

/// 生效配置（会话内不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    /// 总开关
    pub enabled: bool,
    /// 是否允许使用 iTerm2 转义序列通知
    #[serde(rename = "itermIntegrationEnabled")]
    pub rich_channel_enabled: bool,
    #[serde(rename = "events")]
    pub categories: Categories,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rich_channel_enabled: true,
            categories: Categories {
                session_idle: CategoryConfig::new("Session completed"),
                permission_updated: CategoryConfig::new("Permission needed"),
                session_error: CategoryConfig::new("Error occurred"),
            },
        }
    }
}

impl EffectiveConfig {
    /// 将一个配置层叠加到当前配置上，返回新配置
    pub fn merge(&self, layer: &ConfigLayer) -> Self {
        Self {
            enabled: layer.enabled.unwrap_or(self.enabled),
            rich_channel_enabled: layer
                .iterm_integration_enabled
                .unwrap_or(self.rich_channel_enabled),
            categories: match &layer.events {
                Some(events) => self.categories.merge(events),
                None => self.categories.clone(),
            },
        }
    }

    /// 获取类别配置
    pub fn category(&self, category: CategoryId) -> &CategoryConfig {
        self.categories.get(category)
    }

    /// 格式化为带换行结尾的 pretty JSON（用于生成全局配置文件）
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// 配置层中的类别覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryLayer {
    pub enabled: Option<bool>,
    pub message: Option<String>,
}

/// 配置层中的 `events` 对象
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventsLayer {
    #[serde(rename = "session.idle")]
    pub session_idle: Option<CategoryLayer>,
    #[serde(rename = "permission.updated")]
    pub permission_updated: Option<CategoryLayer>,
    #[serde(rename = "session.error")]
    pub session_error: Option<CategoryLayer>,
}

/// 单个配置文件（所有字段可选，未知字段忽略）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    pub enabled: Option<bool>,
    pub iterm_integration_enabled: Option<bool>,
    pub events: Option<EventsLayer>,
}

impl ConfigLayer {
    /// 从 JSON 文本解析配置层
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
