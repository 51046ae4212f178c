//! OpenCode Notify - 根据分层配置把 OpenCode 会话事件转换为终端通知

pub mod cli;
pub mod config;
pub mod notification;

pub use config::{
    CategoryConfig, CategoryId, ConfigLayer, ConfigResolver, EffectiveConfig,
};
pub use notification::{
    DispatchOutcome, Emission, HostEvent, NotificationBuilder, NotificationDispatcher, SkipReason,
};
