//! CLI command handling

pub mod config;
pub mod listen;

pub use config::*;
pub use listen::*;

use crate::config::{global_config_dir, ConfigResolver};
use crate::notification::{HttpSessionLookup, NotificationBuilder, DEFAULT_SERVER_URL};
use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "opencode-notify")]
#[command(about = "OpenCode 终端通知 - iTerm2 OSC 9 或响铃")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 从 stdin 逐行读取事件 JSON 并发送通知
    Listen,
    /// 处理单个事件 JSON
    Event(EventArgs),
    /// 打印生效配置
    Config,
    /// 生成全局配置文件（已存在则不覆盖）
    Init,
}

/// 所有命令共享的参数
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project directory containing .opencode/notification.json (default: current dir)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Global config directory; pass an empty value to skip the global layer
    #[arg(
        long,
        global = true,
        env = "OPENCODE_NOTIFY_GLOBAL_DIR",
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub global_dir: Option<PathBuf>,

    /// OpenCode server URL used to look up session titles
    #[arg(long, global = true, env = "OPENCODE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,
}

impl CommonArgs {
    fn project_dir(&self) -> PathBuf {
        self.project_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn global_dir(&self) -> Option<PathBuf> {
        self.global_dir.clone().or_else(global_config_dir)
    }

    /// 配置解析器
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.global_dir(), self.project_dir())
    }

    /// 通知系统构建器
    pub fn builder(&self) -> NotificationBuilder {
        NotificationBuilder::new(self.project_dir())
            .global_dir(self.global_dir())
            .lookup(Arc::new(HttpSessionLookup::new(self.server_url.clone())))
    }
}
