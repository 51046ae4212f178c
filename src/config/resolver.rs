//! 配置加载 - 读取全局层与项目层并合并为生效配置
//!
//! 所有 I/O 失败都在本地降级：读取失败的层视为不存在，写入失败静默忽略。

use super::{ConfigLayer, EffectiveConfig};
use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "notification.json";

/// 项目内配置目录
pub const PROJECT_CONFIG_DIR: &str = ".opencode";

/// 全局配置目录（`~/.config/opencode`），无法确定 home 目录时返回 None
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("opencode"))
}

/// 全局配置文件路径；空目录表示跳过全局层
fn global_layer_path(global_dir: &Path) -> Option<PathBuf> {
    if global_dir.as_os_str().is_empty() {
        None
    } else {
        Some(global_dir.join(CONFIG_FILE_NAME))
    }
}

/// 项目配置文件路径
fn project_layer_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME)
}

/// 确保全局配置文件存在（写入内置默认值），已存在则不覆盖
pub fn ensure_global_layer(global_dir: &Path) {
    let Some(path) = global_layer_path(global_dir) else {
        return;
    };
    match write_defaults_if_missing(&path) {
        Ok(true) => info!(path = %path.display(), "Created default notification config"),
        Ok(false) => {}
        Err(e) => debug!(path = %path.display(), error = %e, "Skipping config bootstrap"),
    }
}

fn write_defaults_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = EffectiveConfig::default().to_pretty_json()?;
    // create_new: 并发创建时不覆盖对方写入的文件
    let file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("Failed to create {}", path.display())),
    };
    fill_new_file(path, file, content.as_bytes())?;
    Ok(true)
}

/// 写入刚创建的文件；失败时删除残留的空文件或半写文件
fn fill_new_file(path: &Path, mut writer: impl Write, content: &[u8]) -> Result<()> {
    let written = writer.write_all(content).and_then(|_| writer.flush());
    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path) {
            debug!(path = %path.display(), error = %remove_err, "Failed to remove partial config");
        }
        return Err(e).with_context(|| format!("Failed to write {}", path.display()));
    }
    Ok(())
}

/// 读取单个配置层；文件缺失、不可读或解析失败都返回 None
pub fn load_layer(path: &Path) -> Option<ConfigLayer> {
    match read_layer(path) {
        Ok(layer) => layer,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring invalid notification config");
            None
        }
    }
}

fn read_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("Failed to read config"),
    };
    let layer = ConfigLayer::from_json(&content).context("Failed to parse config")?;
    debug!(path = %path.display(), "Loaded notification config layer");
    Ok(Some(layer))
}

/// 合并内置默认值、全局层与项目层
pub fn resolve(global_dir: Option<&Path>, project_dir: &Path) -> EffectiveConfig {
    let global = global_dir
        .and_then(global_layer_path)
        .and_then(|path| load_layer(&path));
    let project = load_layer(&project_layer_path(project_dir));

    [global, project]
        .iter()
        .flatten()
        .fold(EffectiveConfig::default(), |config, layer| config.merge(layer))
}

/// 会话级配置解析器
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    global_dir: Option<PathBuf>,
    project_dir: PathBuf,
}

impl ConfigResolver {
    pub fn new(global_dir: Option<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir,
            project_dir: project_dir.into(),
        }
    }

    /// 使用默认全局目录（`~/.config/opencode`）
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        Self::new(global_config_dir(), project_dir)
    }

    pub fn global_dir(&self) -> Option<&Path> {
        self.global_dir.as_deref()
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// 全局配置文件路径（跳过全局层时为 None）
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_dir().and_then(global_layer_path)
    }

    /// 初始化：生成全局配置文件（如缺失）并计算生效配置
    pub fn initialize(&self) -> EffectiveConfig {
        if let Some(dir) = self.global_dir() {
            ensure_global_layer(dir);
        }
        let config = self.resolve();
        debug!(?config, "Resolved notification config");
        config
    }

    /// 仅计算生效配置，不写入任何文件
    pub fn resolve(&self) -> EffectiveConfig {
        resolve(self.global_dir(), &self.project_dir)
    }
}
