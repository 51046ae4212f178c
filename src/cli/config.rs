//! config / init 命令 - 查看生效配置、生成全局配置文件

use super::CommonArgs;
use anyhow::Result;

/// 打印生效配置（pretty JSON）
pub fn handle_config(common: &CommonArgs) -> Result<()> {
    let config = common.resolver().resolve();
    print!("{}", config.to_pretty_json()?);
    Ok(())
}

/// 生成全局配置文件（已存在时保持不变）
pub fn handle_init(common: &CommonArgs) -> Result<()> {
    let resolver = common.resolver();
    match resolver.global_config_path() {
        Some(path) => {
            if let Some(dir) = resolver.global_dir() {
                crate::config::ensure_global_layer(dir);
            }
            let status = if path.exists() { "ready" } else { "not writable" };
            println!("{} ({})", path.display(), status);
        }
        None => println!("Global config layer disabled"),
    }
    Ok(())
}
