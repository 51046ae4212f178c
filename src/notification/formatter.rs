//! 通知文本格式化

/// 通知标题前缀
pub const APP_TITLE: &str = "OpenCode";

/// 会话标题查询失败时的占位
pub const SESSION_PLACEHOLDER: &str = "Session";

/// 授权请求缺少标题时的占位
pub const PERMISSION_PLACEHOLDER: &str = "Unknown";

/// 把控制字符（C0、DEL、C1）替换为空格，避免提前结束 OSC 序列
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// 组装通知文本：`{app} - {message}: {detail}`，无 detail 时省略 `: {detail}`
///
/// 各部分来自配置、宿主 payload 或远程服务，统一经过 [`sanitize`]。
pub fn compose(app_title: &str, message: &str, detail: Option<&str>) -> String {
    let (app_title, message) = (sanitize(app_title), sanitize(message));
    match detail {
        Some(detail) => format!("{} - {}: {}", app_title, message, sanitize(detail)),
        None => format!("{} - {}", app_title, message),
    }
}
