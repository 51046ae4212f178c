//! 通知渠道 - iTerm2 OSC 9 转义序列或终端响铃

use anyhow::Result;
use std::io::Write;
use std::sync::OnceLock;

/// 响铃控制字符
pub const BEL: u8 = 0x07;

/// 转义字符
pub const ESC: u8 = 0x1b;

/// 支持 OSC 9 的终端标识（`TERM_PROGRAM`）
pub const ITERM_TERM_PROGRAM: &str = "iTerm.app";

/// 一次通知的输出形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// `ESC ] 9 ; <message> BEL`
    Rich(String),
    /// 单个 BEL，不携带文本
    Bell,
}

impl Emission {
    /// 输出到终端的原始字节
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Emission::Rich(message) => {
                let mut bytes = Vec::with_capacity(message.len() + 5);
                bytes.extend_from_slice(&[ESC, b']', b'9', b';']);
                bytes.extend_from_slice(message.as_bytes());
                bytes.push(BEL);
                bytes
            }
            Emission::Bell => vec![BEL],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Emission::Rich(_) => "osc9",
            Emission::Bell => "bell",
        }
    }
}

/// 终端输出端
pub trait TerminalSink: Send + Sync {
    /// 单次写入完整字节序列
    fn write(&self, bytes: &[u8]) -> Result<()>;
}

/// 进程标准输出
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl TerminalSink for StdoutSink {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
        Ok(())
    }
}

/// 终端能力检测
pub trait TerminalCapability: Send + Sync {
    /// 是否支持富文本通知（OSC 9）
    fn supports_rich_channel(&self) -> bool;
}

/// 通过 `TERM_PROGRAM` 检测 iTerm2，结果在首次查询后缓存
#[derive(Debug, Default)]
pub struct ItermDetector {
    detected: OnceLock<bool>,
}

impl ItermDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 判断给定的 `TERM_PROGRAM` 值是否为 iTerm2（精确匹配）
    pub fn matches(term_program: Option<&str>) -> bool {
        term_program == Some(ITERM_TERM_PROGRAM)
    }
}

impl TerminalCapability for ItermDetector {
    fn supports_rich_channel(&self) -> bool {
        *self.detected.get_or_init(|| {
            let term_program = std::env::var("TERM_PROGRAM").ok();
            Self::matches(term_program.as_deref())
        })
    }
}

/// 固定结果（宿主已知终端类型时使用）
#[derive(Debug, Clone, Copy)]
pub struct FixedCapability(pub bool);

impl TerminalCapability for FixedCapability {
    fn supports_rich_channel(&self) -> bool {
        self.0
    }
}
