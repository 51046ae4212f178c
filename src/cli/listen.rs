//! listen / event 命令 - 接收宿主事件并分发通知
//!
//! `listen` 从 stdin 逐行读取 JSON 事件，按到达顺序依次处理；
//! 无法解析的行记录日志后跳过。

use super::CommonArgs;
use crate::notification::{DispatchOutcome, HostEvent, NotificationDispatcher};
use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// event 命令参数
#[derive(Args, Debug)]
pub struct EventArgs {
    /// JSON payload: {"type": "session.idle", "properties": {...}}
    pub payload: String,
}

/// 解析并分发单个事件；解析失败时返回 None
pub async fn dispatch_line(dispatcher: &NotificationDispatcher, line: &str) -> Option<DispatchOutcome> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match HostEvent::from_json(line) {
        Ok(event) => {
            let outcome = dispatcher.dispatch(&event).await;
            debug!(event_type = %event.event_type, ?outcome, "Event handled");
            Some(outcome)
        }
        Err(e) => {
            warn!(error = %e, "Ignoring malformed event");
            None
        }
    }
}

/// 逐行处理事件流直到 EOF，返回成功解析的事件数
pub async fn run_event_loop<R>(dispatcher: &NotificationDispatcher, reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;
    while let Some(line) = lines.next_line().await? {
        if dispatch_line(dispatcher, &line).await.is_some() {
            handled += 1;
        }
    }
    Ok(handled)
}

/// 处理 listen 命令
pub async fn handle_listen(common: &CommonArgs) -> Result<()> {
    let dispatcher = common.builder().build();
    info!("Listening for events on stdin");
    let handled = run_event_loop(&dispatcher, BufReader::new(tokio::io::stdin())).await?;
    info!(handled, "Event stream closed");
    Ok(())
}

/// 处理 event 命令
pub async fn handle_event(common: &CommonArgs, args: EventArgs) -> Result<()> {
    let dispatcher = common.builder().build();
    dispatch_line(&dispatcher, &args.payload).await;
    Ok(())
}
