//! 通知层 - 将宿主事件转换为终端通知
//!
//! # 使用示例
//! ```ignore
//! use opencode_notify::notification::{HostEvent, NotificationBuilder};
//!
//! let dispatcher = NotificationBuilder::new(".").build();
//! let event = HostEvent::new("session.idle").with_property("sessionID", "ses_1");
//! dispatcher.dispatch(&event).await;
//! ```

pub mod builder;
pub mod channel;
pub mod dispatcher;
pub mod event;
pub mod formatter;
pub mod lookup;

pub use builder::NotificationBuilder;
pub use channel::{
    Emission, FixedCapability, ItermDetector, StdoutSink, TerminalCapability, TerminalSink,
};
pub use dispatcher::{select_emission, DispatchOutcome, NotificationDispatcher, SkipReason};
pub use event::HostEvent;
pub use formatter::{compose, sanitize, APP_TITLE, PERMISSION_PLACEHOLDER, SESSION_PLACEHOLDER};
pub use lookup::{resolve_session_title, HttpSessionLookup, SessionLookup, DEFAULT_SERVER_URL};
