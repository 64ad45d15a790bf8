//! 跳棋服务端
//!
//! 包含:
//! - 对局引擎（状态机）
//! - 会话执行器（每局一个事件循环）
//! - 配对大厅
//! - TCP 服务器

pub mod actor;
pub mod lobby;
pub mod server;
pub mod session;

pub use actor::{spawn_session, Participant, SessionEvent, SessionHandle};
pub use lobby::Lobby;
pub use server::Server;
pub use session::{Envelope, Lifecycle, ParticipantId, Session};
