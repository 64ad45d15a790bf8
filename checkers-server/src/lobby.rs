//! 配对大厅
//!
//! 按到达顺序两两配对，先到者执白。

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use protocol::{FrameReader, FrameWriter};

use crate::actor::{spawn_session, Participant, SessionHandle};
use crate::session::ParticipantId;

/// 配对大厅
pub struct Lobby<W> {
    /// 等待对手的参与者
    waiting: Option<Participant<W>>,
    /// 已启动的会话
    sessions: Vec<SessionHandle>,
    /// ID 生成器
    next_id: AtomicU64,
}

impl<W> Lobby<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            waiting: None,
            sessions: Vec::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// 生成新的参与者 ID
    fn generate_id(&self) -> ParticipantId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// 新连接加入大厅，凑满两人即开局
    ///
    /// 等待者若已断开则被丢弃，新连接改为等待。
    pub fn join<R>(&mut self, reader: FrameReader<R>, writer: FrameWriter<W>) -> ParticipantId
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.prune();

        let id = self.generate_id();
        let participant = Participant::new(id, reader, writer);

        let waiting = self.waiting.take().filter(|waiting| {
            let connected = waiting.is_connected();
            if !connected {
                info!("Participant {} left before pairing", waiting.id);
            }
            connected
        });

        match waiting {
            Some(first) => {
                info!("Pairing {} (white) with {} (black)", first.id, id);
                self.sessions.push(spawn_session(first, participant));
            }
            None => {
                info!("Participant {} is waiting for an opponent", id);
                self.waiting = Some(participant);
            }
        }

        id
    }

    /// 是否有人在等待
    pub fn has_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// 清理已结束的会话
    fn prune(&mut self) {
        let before = self.sessions.len();
        self.sessions.retain(|handle| !handle.is_finished());
        if self.sessions.len() < before {
            debug!("Pruned {} finished sessions", before - self.sessions.len());
        }
    }

    /// 进行中的会话数
    pub fn active_sessions(&mut self) -> usize {
        self.prune();
        self.sessions.len()
    }

    /// 中止所有会话
    pub fn shutdown(&mut self) {
        for handle in &self.sessions {
            handle.teardown();
        }
        if let Some(waiting) = self.waiting.take() {
            waiting.close();
        }
    }
}

impl<W> Default for Lobby<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
